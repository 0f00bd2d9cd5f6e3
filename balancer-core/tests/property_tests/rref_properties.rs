//! Property-based tests for elimination on constant matrices

use balancer_core::Matrix;
use balancer_math::RationalFunction;
use proptest::prelude::*;

/// Strategy for small integer matrices with one augmented column
fn matrix_strategy() -> impl Strategy<Value = Vec<Vec<i64>>> {
    (1usize..5, 1usize..5).prop_flat_map(|(rows, unknowns)| {
        prop::collection::vec(prop::collection::vec(-4i64..5i64, unknowns + 1), rows)
    })
}

fn build(rows: &[Vec<i64>]) -> Matrix {
    let refs: Vec<&[i64]> = rows.iter().map(Vec::as_slice).collect();
    Matrix::from_integers(&refs, 1).unwrap()
}

proptest! {
    /// Constant pivots never produce facts and leave unit pivot columns
    #[test]
    fn constant_rref_has_unit_pivots(rows in matrix_strategy()) {
        let mut m = build(&rows);
        let facts = m.put_in_rref();
        prop_assert!(facts.is_empty());
        prop_assert!(m.is_reduced(None));
        prop_assert!(m.rank() <= m.num_rows().min(m.aug_start()));

        for (k, &col) in m.pivots().iter().enumerate() {
            for i in 0..m.num_rows() {
                let expected = if i == k {
                    RationalFunction::one()
                } else {
                    RationalFunction::zero()
                };
                prop_assert_eq!(m.entry(i, col), &expected);
            }
        }
    }

    /// Reducing twice changes nothing
    #[test]
    fn rref_idempotent(rows in matrix_strategy()) {
        let mut m = build(&rows);
        m.put_in_rref();
        let once = m.clone();
        let facts = m.put_in_rref();
        prop_assert!(facts.is_empty());
        prop_assert_eq!(m.to_string(), once.to_string());
    }
}
