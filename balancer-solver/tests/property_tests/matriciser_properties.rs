//! Property-based tests for the Farkas encodings

use balancer_core::Strictness;
use balancer_solver::{
    Formula, InequalityRowMatriciser, LinearConstraint, Matriciser, Relation, SlackMatriciser,
};
use proptest::prelude::*;

fn nonzero() -> impl Strategy<Value = i64> {
    prop_oneof![-4i64..0, 1i64..5]
}

/// Antecedent atoms `a*x + b*y <= c`, every one mentioning both variables
fn antecedent_strategy() -> impl Strategy<Value = Vec<(i64, i64, i64)>> {
    prop::collection::vec((nonzero(), nonzero(), -5i64..6), 1..5)
}

fn antecedent(atoms: &[(i64, i64, i64)]) -> Formula {
    Formula::from_constraints(
        atoms
            .iter()
            .map(|&(a, b, c)| LinearConstraint::from_ints(&[(a, "x"), (b, "y")], Relation::Le, c))
            .collect(),
    )
}

proptest! {
    /// One equation row per program variable, one column per multiplier
    #[test]
    fn inequality_row_layout(atoms in antecedent_strategy(), c in nonzero(), d in -5i64..6) {
        let goal = Formula::truth().and(LinearConstraint::from_ints(&[(c, "x")], Relation::Le, d));
        let matrices = InequalityRowMatriciser.build_matrices(&antecedent(&atoms), &goal).unwrap();
        prop_assert_eq!(matrices.len(), 1);
        let m = &matrices[0];
        prop_assert_eq!(m.num_rows(), 3);
        prop_assert_eq!(m.aug_start(), atoms.len());
        prop_assert_eq!(m.num_cols(), atoms.len() + 1);
        prop_assert_eq!(m.inequality(), Some(Strictness::Weak));
    }

    /// The slack layout adds one unknown and drops the inequality row
    #[test]
    fn slack_layout(atoms in antecedent_strategy(), c in nonzero(), d in -5i64..6) {
        let goal = Formula::truth().and(LinearConstraint::from_ints(&[(c, "y")], Relation::Ge, d));
        let matrices = SlackMatriciser.build_matrices(&antecedent(&atoms), &goal).unwrap();
        prop_assert_eq!(matrices.len(), 1);
        let m = &matrices[0];
        prop_assert_eq!(m.num_rows(), 3);
        prop_assert_eq!(m.aug_start(), atoms.len() + 1);
        prop_assert_eq!(m.inequality(), None);
    }

    /// A consequent equation is checked as two inequalities
    #[test]
    fn equation_goal_splits(atoms in antecedent_strategy(), c in nonzero(), d in -5i64..6) {
        let goal = Formula::truth().and(LinearConstraint::from_ints(&[(c, "x")], Relation::Eq, d));
        let matrices = InequalityRowMatriciser.build_matrices(&antecedent(&atoms), &goal).unwrap();
        prop_assert_eq!(matrices.len(), 2);
    }
}
