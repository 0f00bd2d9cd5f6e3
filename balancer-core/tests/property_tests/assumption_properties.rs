//! Property-based tests for sign types, assumptions and assumption sets

use balancer_core::{Assumption, AssumptionSet, AssumptionType};
use balancer_math::{BigInt, BigRational, Polynomial, RationalFunction};
use proptest::prelude::*;

const NAMES: [&str; 3] = ["p", "q", "r"];

fn kind_strategy() -> impl Strategy<Value = AssumptionType> {
    (0u8..8).prop_map(|code| AssumptionType::from_code(code).unwrap())
}

/// Strategy for non-constant linear polynomials over p, q, r
fn linear_strategy() -> impl Strategy<Value = Polynomial> {
    (
        prop::collection::vec(prop_oneof![-5i64..0i64, 1i64..6i64], 1..4),
        -5i64..6i64,
    )
        .prop_map(|(coeffs, constant)| {
            let vars: Vec<Vec<(&str, u32)>> = coeffs
                .iter()
                .enumerate()
                .map(|(i, _)| vec![(NAMES[i], 1)])
                .collect();
            let mut terms: Vec<(i64, &[(&str, u32)])> = coeffs
                .iter()
                .zip(&vars)
                .map(|(c, v)| (*c, v.as_slice()))
                .collect();
            terms.push((constant, &[]));
            Polynomial::from_coeffs_int(&terms)
        })
}

proptest! {
    /// Conjunction is commutative and associative
    #[test]
    fn conjoin_lattice_laws(a in kind_strategy(), b in kind_strategy(), c in kind_strategy()) {
        prop_assert_eq!(a.conjoin(b), b.conjoin(a));
        prop_assert_eq!(a.conjoin(b).conjoin(c), a.conjoin(b.conjoin(c)));
        prop_assert_eq!(a.conjoin(a), a);
    }

    /// Negation and flipping are involutions and obey De Morgan
    #[test]
    fn negate_and_flip_laws(a in kind_strategy(), b in kind_strategy()) {
        prop_assert_eq!(a.negate().negate(), a);
        prop_assert_eq!(a.flip().flip(), a);
        prop_assert_eq!(a.conjoin(b).negate(), a.negate().disjoin(b.negate()));
        prop_assert_eq!(a.flip().conjoin(b.flip()), a.conjoin(b).flip());
    }

    /// Implication agrees with conjunction
    #[test]
    fn implies_matches_conjoin(a in kind_strategy(), b in kind_strategy()) {
        prop_assert_eq!(a.implies(b), a.conjoin(b) == a);
        prop_assert!(AssumptionType::FALSE.implies(a));
        prop_assert!(a.implies(AssumptionType::TRUE));
    }

    /// Scaling the function by a constant keeps the assumption, up to a flip
    #[test]
    fn assumption_scale_normalization(
        p in linear_strategy(),
        kind in kind_strategy(),
        scale in prop_oneof![-7i64..0i64, 1i64..8i64],
    ) {
        let base = Assumption::from_polynomial(p.clone(), kind);
        let scaled = Assumption::from_polynomial(
            p.scale(&BigRational::from_integer(BigInt::from(scale))),
            if scale < 0 { kind.flip() } else { kind },
        );
        prop_assert_eq!(base, scaled);
    }

    /// Adding an assumption makes it answerable by query
    #[test]
    fn set_query_after_add(
        p in linear_strategy(),
        first in kind_strategy(),
        second in kind_strategy(),
    ) {
        let f = RationalFunction::from_polynomial(p);
        let mut set = AssumptionSet::new();
        let ok = set.add(Assumption::new(f.clone(), first))
            && set.add(Assumption::new(f.clone(), second));
        let known = set.query(&f);
        prop_assert!(known.implies(first.conjoin(second)));
        prop_assert_eq!(ok, !first.conjoin(second).is_false());
    }

    /// Adding the same assumption twice does not grow the set
    #[test]
    fn set_add_idempotent(p in linear_strategy(), kind in kind_strategy()) {
        let a = Assumption::from_polynomial(p, kind);
        let mut set = AssumptionSet::new();
        set.add(a.clone());
        let len = set.len();
        set.add(a);
        prop_assert_eq!(set.len(), len);
    }
}
