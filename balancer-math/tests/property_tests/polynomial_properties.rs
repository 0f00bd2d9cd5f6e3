//! Property-based tests for polynomial arithmetic and content extraction

use balancer_math::{BigInt, BigRational, Polynomial, Variable};
use num_traits::Zero;
use proptest::prelude::*;
use rustc_hash::FxHashMap;

const NAMES: [&str; 3] = ["p", "q", "r"];

/// Strategy for small non-zero coefficients
fn coeff_strategy() -> impl Strategy<Value = i64> {
    prop_oneof![-9i64..-1i64, 1i64..9i64]
}

/// Strategy for polynomials with up to four terms over p, q, r
fn poly_strategy() -> impl Strategy<Value = Polynomial> {
    prop::collection::vec(
        (coeff_strategy(), 0usize..3, 0u32..3, 0usize..3, 0u32..2),
        1..5,
    )
    .prop_map(|terms| {
        let owned: Vec<(i64, Vec<(&str, u32)>)> = terms
            .into_iter()
            .map(|(c, v1, e1, v2, e2)| (c, vec![(NAMES[v1], e1), (NAMES[v2], e2)]))
            .collect();
        let borrowed: Vec<(i64, &[(&str, u32)])> =
            owned.iter().map(|(c, m)| (*c, m.as_slice())).collect();
        Polynomial::from_coeffs_int(&borrowed)
    })
}

fn rat(n: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(n))
}

proptest! {
    /// Addition is commutative
    #[test]
    fn poly_add_commutative(p in poly_strategy(), q in poly_strategy()) {
        prop_assert_eq!(&p + &q, &q + &p);
    }

    /// Multiplication distributes over addition
    #[test]
    fn poly_mul_distributes(p in poly_strategy(), q in poly_strategy(), r in poly_strategy()) {
        let lhs = &p * &(&q + &r);
        let rhs = &(&p * &q) + &(&p * &r);
        prop_assert_eq!(lhs, rhs);
    }

    /// p - p collects to the empty polynomial
    #[test]
    fn poly_sub_self_is_zero(p in poly_strategy()) {
        prop_assert!((&p - &p).is_zero());
    }

    /// Cancelling rational content is invariant under non-zero scaling
    #[test]
    fn cancel_rational_content_scale_invariant(
        p in poly_strategy(),
        num in coeff_strategy(),
        den in 1i64..7i64,
    ) {
        prop_assume!(!p.is_zero());
        let k = BigRational::new(BigInt::from(num), BigInt::from(den));
        let (_, a) = p.cancel_rational_content();
        let (_, b) = p.scale(&k).cancel_rational_content();
        prop_assert_eq!(a, b);
    }

    /// The content times the primitive part gives back the polynomial
    #[test]
    fn content_times_primitive(p in poly_strategy()) {
        let (c, prim) = p.cancel_rational_content();
        prop_assert_eq!(prim.scale(&c), p);
    }

    /// Exact division recovers a factor of a product
    #[test]
    fn exact_div_recovers_factor(p in poly_strategy(), q in poly_strategy()) {
        prop_assume!(!q.is_zero());
        let product = &p * &q;
        prop_assert_eq!(product.exact_div(&q), Some(p));
    }

    /// Evaluation is a ring homomorphism
    #[test]
    fn eval_respects_mul(p in poly_strategy(), q in poly_strategy(), a in -4i64..4, b in -4i64..4, c in -4i64..4) {
        let mut assignment = FxHashMap::default();
        assignment.insert(Variable::new("p"), rat(a));
        assignment.insert(Variable::new("q"), rat(b));
        assignment.insert(Variable::new("r"), rat(c));
        let lhs = (&p * &q).eval(&assignment).unwrap_or_else(BigRational::zero);
        let rhs = p.eval(&assignment).unwrap_or_else(BigRational::zero)
            * q.eval(&assignment).unwrap_or_else(BigRational::zero);
        prop_assert_eq!(lhs, rhs);
    }

    /// A linear isolation really solves the polynomial
    #[test]
    fn linear_isolation_solves(p in poly_strategy()) {
        if let Some(sub) = p.linear_isolate_first() {
            prop_assert!(sub.apply(&p).is_zero());
            prop_assert!(!sub.is_cyclic());
        }
    }
}
