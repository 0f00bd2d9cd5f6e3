//! Property-based tests for the rational function normal form

use balancer_math::{BigInt, BigRational, Polynomial, RationalFunction};
use proptest::prelude::*;

fn linear_poly() -> impl Strategy<Value = Polynomial> {
    (-5i64..5, -5i64..5, -5i64..5).prop_map(|(a, b, c)| {
        Polynomial::from_coeffs_int(&[(a, &[("p", 1)]), (b, &[("q", 1)]), (c, &[])])
    })
}

proptest! {
    /// Scalar multiples share their scalar-free part
    #[test]
    fn scalar_multiples_share_normal_form(
        n in linear_poly(),
        d in linear_poly(),
        k_num in 1i64..9,
        k_den in 1i64..9,
        negate in any::<bool>(),
    ) {
        prop_assume!(!n.is_zero() && !d.is_zero());
        let f = RationalFunction::new(n, d).unwrap();
        let sign = if negate { -1 } else { 1 };
        let k = BigRational::new(BigInt::from(sign * k_num), BigInt::from(k_den));
        let (_, g1) = f.cancel_scalar_content();
        let (_, g2) = f.scale(&k).cancel_scalar_content();
        prop_assert_eq!(g1, g2);
    }

    /// f / f is one for non-zero f
    #[test]
    fn self_division_is_unity(n in linear_poly(), d in linear_poly()) {
        prop_assume!(!n.is_zero() && !d.is_zero());
        let f = RationalFunction::new(n, d).unwrap();
        prop_assert!(f.div(&f).unwrap().is_unity());
    }

    /// Addition then subtraction round-trips
    #[test]
    fn add_sub_inverse(a in linear_poly(), b in linear_poly(), d in linear_poly()) {
        prop_assume!(!d.is_zero());
        let f = RationalFunction::from_polynomial(a);
        let g = RationalFunction::new(b, d).unwrap();
        prop_assert_eq!(f.add(&g).sub(&g), f);
    }
}
