//! Property-based tests for the sampling oracle

use balancer_core::{Assumption, AssumptionSet, AssumptionType, SubstitutionManager};
use balancer_math::{BigRational, Polynomial, Variable};
use balancer_solver::{OracleAnswer, QeOracle, QeQuery, SamplingOracle};
use proptest::prelude::*;

fn lower_bound(c: i64) -> AssumptionSet {
    // p - c >= 0
    let poly = Polynomial::from_var(Variable::new("p")).sub(&Polynomial::from_integer(c));
    let mut set = AssumptionSet::new();
    set.add(Assumption::from_polynomial(poly, AssumptionType::NONNEGATIVE));
    set
}

proptest! {
    /// Witnesses satisfy the set they were asked about
    #[test]
    fn witnesses_satisfy_the_query(c in -3i64..4) {
        let set = lower_bound(c);
        let p = Variable::new("p");
        let query = QeQuery::new(&set, &SubstitutionManager::new(), &[p]);
        let answer = SamplingOracle::default().eliminate(&query, None).unwrap();
        let OracleAnswer::Bindings(bindings) = answer else {
            return Err(TestCaseError::fail("expected bindings"));
        };
        let values = query.complete(&bindings, false).unwrap();
        prop_assert!(values[&p] >= BigRational::from_integer(c.into()));
    }

    /// Bounds beyond the grid are refused, not answered wrongly
    #[test]
    fn out_of_grid_bounds_are_refused(c in 4i64..20) {
        let set = lower_bound(c);
        let query = QeQuery::new(&set, &SubstitutionManager::new(), &[]);
        let answer = SamplingOracle::default().eliminate(&query, None).unwrap();
        prop_assert_eq!(answer, OracleAnswer::Truth(false));
    }
}
