//! An oracle that searches a grid of small rationals.
//!
//! Complete only for assumption sets that have a witness on the grid, but
//! needs no external process. Useful for tests and as a fallback.

use super::{sample_values, OracleAnswer, OracleError, QeOracle, QeQuery};
use crate::template::ParameterValues;
use balancer_math::BigRational;
use std::time::Instant;
use tracing::trace;

/// Samples checked between deadline checks.
const DEADLINE_STRIDE: u64 = 256;

/// Grid-search oracle.
#[derive(Debug, Clone)]
pub struct SamplingOracle {
    grid: Vec<BigRational>,
    max_samples: u64,
}

impl Default for SamplingOracle {
    fn default() -> Self {
        Self::new(3, 100_000)
    }
}

impl SamplingOracle {
    /// Try integers up to `max_magnitude` and their reciprocals, at most
    /// `max_samples` assignments per query.
    pub fn new(max_magnitude: i64, max_samples: u64) -> Self {
        Self {
            grid: sample_values(max_magnitude),
            max_samples,
        }
    }

    /// The values tried for each parameter, in order.
    pub fn grid(&self) -> &[BigRational] {
        &self.grid
    }
}

impl QeOracle for SamplingOracle {
    fn name(&self) -> &str {
        "sampling"
    }

    fn eliminate(
        &mut self,
        query: &QeQuery,
        deadline: Option<Instant>,
    ) -> Result<OracleAnswer, OracleError> {
        let start = Instant::now();
        let set = query.assumptions();
        let vars = set.vars();
        if vars.is_empty() {
            return Ok(OracleAnswer::Truth(
                set.eval(&ParameterValues::default()) == Some(true),
            ));
        }

        // odometer over grid indices, first variable fastest
        let mut digits = vec![0usize; vars.len()];
        let mut samples = 0u64;
        loop {
            if samples >= self.max_samples {
                trace!(samples, "sampling budget exhausted");
                return Ok(OracleAnswer::Truth(false));
            }
            if samples % DEADLINE_STRIDE == 0 {
                if let Some(deadline) = deadline {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(OracleError::Timeout {
                            elapsed_ms: now.duration_since(start).as_millis() as u64,
                            limit_ms: deadline.saturating_duration_since(start).as_millis() as u64,
                        });
                    }
                }
            }
            samples += 1;

            let assignment: ParameterValues = vars
                .iter()
                .zip(&digits)
                .map(|(v, &d)| (*v, self.grid[d].clone()))
                .collect();
            if set.eval(&assignment) == Some(true) {
                trace!(samples, "sampling found a witness");
                return Ok(OracleAnswer::Bindings(assignment));
            }

            let mut k = 0;
            loop {
                if k == digits.len() {
                    return Ok(OracleAnswer::Truth(false));
                }
                digits[k] += 1;
                if digits[k] < self.grid.len() {
                    break;
                }
                digits[k] = 0;
                k += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use balancer_core::{Assumption, AssumptionSet, AssumptionType, SubstitutionManager};
    use balancer_math::{BigInt, Polynomial, RationalFunction, Variable};
    use std::time::Duration;

    fn query(set: &AssumptionSet) -> QeQuery {
        QeQuery::new(set, &SubstitutionManager::new(), &[])
    }

    #[test]
    fn test_finds_witness() {
        // p - q > 0 and q > 0
        let mut set = AssumptionSet::new();
        set.add(Assumption::from_polynomial(
            Polynomial::from_coeffs_int(&[(1, &[("p", 1)]), (-1, &[("q", 1)])]),
            AssumptionType::POSITIVE,
        ));
        set.add(Assumption::new(
            RationalFunction::from_var(Variable::new("q")),
            AssumptionType::POSITIVE,
        ));
        let answer = SamplingOracle::default()
            .eliminate(&query(&set), None)
            .expect("no deadline");
        let OracleAnswer::Bindings(values) = answer else {
            panic!("expected a witness");
        };
        assert_eq!(set.eval(&values), Some(true));
        assert_eq!(values.get(&Variable::new("p")), Some(&BigRational::from_integer(BigInt::from(2))));
    }

    #[test]
    fn test_unsatisfiable_on_grid() {
        // p^2 + 1 <= 0
        let mut set = AssumptionSet::new();
        set.add(Assumption::from_polynomial(
            Polynomial::from_coeffs_int(&[(1, &[("p", 2)]), (1, &[])]),
            AssumptionType::NONPOSITIVE,
        ));
        let answer = SamplingOracle::default()
            .eliminate(&query(&set), None)
            .expect("no deadline");
        assert_eq!(answer, OracleAnswer::Truth(false));
    }

    #[test]
    fn test_empty_set_is_true() {
        let answer = SamplingOracle::default()
            .eliminate(&query(&AssumptionSet::new()), None)
            .expect("no deadline");
        assert_eq!(answer, OracleAnswer::Truth(true));
    }

    #[test]
    fn test_expired_deadline() {
        let mut set = AssumptionSet::new();
        set.add(Assumption::new(
            RationalFunction::from_var(Variable::new("p")),
            AssumptionType::POSITIVE,
        ));
        let past = Instant::now() - Duration::from_millis(1);
        let err = SamplingOracle::default()
            .eliminate(&query(&set), Some(past))
            .expect_err("deadline passed");
        assert!(matches!(err, OracleError::Timeout { .. }));
    }
}
