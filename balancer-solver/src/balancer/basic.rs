//! Single pass, no backtracking.

use super::{BalanceOutcome, BalanceSession, Balancer};
use crate::oracle::QeOracle;
use crate::template::TemplateNetwork;
use balancer_core::{
    AssumptionSet, BalanceError, BalancerConfig, MatrixFailure, PivotRowHandler, Result,
    SubstitutionManager,
};
use tracing::debug;

/// Reduces every matrix with the best-ranked pivots, collects the facts the
/// reduction needs, and calls the oracle once. Choices a backtracking search
/// would branch on are simply committed.
pub struct BasicBalancer<O> {
    config: BalancerConfig,
    oracle: O,
}

impl<O: QeOracle> BasicBalancer<O> {
    /// Create a balancer.
    pub fn new(config: BalancerConfig, oracle: O) -> Self {
        Self { config, oracle }
    }
}

impl<O: QeOracle> Balancer for BasicBalancer<O> {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn balance(&mut self, network: &TemplateNetwork) -> Result<BalanceOutcome> {
        let mut session = BalanceSession::new(network, &self.config, &mut self.oracle);
        let mut set = AssumptionSet::new();
        // once a speculative fact is in, failures may be its fault
        let mut nonzero_assumed = false;
        let failure = |nonzero_assumed: bool| {
            if nonzero_assumed {
                MatrixFailure::BadNonzeroAssumptions
            } else {
                MatrixFailure::BadTemplate
            }
        };

        for (i, mut matrix) in session.build_matrices()?.into_iter().enumerate() {
            let nonzero = matrix.put_in_rref();
            nonzero_assumed |= !nonzero.is_empty();
            let zero = matrix.almost_zero_facts(Some(&set));
            if !(set.extend_from(&nonzero) && set.add_all(zero)) {
                debug!(matrix = i, "contradictory facts");
                return Err(session.fail(failure(nonzero_assumed)));
            }
            if !self.config.pivot_row_analysis {
                let facts = PivotRowHandler::new(&matrix, Some(&set)).basic_solution_facts();
                let consistent = match facts {
                    Ok(facts) => set.add_all(facts),
                    Err(signal) => {
                        debug!(matrix = i, %signal, "basic solution infeasible");
                        false
                    }
                };
                if !consistent {
                    return Err(session.fail(failure(nonzero_assumed)));
                }
                continue;
            }
            // candidates are committed without an alternative, like pivots
            loop {
                let analysis = PivotRowHandler::new(&matrix, Some(&set)).analyse();
                let report = match analysis {
                    Ok(report) => report,
                    Err(signal) => {
                        debug!(matrix = i, %signal, "pivot rows infeasible");
                        return Err(session.fail(failure(nonzero_assumed)));
                    }
                };
                if !set.add_all(report.facts) {
                    return Err(session.fail(failure(nonzero_assumed)));
                }
                let Some(candidate) = report.candidates.into_iter().next() else {
                    break;
                };
                debug!(matrix = i, %candidate, "assuming a repairing contribution");
                nonzero_assumed = true;
                if !set.add(candidate) {
                    return Err(session.fail(failure(nonzero_assumed)));
                }
            }
        }

        match session.consult_oracle(&set, &SubstitutionManager::new())? {
            Some(values) => session.finish(values, set),
            None => Err(BalanceError::OracleUnresolved(set.to_query())),
        }
    }
}
