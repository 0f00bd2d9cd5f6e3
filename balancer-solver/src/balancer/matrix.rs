//! Parametric elimination under the backtracking manager.

use super::{BalanceOutcome, BalanceSession, Balancer};
use crate::oracle::QeOracle;
use crate::template::TemplateNetwork;
use balancer_core::{AssumptionManager, BalancerConfig, MatrixFailure, Result};
use tracing::debug;

/// Queues every matrix in an [`AssumptionManager`] and asks the oracle about
/// each consistent branch it finds; an oracle refusal backtracks like an
/// internal contradiction.
pub struct MatrixBalancer<O> {
    config: BalancerConfig,
    oracle: O,
}

impl<O: QeOracle> MatrixBalancer<O> {
    /// Create a balancer.
    pub fn new(config: BalancerConfig, oracle: O) -> Self {
        Self { config, oracle }
    }
}

impl<O: QeOracle> Balancer for MatrixBalancer<O> {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn balance(&mut self, network: &TemplateNetwork) -> Result<BalanceOutcome> {
        let mut session = BalanceSession::new(network, &self.config, &mut self.oracle);
        let mut manager = AssumptionManager::with_config(&self.config);
        for matrix in session.build_matrices()? {
            manager.add_matrix(matrix);
        }

        loop {
            let branch = manager.solve();
            session.record_backtracks(manager.stats().backtracks);
            let Some(set) = branch else {
                return Err(session.fail(MatrixFailure::BadTemplate));
            };
            if let Some(values) = session.consult_oracle(&set, manager.substitutions())? {
                return session.finish(values, set);
            }
            debug!(depth = manager.depth(), "oracle refused the branch");
            if !manager.next_branch() {
                session.record_backtracks(manager.stats().backtracks);
                return Err(session.fail(MatrixFailure::BadTemplate));
            }
        }
    }
}
