//! Substitution-based search over candidate sets.

use super::{BalanceOutcome, BalanceSession, Balancer};
use crate::oracle::QeOracle;
use crate::template::TemplateNetwork;
use balancer_core::{
    AssumptionSet, BalancerConfig, LinearRow, MatrixFailure, Result, SubstitutionManager,
    WeispfenningSearch,
};
use tracing::debug;

/// Combines one candidate set per system, depth first. A combination that
/// merges without contradiction and covers every system goes to the oracle;
/// a refusal moves on to the next candidate of the last system.
pub struct WeispfenningBalancer<O> {
    config: BalancerConfig,
    oracle: O,
}

impl<O: QeOracle> WeispfenningBalancer<O> {
    /// Create a balancer.
    pub fn new(config: BalancerConfig, oracle: O) -> Self {
        Self { config, oracle }
    }
}

impl<O: QeOracle> Balancer for WeispfenningBalancer<O> {
    fn name(&self) -> &'static str {
        "weispfenning"
    }

    fn balance(&mut self, network: &TemplateNetwork) -> Result<BalanceOutcome> {
        let max_candidates = self.config.weispfenning_max_candidates;
        let mut session = BalanceSession::new(network, &self.config, &mut self.oracle);
        let no_substitutions = SubstitutionManager::new();

        // every augmented column of every matrix is a system of its own
        let systems: Vec<Vec<LinearRow>> = session
            .build_matrices()?
            .iter()
            .flat_map(|m| {
                (m.aug_start()..m.num_cols()).map(move |col| WeispfenningSearch::rows_of(m, col))
            })
            .collect();

        if systems.is_empty() {
            let set = AssumptionSet::new();
            return match session.consult_oracle(&set, &no_substitutions)? {
                Some(values) => session.finish(values, set),
                None => Err(session.fail(MatrixFailure::BadTemplate)),
            };
        }

        let search = |k: usize| WeispfenningSearch::from_rows(systems[k].clone(), max_candidates);
        let mut stack: Vec<(AssumptionSet, WeispfenningSearch)> = vec![(AssumptionSet::new(), search(0))];
        let mut backtracks = 0u64;

        while let Some((base, candidates)) = stack.last_mut() {
            let Some(candidate) = candidates.next() else {
                let stats = candidates.stats().clone();
                stack.pop();
                debug!(system = stack.len(), ?stats, "system exhausted");
                backtracks += 1;
                session.record_backtracks(backtracks);
                if self.config.backtracks_exhausted(backtracks) {
                    debug!(limit = self.config.max_backtracks, "backtrack budget exhausted");
                    break;
                }
                continue;
            };

            let mut combined = base.clone();
            if !combined.extend_from(&candidate) {
                continue;
            }
            if stack.len() < systems.len() {
                let next = search(stack.len());
                stack.push((combined, next));
                continue;
            }
            if let Some(values) = session.consult_oracle(&combined, &no_substitutions)? {
                return session.finish(values, combined);
            }
        }

        Err(session.fail(MatrixFailure::BadTemplate))
    }
}
