//! Balancers: find parameter values that make every implication of a
//! template network valid.
//!
//! All strategies share the same outline. Every implication of the network
//! is turned into Farkas matrices, the matrices are searched for a
//! consistent assumption set, and the set is handed to a quantifier-
//! elimination oracle for witness values. They differ in how the search is
//! done and in what happens when the oracle refuses.
//!
//! Everything one `balance` call mutates lives in a [`BalanceSession`], so a
//! balancer can be reused across networks.

pub mod basic;
pub mod matrix;
pub mod weispfenning;

pub use basic::BasicBalancer;
pub use matrix::MatrixBalancer;
pub use weispfenning::WeispfenningBalancer;

use crate::matriciser::{matriciser_for, Matriciser};
use crate::oracle::{OracleAnswer, QeOracle, QeQuery};
use crate::template::{Invariant, ParameterValues, TemplateNetwork};
use balancer_core::{
    AssumptionSet, BalanceError, BalancerConfig, BalancerStrategy, Matrix, MatrixFailure, Result,
    SubstitutionManager,
};
use balancer_math::Variable;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Statistics for one `balance` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalancerStats {
    /// Implications encoded.
    pub transitions: usize,
    /// Matrices built.
    pub matrices: usize,
    /// Oracle round trips.
    pub oracle_calls: u64,
    /// Time spent in the oracle.
    pub oracle_time: Duration,
    /// Backtracks taken by the search.
    pub backtracks: u64,
}

/// A successful balance.
#[derive(Debug, Clone)]
pub struct BalanceOutcome {
    /// Value of every parameter.
    pub values: ParameterValues,
    /// The instantiated templates.
    pub invariants: Vec<Invariant>,
    /// The assumption set the values satisfy.
    pub assumptions: AssumptionSet,
    /// Search statistics.
    pub stats: BalancerStats,
}

/// A balancing strategy.
pub trait Balancer {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Find parameter values making every implication of `network` valid.
    ///
    /// Fails with [`MatrixFailure::BadTemplate`] once every branch is
    /// exhausted, with [`BalanceError::Timeout`] if the oracle overruns its
    /// limit, and with [`BalanceError::Evaluation`] if the templates reject
    /// the values found.
    fn balance(&mut self, network: &TemplateNetwork) -> Result<BalanceOutcome>;
}

/// The balancer for `config.strategy`.
pub fn balancer_for(config: &BalancerConfig, oracle: Box<dyn QeOracle>) -> Box<dyn Balancer> {
    info!(strategy = ?config.strategy, matriciser = ?config.matriciser, "selecting balancer");
    match config.strategy {
        BalancerStrategy::Basic => Box::new(BasicBalancer::new(config.clone(), oracle)),
        BalancerStrategy::Matrix => Box::new(MatrixBalancer::new(config.clone(), oracle)),
        BalancerStrategy::Weispfenning => {
            Box::new(WeispfenningBalancer::new(config.clone(), oracle))
        }
    }
}

/// State of one `balance` call.
pub struct BalanceSession<'a> {
    network: &'a TemplateNetwork,
    config: &'a BalancerConfig,
    oracle: &'a mut dyn QeOracle,
    matriciser: Box<dyn Matriciser>,
    parameters: Vec<Variable>,
    stats: BalancerStats,
}

impl<'a> BalanceSession<'a> {
    /// Start balancing `network`.
    pub fn new(
        network: &'a TemplateNetwork,
        config: &'a BalancerConfig,
        oracle: &'a mut dyn QeOracle,
    ) -> Self {
        Self {
            network,
            config,
            oracle,
            matriciser: matriciser_for(config.matriciser),
            parameters: network.parameters(),
            stats: BalancerStats::default(),
        }
    }

    /// The network's parameters.
    pub fn parameters(&self) -> &[Variable] {
        &self.parameters
    }

    /// Statistics so far.
    pub fn stats(&self) -> &BalancerStats {
        &self.stats
    }

    /// Record the search's backtrack count.
    pub fn record_backtracks(&mut self, backtracks: u64) {
        self.stats.backtracks = backtracks;
    }

    /// Farkas matrices for every implication of the network.
    pub fn build_matrices(&mut self) -> Result<Vec<Matrix>> {
        let mut matrices = Vec::new();
        for implication in self.network.implications() {
            let built = self
                .matriciser
                .build_matrices(&implication.antecedent, &implication.consequent)?;
            debug!(
                implication = %implication.label,
                matriciser = self.matriciser.name(),
                matrices = built.len(),
                "encoded"
            );
            self.stats.transitions += 1;
            matrices.extend(built);
        }
        self.stats.matrices = matrices.len();
        info!(
            transitions = self.stats.transitions,
            matrices = self.stats.matrices,
            parameters = self.parameters.len(),
            "balancing"
        );
        Ok(matrices)
    }

    /// Ask the oracle for witnesses of `set`.
    ///
    /// Returns `None` if the oracle refused or its bindings do not satisfy
    /// the set. Overrunning the configured limit is fatal.
    pub fn consult_oracle(
        &mut self,
        set: &AssumptionSet,
        substitutions: &SubstitutionManager,
    ) -> Result<Option<ParameterValues>> {
        let query = QeQuery::new(set, substitutions, &self.parameters);
        let limit_ms = self.config.oracle_timeout_ms;
        let start = Instant::now();
        let deadline = (limit_ms > 0).then(|| start + Duration::from_millis(limit_ms));
        let answer = self.oracle.eliminate(&query, deadline);
        let elapsed = start.elapsed();
        self.stats.oracle_calls += 1;
        self.stats.oracle_time += elapsed;
        debug!(
            oracle = self.oracle.name(),
            request = %query.request(),
            elapsed_ms = elapsed.as_millis() as u64,
            "oracle round trip"
        );

        let answer = answer?;
        let elapsed_ms = elapsed.as_millis() as u64;
        if limit_ms > 0 && elapsed_ms > limit_ms {
            return Err(BalanceError::Timeout {
                elapsed_ms,
                limit_ms,
            });
        }

        let bindings = match answer {
            OracleAnswer::Truth(false) => {
                debug!("oracle found the assumptions unsatisfiable");
                return Ok(None);
            }
            OracleAnswer::Truth(true) => ParameterValues::default(),
            OracleAnswer::Bindings(bindings) => bindings,
        };
        let values = query.complete(&bindings, self.config.default_unassigned_to_zero);
        if values.is_none() {
            debug!("oracle bindings do not satisfy the assumptions");
        }
        Ok(values)
    }

    /// Instantiate the templates and wrap up.
    pub fn finish(self, values: ParameterValues, assumptions: AssumptionSet) -> Result<BalanceOutcome> {
        let invariants = self.network.evaluate(&values)?;
        info!(
            oracle_calls = self.stats.oracle_calls,
            backtracks = self.stats.backtracks,
            "balanced"
        );
        Ok(BalanceOutcome {
            values,
            invariants,
            assumptions,
            stats: self.stats,
        })
    }

    /// The error for a search that ran out of options.
    pub fn fail(&self, failure: MatrixFailure) -> BalanceError {
        info!(
            %failure,
            oracle_calls = self.stats.oracle_calls,
            backtracks = self.stats.backtracks,
            "cannot balance"
        );
        BalanceError::MatrixSolvingFailed(failure)
    }
}
