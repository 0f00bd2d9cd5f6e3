//! Balancer configuration.

use serde::{Deserialize, Serialize};

/// Which orchestrator drives the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancerStrategy {
    /// One elimination pass per matrix and a single oracle call, no backtracking.
    Basic,
    /// Parametric Gauss-Jordan elimination under the backtracking manager.
    #[default]
    Matrix,
    /// Substitution-based elimination, one candidate set per matrix.
    Weispfenning,
}

/// How Farkas implications are laid out as matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatriciserKind {
    /// The constant part of the implication stays a trailing inequality row.
    #[default]
    InequalityRow,
    /// Weak constant rows get an explicit slack column and become equations.
    Slack,
}

/// Balancer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Orchestration strategy
    pub strategy: BalancerStrategy,
    /// Matrix layout
    pub matriciser: MatriciserKind,
    /// Run pivot-row analysis after each elimination; when off, pivot rows
    /// only get the sign conditions of the solution with free unknowns at zero
    pub pivot_row_analysis: bool,
    /// Maximum number of backtracks before giving up (0 = unlimited)
    pub max_backtracks: u64,
    /// Oracle time limit in milliseconds (0 = unbounded)
    pub oracle_timeout_ms: u64,
    /// Maximum candidate sets enumerated per matrix by the Weispfenning engine
    pub weispfenning_max_candidates: usize,
    /// Give parameters the oracle left unbound the value zero
    pub default_unassigned_to_zero: bool,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self::thorough()
    }
}

impl BalancerConfig {
    /// Full backtracking search with pivot-row analysis (default)
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            strategy: BalancerStrategy::Matrix,
            matriciser: MatriciserKind::InequalityRow,
            pivot_row_analysis: true,
            max_backtracks: 0,
            oracle_timeout_ms: 0,
            weispfenning_max_candidates: 64,
            default_unassigned_to_zero: true,
        }
    }

    /// Single elimination pass, one oracle call
    #[must_use]
    pub fn fast() -> Self {
        Self {
            strategy: BalancerStrategy::Basic,
            max_backtracks: 64,
            weispfenning_max_candidates: 8,
            ..Self::thorough()
        }
    }

    /// Replace the strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: BalancerStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Replace the matrix layout
    #[must_use]
    pub fn with_matriciser(mut self, matriciser: MatriciserKind) -> Self {
        self.matriciser = matriciser;
        self
    }

    /// Replace the oracle time limit
    #[must_use]
    pub fn with_oracle_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.oracle_timeout_ms = timeout_ms;
        self
    }

    /// Whether the backtrack budget is exhausted after `backtracks` backtracks
    pub fn backtracks_exhausted(&self, backtracks: u64) -> bool {
        self.max_backtracks != 0 && backtracks >= self.max_backtracks
    }
}
