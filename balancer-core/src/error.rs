//! Error taxonomy for balancing.
//!
//! Two layers: [`BacktrackSignal`] is what the search raises internally when a
//! branch dies (always recoverable by trying the negation of the latest
//! speculative assumption); [`BalanceError`] is what escapes to callers once
//! no branch is left or something outside the search failed.

use crate::matrix::ShapeError;
use thiserror::Error;

/// Why a matrix could not be solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFailure {
    /// A non-zero choice made during elimination made the matrix unsolvable;
    /// revising which polynomials are assumed zero may help.
    BadNonzeroAssumptions,
    /// No revision of the non-zero assumptions helps.
    BadTemplate,
}

impl std::fmt::Display for MatrixFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadNonzeroAssumptions => write!(f, "bad nonzero assumptions"),
            Self::BadTemplate => write!(f, "bad template"),
        }
    }
}

/// A dead branch of the search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BacktrackSignal {
    /// An assumption contradicted what is on file.
    #[error("contradictory assumption: {0}")]
    Contradiction(String),
    /// Every remaining pivot candidate is known to be zero.
    #[error("no admissible pivot remains")]
    NoPivotOptions,
    /// Pivot-row analysis proved the current matrix infeasible.
    #[error("infeasible pivot row {row}")]
    Infeasible {
        /// The offending row.
        row: usize,
    },
}

/// Result type for search steps.
pub type SearchResult<T> = std::result::Result<T, BacktrackSignal>;

/// Errors surfaced by balancers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// An assumption produced an internal contradiction.
    #[error("bad assumptions: {0}")]
    BadAssumptions(String),
    /// A matrix could not be solved.
    #[error("matrix solving failed: {0}")]
    MatrixSolvingFailed(MatrixFailure),
    /// The oracle returned no complete parameter assignment.
    #[error("oracle left the query unresolved: {0}")]
    OracleUnresolved(String),
    /// The oracle exceeded its time limit.
    #[error("oracle timed out after {elapsed_ms} ms (limit {limit_ms} ms)")]
    Timeout {
        /// Measured duration.
        elapsed_ms: u64,
        /// Configured limit.
        limit_ms: u64,
    },
    /// The oracle could not be reached or answered garbage.
    #[error("oracle failure: {0}")]
    Oracle(String),
    /// Instantiating the templates with the found values failed.
    #[error("template evaluation failed: {0}")]
    Evaluation(String),
    /// A formula layer produced a malformed matrix.
    #[error("malformed matrix: {0}")]
    Shape(#[from] ShapeError),
}

/// Coarse classification of [`BalanceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`BalanceError::BadAssumptions`].
    BadAssumptions,
    /// See [`BalanceError::MatrixSolvingFailed`].
    MatrixSolvingFailed,
    /// See [`BalanceError::OracleUnresolved`].
    OracleUnresolved,
    /// See [`BalanceError::Timeout`].
    Timeout,
    /// See [`BalanceError::Oracle`].
    Oracle,
    /// See [`BalanceError::Evaluation`].
    Evaluation,
    /// See [`BalanceError::Shape`].
    Shape,
}

impl BalanceError {
    /// The error's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadAssumptions(_) => ErrorKind::BadAssumptions,
            Self::MatrixSolvingFailed(_) => ErrorKind::MatrixSolvingFailed,
            Self::OracleUnresolved(_) => ErrorKind::OracleUnresolved,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Oracle(_) => ErrorKind::Oracle,
            Self::Evaluation(_) => ErrorKind::Evaluation,
            Self::Shape(_) => ErrorKind::Shape,
        }
    }

    /// Whether a retry loop may answer this error by backtracking.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::BadAssumptions(_)
                | Self::OracleUnresolved(_)
                | Self::MatrixSolvingFailed(MatrixFailure::BadNonzeroAssumptions)
        )
    }
}

impl From<BacktrackSignal> for BalanceError {
    fn from(signal: BacktrackSignal) -> Self {
        BalanceError::BadAssumptions(signal.to_string())
    }
}

/// Result type for balancing.
pub type Result<T> = std::result::Result<T, BalanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        assert!(BalanceError::BadAssumptions("x".into()).is_recoverable());
        assert!(BalanceError::OracleUnresolved("x".into()).is_recoverable());
        assert!(
            BalanceError::MatrixSolvingFailed(MatrixFailure::BadNonzeroAssumptions)
                .is_recoverable()
        );
        assert!(!BalanceError::MatrixSolvingFailed(MatrixFailure::BadTemplate).is_recoverable());
        assert!(
            !BalanceError::Timeout {
                elapsed_ms: 10,
                limit_ms: 5
            }
            .is_recoverable()
        );
    }

    #[test]
    fn test_signal_conversion() {
        let err: BalanceError = BacktrackSignal::NoPivotOptions.into();
        assert_eq!(err.kind(), ErrorKind::BadAssumptions);
        assert!(err.to_string().contains("no admissible pivot"));
    }
}
