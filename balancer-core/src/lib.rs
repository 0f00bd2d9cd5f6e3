//! Balancer Core - assumptions, parametric elimination and search
//!
//! This crate turns Farkas matrices with parametric entries into assumption
//! sets under which every matrix is consistent:
//! - [`AssumptionType`], [`Assumption`], [`AssumptionSet`]: sign facts about
//!   rational functions, merged into conjunctions and queried by sign
//! - [`Matrix`]: augmented matrices with an optional trailing inequality row,
//!   brought into reduced row-echelon form by parametric Gauss-Jordan steps
//! - [`PivotRowHandler`]: sign analysis of the rows that decides whether a
//!   reduced matrix still admits a non-negative solution
//! - [`AssumptionManager`]: backtracking over non-zero choices with
//!   variable elimination by substitution
//! - [`WeispfenningSearch`]: an alternative substitution-based search that
//!   enumerates candidate assumption sets for a single matrix
//!
//! # Examples
//!
//! ```
//! use balancer_core::{AssumptionManager, AssumptionType, Matrix, Strictness};
//! use balancer_math::{RationalFunction, Variable};
//!
//! // -y = -p with y >= 0 is feasible iff p >= 0
//! let p = RationalFunction::from_var(Variable::new("p"));
//! let m = Matrix::new(
//!     vec![
//!         vec![RationalFunction::from_integer(-1), p.neg()],
//!         vec![RationalFunction::zero(), RationalFunction::zero()],
//!     ],
//!     1,
//! )
//! .unwrap()
//! .with_inequality(Strictness::Weak);
//!
//! let mut manager = AssumptionManager::new();
//! manager.add_matrix(m);
//! let set = manager.solve().unwrap();
//! assert_eq!(set.query(&p), AssumptionType::NONNEGATIVE);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod assumption;
pub mod config;
pub mod error;
pub mod manager;
pub mod matrix;
pub mod pivot_rows;
pub mod weispfenning;

pub use assumption::{Assumption, AssumptionRelation, AssumptionSet, AssumptionType};
pub use config::{BalancerConfig, BalancerStrategy, MatriciserKind};
pub use error::{BacktrackSignal, BalanceError, ErrorKind, MatrixFailure, Result, SearchResult};
pub use manager::{AssumptionManager, AssumptionStack, Frame, ManagerStats, SubstitutionManager};
pub use matrix::{Matrix, PivotCandidate, PivotKind, RrefStats, ShapeError, Strictness};
pub use pivot_rows::{ColumnStatus, EntryCode, OptionTable, PivotRowHandler, PivotRowReport};
pub use weispfenning::{LinearRow, RowKind, WeispfenningSearch, WeispfenningStats};
