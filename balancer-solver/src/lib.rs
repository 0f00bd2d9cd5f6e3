//! Balancer Solver - template networks, Farkas encodings and balancers
//!
//! This crate drives the search of `balancer-core` end to end:
//! - [`TemplateNetwork`]: locations with parametric invariant templates and
//!   transitions with linear path constraints
//! - [`Matriciser`]: Farkas encodings of the network's implications as
//!   augmented matrices
//! - [`QeOracle`]: quantifier elimination over the remaining parameters, with
//!   a built-in [`SamplingOracle`] and an external [`CommandOracle`]
//! - [`Balancer`]: the basic, matrix and Weispfenning strategies
//!
//! # Examples
//!
//! ```
//! use balancer_core::BalancerConfig;
//! use balancer_math::{Polynomial, Variable};
//! use balancer_solver::{
//!     balancer_for, Formula, LinearConstraint, Relation, SamplingOracle, TemplateNetwork,
//! };
//!
//! // x >= 0 initially must imply the template p*x >= 0
//! let mut net = TemplateNetwork::new();
//! let template = Formula::truth().and(
//!     LinearConstraint::new(Relation::Ge, Polynomial::zero())
//!         .with_term(Variable::new("x"), Polynomial::from_var(Variable::new("p"))),
//! );
//! let loc = net.add_location("entry", template);
//! net.set_initial(
//!     loc,
//!     Formula::truth().and(LinearConstraint::from_ints(&[(1, "x")], Relation::Ge, 0)),
//! );
//!
//! let mut balancer = balancer_for(&BalancerConfig::default(), Box::new(SamplingOracle::default()));
//! let outcome = balancer.balance(&net).unwrap();
//! assert_eq!(outcome.invariants.len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod balancer;
pub mod formula;
pub mod matriciser;
pub mod oracle;
pub mod template;

pub use balancer::{
    balancer_for, BalanceOutcome, BalanceSession, Balancer, BalancerStats, BasicBalancer,
    MatrixBalancer, WeispfenningBalancer,
};
pub use formula::{Formula, LinearConstraint, Relation};
pub use matriciser::{matriciser_for, InequalityRowMatriciser, Matriciser, SlackMatriciser};
pub use oracle::{
    parse_answer, CommandOracle, OracleAnswer, OracleError, QeOracle, QeQuery, SamplingOracle,
};
pub use template::{
    Implication, Invariant, Location, LocationId, ParameterValues, TemplateNetwork, Transition,
};
