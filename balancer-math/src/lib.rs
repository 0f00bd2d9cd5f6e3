//! Balancer Math - exact symbolic arithmetic over template parameters
//!
//! This crate is the algebraic foundation of the balancer:
//! - [`Variable`]: interned parameter symbols ordered by name
//! - [`Monomial`], [`Term`], [`Polynomial`]: collected multivariate polynomials
//!   over the rationals
//! - [`RationalFunction`]: quotients kept in a reduced normal form, so that
//!   scalar multiples of one another are recognised structurally
//! - [`Substitution`]: variable eliminations obtained from zero facts
//!
//! # Examples
//!
//! ```
//! use balancer_math::{Polynomial, RationalFunction};
//!
//! // (-2p + 4q) / 6 keeps its scalar content in the numerator
//! let p = Polynomial::from_coeffs_int(&[(-2, &[("p", 1)]), (4, &[("q", 1)])]);
//! let f = RationalFunction::new(p, Polynomial::from_integer(6)).unwrap();
//! let (c, g) = f.cancel_scalar_content();
//! assert_eq!(c.to_string(), "-1/3");
//! assert_eq!(g.to_string(), "p - 2*q");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod polynomial;
pub mod rational_function;
pub mod substitution;
pub mod variable;

pub use polynomial::{Monomial, Polynomial, Term, VarPower};
pub use rational_function::RationalFunction;
pub use substitution::Substitution;
pub use variable::Variable;

pub use num_bigint::BigInt;
pub use num_rational::BigRational;
