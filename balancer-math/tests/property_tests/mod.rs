//! Property tests for the symbolic algebra layer
//!
//! This module covers:
//! - Polynomial ring laws on small random polynomials
//! - Scale invariance of content cancellation
//! - Rational function normal forms

mod polynomial_properties;
mod rational_function_properties;
