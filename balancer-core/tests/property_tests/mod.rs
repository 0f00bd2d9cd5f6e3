//! Property tests for the assumption domain and elimination
//!
//! This module covers:
//! - Lattice laws of the sign-type codes
//! - Normalization and merging of assumptions
//! - Reduced form of constant matrices

mod assumption_properties;
mod rref_properties;
