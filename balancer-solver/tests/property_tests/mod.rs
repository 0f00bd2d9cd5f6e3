//! Property tests for encodings and oracles
//!
//! This module covers:
//! - Shape of the Farkas matrices for constant implications
//! - Witnesses returned by the sampling oracle

mod matriciser_properties;
mod oracle_properties;
