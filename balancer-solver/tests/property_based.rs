//! Property-based testing entry point for balancer-solver
//!
//! Run with: cargo test --test property_based

mod property_tests;
