//! Property-based testing entry point for balancer-core
//!
//! Run with: cargo test --test property_based

mod property_tests;
