//! # archcov-core
//!
//! Core errors, configuration, tracing setup, and shared collection types
//! for the archcov architectural-coupling engine.

pub mod config;
pub mod errors;
pub mod tracing_setup;
pub mod types;
