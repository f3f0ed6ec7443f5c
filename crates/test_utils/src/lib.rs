//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! registry core test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common entities
//! - `builders`: Builder patterns for test data construction
//! - `generators`: Property-based test data generators
//! - `logging`: One-time tracing setup for tests

pub mod fixtures;
pub mod builders;
pub mod generators;
pub mod logging;

pub use fixtures::*;
pub use builders::*;
pub use generators::*;
pub use logging::*;
