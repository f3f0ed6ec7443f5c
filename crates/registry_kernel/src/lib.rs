//! Registry Kernel - Foundational types and utilities for the registry core
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Strongly-typed identifiers
//! - The shared port error taxonomy and adapter infrastructure
//! - The V-series validation vocabulary

pub mod identifiers;
pub mod ports;
pub mod validation;

pub use identifiers::{PersonId, DraftId, DocumentId, AddressId, SessionId, UserId};
pub use ports::{
    PortError, DomainPort, OperationMetadata,
    AdapterHealth, CircuitBreakerConfig,
    HealthCheckable, HealthCheckResult,
};
pub use validation::{RuleCode, ValidationIssue, ValidationOutcome};
