//! Identity Document Domain
//!
//! This crate owns the identity-document data model and the pure
//! validation/derivation logic over national identity numbers:
//!
//! - **Checksum validation**: the 13-digit national ID check digit
//! - **Derivation**: gender and birth date extracted from fixed digit
//!   positions, cached on the in-progress registration draft
//! - **Document rules**: per-type number formats, expiry and country-of-issue
//!   requirements, and the one-current-document invariant
//!
//! Everything here is side-effect free. The registration workflow calls into
//! this crate to gate step advancement and to seed derived fields.
//!
//! # Examples
//!
//! ```rust
//! use domain_identity::national_id;
//!
//! let id = "8001015009087";
//! assert!(national_id::validate_checksum(id));
//!
//! let attrs = national_id::derive_attributes(id).unwrap();
//! assert_eq!(attrs.gender, national_id::Gender::Male);
//! ```

pub mod national_id;
pub mod document;
pub mod validation;
pub mod error;

pub use national_id::{Gender, DerivedIdentityAttributes, ID_NUMBER_LENGTH};
pub use document::{DocumentType, IdentityDocument};
pub use validation::DocumentValidator;
pub use error::IdentityError;
