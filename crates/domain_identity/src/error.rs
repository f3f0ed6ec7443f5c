//! Identity domain errors

use thiserror::Error;

/// Errors that can occur in the identity domain
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Document type code not recognized
    #[error("Unknown document type: {0}")]
    UnknownDocumentType(String),
}
