//! Registration domain errors
//!
//! Local validation failures are field-scoped and non-fatal: they surface as
//! a [`RegistrationError::StepRejected`] carrying the full outcome so the
//! user can correct and retry. Remote failures never appear here directly;
//! the workflow converts them into a retryable user-visible message.

use thiserror::Error;

use registry_kernel::ValidationOutcome;

use crate::workflow::RegistrationStep;

/// Errors that can occur in the registration domain
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The workflow has reached a terminal phase and accepts no events
    #[error("Workflow is closed: {0}")]
    WorkflowClosed(String),

    /// An event was raised for a step other than the current one
    #[error("Expected step {expected}, workflow is at {actual}")]
    WrongStep {
        expected: RegistrationStep,
        actual: RegistrationStep,
    },

    /// The step's field subset failed validation
    #[error("Step {step} failed validation: {}", .outcome.summary())]
    StepRejected {
        step: RegistrationStep,
        outcome: ValidationOutcome,
    },

    /// A remote call for this step is already outstanding
    #[error("A remote call is already in flight for step {0}")]
    CallInFlight(RegistrationStep),

    /// A matching person exists; forward progress is blocked
    #[error("An existing person matches the supplied document")]
    ExistingPersonBlocks,

    /// The lookup document's type and number cannot be changed or removed
    #[error("The lookup document is immutable")]
    LookupDocumentImmutable,

    /// Document index outside the draft's document list
    #[error("Document index out of range: {0}")]
    DocumentIndexOutOfRange(usize),

    /// Address index outside the draft's address list
    #[error("Address index out of range: {0}")]
    AddressIndexOutOfRange(usize),

    /// Nature code not recognized
    #[error("Unknown person nature code: {0}")]
    UnknownNatureCode(String),
}

impl RegistrationError {
    /// Creates a StepRejected error from a validation outcome
    pub fn rejected(step: RegistrationStep, outcome: ValidationOutcome) -> Self {
        RegistrationError::StepRejected { step, outcome }
    }
}
