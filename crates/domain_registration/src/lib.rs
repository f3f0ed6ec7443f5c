//! Person Registration Domain
//!
//! This crate drives the multi-step person registration workflow of the
//! registry admin surface:
//!
//! - **PersonDraft**: the in-progress aggregate built across the steps
//! - **RegistrationWorkflow**: the pure step-gated state machine
//!   (Lookup → NatureSelection → BasicInfo → Documents → Addresses → Review)
//! - **StepValidator**: per-step field-subset validation with V-series codes
//! - **Ports**: the existence-check and person-persistence collaborator
//!   contracts, with an in-memory mock and the remote gateway adapter
//!
//! The state machine performs no I/O of its own. Remote transitions hand
//! out epoch-stamped tickets which the [`RegistrationController`] resolves
//! against the ports, so every workflow rule is unit-testable without a
//! network or a rendering layer.
//!
//! # Examples
//!
//! ```rust,ignore
//! use domain_registration::{RegistrationController, RegistrationWorkflow, LookupRequest};
//! use domain_identity::DocumentType;
//!
//! let mut workflow = RegistrationWorkflow::new();
//! let controller = RegistrationController::new(existence_port, persistence_port);
//!
//! let request = LookupRequest::new(DocumentType::NationalId, "8001015009087");
//! match controller.submit_lookup(&mut workflow, request).await? {
//!     LookupResolution::Advanced => { /* continue to nature selection */ }
//!     LookupResolution::MatchFound => { /* surface the existing person */ }
//!     LookupResolution::Blocked | LookupResolution::Stale => { /* retry */ }
//! }
//! ```

pub mod address;
pub mod controller;
pub mod draft;
pub mod error;
pub mod nature;
pub mod ports;
pub mod validation;
pub mod workflow;
pub mod adapters;

pub use address::{Address, AddressType};
pub use controller::RegistrationController;
pub use draft::{ContactDetails, NaturalPersonDetails, OrganizationDetails, PersonDraft};
pub use error::RegistrationError;
pub use nature::PersonNature;
pub use ports::{ExistenceCheckPort, PersonPersistencePort};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockRegistryPort;
pub use validation::StepValidator;
pub use workflow::{
    ExistenceOutcome, LookupRequest, LookupResolution, PersonSummary,
    RegistrationStep, RegistrationWorkflow, RemoteTicket, SubmitResolution,
    WorkflowPhase,
};
pub use adapters::{RegistryGatewayAdapter, RegistryGatewayConfig};
