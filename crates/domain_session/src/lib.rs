//! Session Domain
//!
//! This crate owns the authenticated session surrounding the registry admin
//! workflows: the authentication collaborator contract, the JWT credential
//! helpers, and the [`Session`] object that holds the credential and its
//! periodic refresh task.
//!
//! The session is passed by reference to whichever component needs it; the
//! refresh timer is a cancellable task owned by the session's lifecycle,
//! not module-level state. Refresh success or failure never mutates
//! anything outside the credential itself.

pub mod config;
pub mod error;
pub mod ports;
pub mod session;
pub mod token;

pub use config::SessionConfig;
pub use error::SessionError;
pub use ports::{AuthPort, LoginSuccess, SessionCredential, UserProfile};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::MockAuthPort;
pub use session::Session;
pub use token::{create_token, has_role, validate_token, Claims};
