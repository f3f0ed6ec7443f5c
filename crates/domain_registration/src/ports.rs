//! Registration Domain Ports
//!
//! This module defines the port interfaces the registration workflow
//! consumes. The core owns no durable state: the existence check and the
//! person persistence are both answered by the remote registry backend,
//! reached through an adapter implementing these traits.
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_registration::ports::{ExistenceCheckPort, PersonPersistencePort};
//! use std::sync::Arc;
//!
//! pub struct RegistrationController {
//!     existence: Arc<dyn ExistenceCheckPort>,
//!     persistence: Arc<dyn PersonPersistencePort>,
//! }
//! ```
//!
//! Adapters are chosen at startup: the gateway adapter for production, the
//! in-memory mock for tests.

use async_trait::async_trait;

use registry_kernel::{
    DomainPort, HealthCheckable, OperationMetadata, PersonId, PortError,
};
use domain_identity::DocumentType;

use crate::draft::PersonDraft;
use crate::workflow::ExistenceOutcome;

/// Port answering "does a person with this document already exist"
#[async_trait]
pub trait ExistenceCheckPort: DomainPort + HealthCheckable {
    /// Checks whether a person holding the given document is registered
    ///
    /// # Arguments
    ///
    /// * `document_type` - The captured document type
    /// * `number` - The captured document number
    /// * `metadata` - Optional operation metadata for tracing/auditing
    ///
    /// # Returns
    ///
    /// The existence outcome, or a `PortError` on transport failure. A
    /// transport failure must never be interpreted as "no match".
    async fn lookup(
        &self,
        document_type: DocumentType,
        number: &str,
        metadata: Option<OperationMetadata>,
    ) -> Result<ExistenceOutcome, PortError>;
}

/// Port persisting a completed registration draft
#[async_trait]
pub trait PersonPersistencePort: DomainPort + HealthCheckable {
    /// Creates a new person from the draft
    ///
    /// # Returns
    ///
    /// The identifier assigned by the backend
    async fn create(
        &self,
        draft: &PersonDraft,
        metadata: Option<OperationMetadata>,
    ) -> Result<PersonId, PortError>;

    /// Updates an existing person from the draft
    ///
    /// # Returns
    ///
    /// The identifier of the updated person
    async fn update(
        &self,
        person_id: PersonId,
        draft: &PersonDraft,
        metadata: Option<OperationMetadata>,
    ) -> Result<PersonId, PortError>;
}

/// Mock implementations for testing
///
/// These adapters keep registered persons in memory and support scripted
/// transport failures, so workflow behavior under backend outages can be
/// unit tested without a network.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use chrono::Utc;
    use tokio::sync::RwLock;

    use registry_kernel::{AdapterHealth, HealthCheckResult};

    use crate::workflow::PersonSummary;

    /// The transport failure a mock should inject on its next call
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailureMode {
        Timeout,
        Unavailable,
    }

    impl FailureMode {
        fn to_error(self, operation: &str) -> PortError {
            match self {
                FailureMode::Timeout => PortError::Timeout {
                    operation: operation.to_string(),
                    duration_ms: 30_000,
                },
                FailureMode::Unavailable => PortError::ServiceUnavailable {
                    service: "registry-backend".to_string(),
                },
            }
        }
    }

    /// In-memory mock of both registration ports
    ///
    /// Registered persons are keyed by `(document type, number)`. Draft
    /// creation records the draft and allocates a `PersonId`, so a created
    /// person is subsequently found by the existence check.
    #[derive(Debug, Default)]
    pub struct MockRegistryPort {
        persons: Arc<RwLock<HashMap<(DocumentType, String), PersonSummary>>>,
        created: Arc<RwLock<Vec<(PersonId, PersonDraft)>>>,
        fail_next: Arc<RwLock<Option<FailureMode>>>,
    }

    impl MockRegistryPort {
        /// Creates a new empty mock
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-registers a person for existence-check matches
        pub async fn with_person(
            self,
            document_type: DocumentType,
            number: impl Into<String>,
            summary: PersonSummary,
        ) -> Self {
            self.persons
                .write()
                .await
                .insert((document_type, number.into()), summary);
            self
        }

        /// Injects a transport failure on the next port call
        pub async fn fail_next(&self, mode: FailureMode) {
            *self.fail_next.write().await = Some(mode);
        }

        /// Returns the drafts persisted through this mock
        pub async fn created(&self) -> Vec<(PersonId, PersonDraft)> {
            self.created.read().await.clone()
        }

        async fn take_failure(&self, operation: &str) -> Result<(), PortError> {
            if let Some(mode) = self.fail_next.write().await.take() {
                return Err(mode.to_error(operation));
            }
            Ok(())
        }
    }

    impl DomainPort for MockRegistryPort {}

    #[async_trait]
    impl HealthCheckable for MockRegistryPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "mock-registry-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl ExistenceCheckPort for MockRegistryPort {
        async fn lookup(
            &self,
            document_type: DocumentType,
            number: &str,
            _metadata: Option<OperationMetadata>,
        ) -> Result<ExistenceOutcome, PortError> {
            self.take_failure("lookup").await?;
            let persons = self.persons.read().await;
            Ok(match persons.get(&(document_type, number.to_string())) {
                Some(summary) => ExistenceOutcome::Match(summary.clone()),
                None => ExistenceOutcome::NoMatch,
            })
        }
    }

    #[async_trait]
    impl PersonPersistencePort for MockRegistryPort {
        async fn create(
            &self,
            draft: &PersonDraft,
            _metadata: Option<OperationMetadata>,
        ) -> Result<PersonId, PortError> {
            self.take_failure("create").await?;

            let person_id = PersonId::new_v7();
            if let (Some(document), Some(nature)) = (draft.documents.first(), draft.nature) {
                let summary = PersonSummary {
                    id: person_id,
                    display_name: draft.display_name(),
                    nature,
                    is_active: true,
                };
                self.persons
                    .write()
                    .await
                    .insert((document.type_code, document.number.clone()), summary);
            }
            self.created.write().await.push((person_id, draft.clone()));
            Ok(person_id)
        }

        async fn update(
            &self,
            person_id: PersonId,
            draft: &PersonDraft,
            _metadata: Option<OperationMetadata>,
        ) -> Result<PersonId, PortError> {
            self.take_failure("update").await?;
            self.created.write().await.push((person_id, draft.clone()));
            Ok(person_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::mock::{FailureMode, MockRegistryPort};
    use crate::nature::PersonNature;
    use crate::workflow::PersonSummary;

    fn summary() -> PersonSummary {
        PersonSummary {
            id: PersonId::new_v7(),
            display_name: "Thabo Dlamini".to_string(),
            nature: PersonNature::NaturalPerson,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_mock_lookup_match_and_no_match() {
        let port = MockRegistryPort::new()
            .with_person(DocumentType::NationalId, "8001015009087", summary())
            .await;

        let hit = port
            .lookup(DocumentType::NationalId, "8001015009087", None)
            .await
            .unwrap();
        assert!(matches!(hit, ExistenceOutcome::Match(_)));

        let miss = port
            .lookup(DocumentType::NationalId, "9202204720082", None)
            .await
            .unwrap();
        assert_eq!(miss, ExistenceOutcome::NoMatch);
    }

    #[tokio::test]
    async fn test_mock_injected_failure_fires_once() {
        let port = MockRegistryPort::new();
        port.fail_next(FailureMode::Unavailable).await;

        let first = port.lookup(DocumentType::NationalId, "8001015009087", None).await;
        assert!(first.is_err());
        assert!(first.unwrap_err().is_transient());

        let second = port.lookup(DocumentType::NationalId, "8001015009087", None).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn test_mock_create_registers_person() {
        let port = MockRegistryPort::new();

        let mut draft = PersonDraft::new();
        draft.set_nature(PersonNature::NaturalPerson);
        draft.add_document(
            domain_identity::IdentityDocument::new(DocumentType::NationalId, "8001015009087")
                .as_current(),
        );

        let person_id = port.create(&draft, None).await.unwrap();
        assert_eq!(port.created().await.len(), 1);

        let found = port
            .lookup(DocumentType::NationalId, "8001015009087", None)
            .await
            .unwrap();
        match found {
            ExistenceOutcome::Match(summary) => assert_eq!(summary.id, person_id),
            ExistenceOutcome::NoMatch => panic!("created person should be found"),
        }
    }

    #[tokio::test]
    async fn test_mock_update_keeps_person_id() {
        let port = MockRegistryPort::new();

        let mut draft = PersonDraft::new();
        draft.set_nature(PersonNature::NaturalPerson);
        let person_id = port.create(&draft, None).await.unwrap();

        draft.set_nationality("ZA");
        let updated_id = port.update(person_id, &draft, None).await.unwrap();

        assert_eq!(updated_id, person_id);
        assert_eq!(port.created().await.len(), 2);
    }
}
