//! Registration controller
//!
//! Thin async driver around the pure [`RegistrationWorkflow`]: it owns the
//! two backend ports and runs the ticket dance for the steps whose forward
//! transition depends on a collaborator. Everything it does is expressible
//! as `begin_* → port call → resolve_*`, so the state machine stays fully
//! unit-testable without I/O.

use std::sync::Arc;
use tracing::instrument;

use crate::error::RegistrationError;
use crate::ports::{ExistenceCheckPort, PersonPersistencePort};
use crate::workflow::{
    LookupRequest, LookupResolution, RegistrationWorkflow, SubmitResolution,
};

/// Drives a [`RegistrationWorkflow`] against the backend ports
pub struct RegistrationController {
    existence: Arc<dyn ExistenceCheckPort>,
    persistence: Arc<dyn PersonPersistencePort>,
}

impl RegistrationController {
    /// Creates a controller over the given ports
    pub fn new(
        existence: Arc<dyn ExistenceCheckPort>,
        persistence: Arc<dyn PersonPersistencePort>,
    ) -> Self {
        Self {
            existence,
            persistence,
        }
    }

    /// Submits the Lookup step: local validation, then the existence check
    ///
    /// While the check is outstanding the workflow rejects re-submission;
    /// the single call made here is resolved against current workflow
    /// state, so a reset issued meanwhile discards the answer.
    #[instrument(skip(self, workflow), fields(number_len = request.number.len()))]
    pub async fn submit_lookup(
        &self,
        workflow: &mut RegistrationWorkflow,
        request: LookupRequest,
    ) -> Result<LookupResolution, RegistrationError> {
        let ticket = workflow.begin_lookup(request.clone())?;
        let answer = self
            .existence
            .lookup(request.document_type, &request.number, None)
            .await;
        Ok(workflow.resolve_lookup(ticket, answer))
    }

    /// Submits the Review step: full re-validation, then persistence
    #[instrument(skip(self, workflow))]
    pub async fn submit_review(
        &self,
        workflow: &mut RegistrationWorkflow,
    ) -> Result<SubmitResolution, RegistrationError> {
        let ticket = workflow.begin_submit()?;
        let answer = self.persistence.create(workflow.draft(), None).await;
        Ok(workflow.resolve_submit(ticket, answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::mock::{FailureMode, MockRegistryPort};
    use crate::workflow::{RegistrationStep, WorkflowPhase};
    use domain_identity::DocumentType;

    fn controller(port: Arc<MockRegistryPort>) -> RegistrationController {
        RegistrationController::new(port.clone(), port)
    }

    #[tokio::test]
    async fn test_lookup_no_match_advances() {
        let port = Arc::new(MockRegistryPort::new());
        let controller = controller(port);
        let mut workflow = RegistrationWorkflow::new();

        let resolution = controller
            .submit_lookup(
                &mut workflow,
                LookupRequest::new(DocumentType::NationalId, "8001015009087"),
            )
            .await
            .unwrap();

        assert_eq!(resolution, LookupResolution::Advanced);
        assert_eq!(workflow.current_step(), RegistrationStep::NatureSelection);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_retryable() {
        let port = Arc::new(MockRegistryPort::new());
        port.fail_next(FailureMode::Timeout).await;
        let controller = controller(port);
        let mut workflow = RegistrationWorkflow::new();

        let request = LookupRequest::new(DocumentType::NationalId, "8001015009087");
        let blocked = controller
            .submit_lookup(&mut workflow, request.clone())
            .await
            .unwrap();
        assert_eq!(blocked, LookupResolution::Blocked);
        assert_eq!(workflow.phase(), WorkflowPhase::Active);

        // The failure injected once; the retry goes through
        let retried = controller.submit_lookup(&mut workflow, request).await.unwrap();
        assert_eq!(retried, LookupResolution::Advanced);
    }
}
