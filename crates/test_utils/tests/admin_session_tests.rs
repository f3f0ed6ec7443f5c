//! Session-wrapped registration tests
//!
//! The admin surface opens a session, checks permissions, and only then
//! drives a registration workflow. The refresh task runs alongside and
//! must never disturb the in-progress draft.

use std::sync::Arc;
use std::time::Duration;

use domain_identity::DocumentType;
use domain_registration::{
    LookupRequest, LookupResolution, MockRegistryPort, RegistrationController,
    RegistrationWorkflow,
};
use domain_session::token::permissions;
use domain_session::{MockAuthPort, Session, SessionConfig, UserProfile};
use registry_kernel::UserId;
use test_utils::{init_test_logging, SAMPLE_NATIONAL_ID};

const SECRET: &str = "test-secret";

fn examiner_profile() -> UserProfile {
    UserProfile {
        user_id: UserId::new_v7(),
        username: "examiner1".to_string(),
        display_name: "Examiner One".to_string(),
        roles: vec![
            permissions::PERSON_READ.to_string(),
            permissions::PERSON_WRITE.to_string(),
        ],
    }
}

fn session_config() -> SessionConfig {
    SessionConfig {
        jwt_secret: SECRET.to_string(),
        refresh_interval_secs: 1,
    }
}

#[tokio::test]
async fn refresh_task_does_not_disturb_workflow_state() {
    init_test_logging();

    let auth = Arc::new(
        MockAuthPort::new(SECRET)
            .with_user("examiner1", "pw", examiner_profile())
            .await,
    );
    let mut session = Session::login(auth.clone(), session_config(), "examiner1", "pw")
        .await
        .unwrap();
    session
        .require_permission(permissions::PERSON_WRITE)
        .await
        .unwrap();
    session.start_refresh();

    let port = Arc::new(MockRegistryPort::new());
    let controller = RegistrationController::new(port.clone(), port.clone());
    let mut workflow = RegistrationWorkflow::new();

    let resolution = controller
        .submit_lookup(
            &mut workflow,
            LookupRequest::new(DocumentType::NationalId, SAMPLE_NATIONAL_ID),
        )
        .await
        .unwrap();
    assert_eq!(resolution, LookupResolution::Advanced);
    let draft_id = workflow.draft().id;

    // Let at least one refresh tick land while the workflow is mid-flight
    tokio::time::sleep(Duration::from_millis(1300)).await;
    assert!(auth.refresh_calls() >= 1);

    // The refresh swapped the credential and nothing else
    assert!(session.claims().await.is_ok());
    assert_eq!(workflow.draft().id, draft_id);
    assert_eq!(workflow.current_step().index(), 1);
    assert!(workflow.draft().derived.is_some());
}

#[tokio::test]
async fn session_without_write_permission_is_refused() {
    init_test_logging();

    let mut profile = examiner_profile();
    profile.roles = vec![permissions::PERSON_READ.to_string()];

    let auth = Arc::new(
        MockAuthPort::new(SECRET)
            .with_user("viewer", "pw", profile)
            .await,
    );
    let session = Session::login(auth, session_config(), "viewer", "pw")
        .await
        .unwrap();

    assert!(session
        .require_permission(permissions::PERSON_READ)
        .await
        .is_ok());
    assert!(session
        .require_permission(permissions::PERSON_WRITE)
        .await
        .is_err());
}
