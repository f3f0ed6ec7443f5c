//! End-to-end registration flow tests
//!
//! These exercise the whole stack below the rendering layer: the workflow
//! state machine, the step validator, the controller, and the mock backend
//! ports, wired the way the admin surface wires them.

use std::sync::Arc;

use domain_identity::DocumentType;
use domain_registration::{
    AddressType, Address, ContactDetails, LookupRequest, LookupResolution, MockRegistryPort,
    PersonNature, RegistrationController, RegistrationStep, RegistrationWorkflow,
    SubmitResolution, WorkflowPhase,
};
use domain_registration::ports::mock::FailureMode;
use test_utils::{init_test_logging, IdentityFixtures, SummaryFixtures, SAMPLE_NATIONAL_ID};

fn controller(port: &Arc<MockRegistryPort>) -> RegistrationController {
    RegistrationController::new(port.clone(), port.clone())
}

/// Drives a workflow from lookup through review for a natural person
async fn fill_natural_person(
    controller: &RegistrationController,
    workflow: &mut RegistrationWorkflow,
    national_id: &str,
) {
    let resolution = controller
        .submit_lookup(
            workflow,
            LookupRequest::new(DocumentType::NationalId, national_id),
        )
        .await
        .unwrap();
    assert_eq!(resolution, LookupResolution::Advanced);

    workflow.set_nature(PersonNature::NaturalPerson).unwrap();
    workflow.submit_step().unwrap();

    workflow
        .update_natural(|n| {
            n.surname = "Dlamini".to_string();
            n.first_names = "Thabo Peter".to_string();
            n.initials = "TP".to_string();
        })
        .unwrap();
    workflow
        .set_contact(ContactDetails {
            email: Some("thabo.dlamini@example.org".to_string()),
            phone: Some("+27215550134".to_string()),
        })
        .unwrap();
    workflow.submit_step().unwrap();

    workflow.submit_step().unwrap(); // documents: lookup document suffices

    workflow
        .add_address(Address::new(
            AddressType::Residential,
            "12 Loop Street",
            "Cape Town",
            "8001",
        ))
        .unwrap();
    workflow.submit_step().unwrap();

    assert_eq!(workflow.current_step(), RegistrationStep::Review);
}

#[tokio::test]
async fn registered_person_is_found_by_subsequent_lookup() {
    init_test_logging();
    let port = Arc::new(MockRegistryPort::new());
    let controller = controller(&port);

    // First registration runs to completion
    let mut workflow = RegistrationWorkflow::new();
    fill_natural_person(&controller, &mut workflow, SAMPLE_NATIONAL_ID).await;
    let resolution = controller.submit_review(&mut workflow).await.unwrap();
    let person_id = match resolution {
        SubmitResolution::Completed(id) => id,
        other => panic!("expected completion, got {other:?}"),
    };
    assert_eq!(workflow.phase(), WorkflowPhase::Submitted(person_id));
    assert_eq!(port.created().await.len(), 1);

    // A second registration attempt for the same document halts at lookup
    let mut second = RegistrationWorkflow::new();
    let resolution = controller
        .submit_lookup(
            &mut second,
            LookupRequest::new(DocumentType::NationalId, SAMPLE_NATIONAL_ID),
        )
        .await
        .unwrap();
    assert_eq!(resolution, LookupResolution::MatchFound);
    assert_eq!(second.current_step().index(), 0);
    assert_eq!(second.existing_match().map(|m| m.id), Some(person_id));
}

#[tokio::test]
async fn preregistered_person_blocks_and_reset_recovers() {
    init_test_logging();
    let port = Arc::new(
        MockRegistryPort::new()
            .with_person(
                DocumentType::NationalId,
                SAMPLE_NATIONAL_ID,
                SummaryFixtures::natural_person("Thabo Dlamini"),
            )
            .await,
    );
    let controller = controller(&port);

    let mut workflow = RegistrationWorkflow::new();
    let resolution = controller
        .submit_lookup(
            &mut workflow,
            LookupRequest::new(DocumentType::NationalId, SAMPLE_NATIONAL_ID),
        )
        .await
        .unwrap();
    assert_eq!(resolution, LookupResolution::MatchFound);

    // Reset abandons the halted run; a different document registers fine
    workflow.reset();
    let other_id = IdentityFixtures::female_national_id();
    fill_natural_person(&controller, &mut workflow, &other_id).await;
    let resolution = controller.submit_review(&mut workflow).await.unwrap();
    assert!(matches!(resolution, SubmitResolution::Completed(_)));
}

#[tokio::test]
async fn backend_outage_blocks_then_retry_succeeds() {
    init_test_logging();
    let port = Arc::new(MockRegistryPort::new());
    let controller = controller(&port);

    let mut workflow = RegistrationWorkflow::new();
    fill_natural_person(&controller, &mut workflow, SAMPLE_NATIONAL_ID).await;

    port.fail_next(FailureMode::Unavailable).await;
    let resolution = controller.submit_review(&mut workflow).await.unwrap();
    assert_eq!(resolution, SubmitResolution::Failed);
    assert_eq!(workflow.current_step(), RegistrationStep::Review);
    assert!(workflow.last_remote_error().is_some());
    assert_eq!(port.created().await.len(), 0);

    let resolution = controller.submit_review(&mut workflow).await.unwrap();
    assert!(matches!(resolution, SubmitResolution::Completed(_)));
    assert_eq!(port.created().await.len(), 1);
}

#[tokio::test]
async fn derived_attributes_survive_into_persisted_draft() {
    init_test_logging();
    let port = Arc::new(MockRegistryPort::new());
    let controller = controller(&port);

    let mut workflow = RegistrationWorkflow::new();
    fill_natural_person(&controller, &mut workflow, SAMPLE_NATIONAL_ID).await;
    controller.submit_review(&mut workflow).await.unwrap();

    let created = port.created().await;
    let (_, draft) = &created[0];
    let natural = draft.natural.as_ref().unwrap();
    assert_eq!(natural.gender, Some(domain_identity::Gender::Male));
    assert_eq!(
        natural.birth_date,
        chrono::NaiveDate::from_ymd_opt(1980, 1, 1)
    );
    assert!(draft.documents[0].is_current);
}
