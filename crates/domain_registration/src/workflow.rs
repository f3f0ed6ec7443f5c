//! Registration workflow state machine
//!
//! Drives the ordered step sequence Lookup → NatureSelection → BasicInfo →
//! Documents → Addresses → Review, gating forward progress on step-scoped
//! validation and on the remote existence check.
//!
//! # Invariants
//!
//! - The workflow cannot advance past Lookup while an existing-person match
//!   is recorded, regardless of step-validity flags
//! - Step validity is recomputed on every submit attempt and invalidated
//!   when an upstream field it depends on changes
//! - At most one remote call is outstanding at a time; re-submission while
//!   a call is in flight is rejected
//! - Backward movement never re-validates; reset clears all draft state
//!
//! # Remote calls
//!
//! The machine itself performs no I/O. A step whose transition depends on a
//! collaborator hands out a [`RemoteTicket`] from `begin_*`, and the caller
//! feeds the collaborator's answer back through `resolve_*`. Tickets carry
//! the workflow epoch: reset bumps the epoch, so a response that arrives
//! after a reset (or after the user navigated away from the step) is
//! recognized as stale and discarded without touching state. There is no
//! cancellation and no locking.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use registry_kernel::{PersonId, PortError};
use domain_identity::{national_id, DocumentType, IdentityDocument};

use crate::draft::{ContactDetails, NaturalPersonDetails, OrganizationDetails, PersonDraft};
use crate::error::RegistrationError;
use crate::nature::PersonNature;
use crate::validation::StepValidator;
use crate::address::Address;

/// The ordered registration steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegistrationStep {
    Lookup,
    NatureSelection,
    BasicInfo,
    Documents,
    Addresses,
    Review,
}

impl RegistrationStep {
    /// All steps in workflow order
    pub const ALL: [RegistrationStep; 6] = [
        RegistrationStep::Lookup,
        RegistrationStep::NatureSelection,
        RegistrationStep::BasicInfo,
        RegistrationStep::Documents,
        RegistrationStep::Addresses,
        RegistrationStep::Review,
    ];

    /// Number of steps
    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based position of this step
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    /// The following step, if any
    pub fn next(&self) -> Option<RegistrationStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// The preceding step, if any
    pub fn previous(&self) -> Option<RegistrationStep> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

impl fmt::Display for RegistrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistrationStep::Lookup => "Lookup",
            RegistrationStep::NatureSelection => "NatureSelection",
            RegistrationStep::BasicInfo => "BasicInfo",
            RegistrationStep::Documents => "Documents",
            RegistrationStep::Addresses => "Addresses",
            RegistrationStep::Review => "Review",
        };
        f.write_str(name)
    }
}

/// Workflow lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    /// Accepting events
    Active,
    /// Draft persisted successfully; terminal
    Submitted(PersonId),
    /// Explicitly abandoned; terminal
    Abandoned,
}

/// The document type and number captured in the Lookup step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub document_type: DocumentType,
    pub number: String,
    pub country_of_issue: Option<String>,
}

impl LookupRequest {
    /// Creates a lookup request
    pub fn new(document_type: DocumentType, number: impl Into<String>) -> Self {
        Self {
            document_type,
            number: number.into(),
            country_of_issue: None,
        }
    }

    /// Sets the country of issue
    pub fn with_country_of_issue(mut self, country: impl Into<String>) -> Self {
        self.country_of_issue = Some(country.into());
        self
    }
}

/// Summary of an already-registered person returned by the existence check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSummary {
    pub id: PersonId,
    pub display_name: String,
    pub nature: PersonNature,
    pub is_active: bool,
}

/// Answer of the existence-check collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExistenceOutcome {
    /// A person with the supplied document already exists
    Match(PersonSummary),
    /// No person matches the supplied document
    NoMatch,
}

/// The kind of remote call a ticket refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    ExistenceCheck,
    Persist,
}

/// Handle for an outstanding remote call
///
/// Obtained from `begin_*`, consumed by the matching `resolve_*`. A ticket
/// whose epoch no longer matches the workflow is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteTicket {
    epoch: u64,
    call: RemoteCall,
}

/// How a lookup resolution was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupResolution {
    /// The response no longer matches workflow state and was discarded
    Stale,
    /// Transport failure; the step stays blocked and retryable
    Blocked,
    /// An existing person matches; forward progress is halted
    MatchFound,
    /// No match; the workflow advanced to nature selection
    Advanced,
}

/// How a persistence resolution was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitResolution {
    /// The response no longer matches workflow state and was discarded
    Stale,
    /// Persistence failed; the workflow stays at Review and is retryable
    Failed,
    /// The person was persisted; the workflow is complete
    Completed(PersonId),
}

/// The registration workflow state machine
#[derive(Debug)]
pub struct RegistrationWorkflow {
    draft: PersonDraft,
    current_step: RegistrationStep,
    step_validity: [bool; RegistrationStep::COUNT],
    existing_match: Option<PersonSummary>,
    phase: WorkflowPhase,
    in_flight: Option<RemoteCall>,
    pending_lookup: Option<LookupRequest>,
    epoch: u64,
    last_remote_error: Option<String>,
}

impl RegistrationWorkflow {
    /// Creates a fresh workflow at the Lookup step with an empty draft
    pub fn new() -> Self {
        Self {
            draft: PersonDraft::new(),
            current_step: RegistrationStep::Lookup,
            step_validity: [false; RegistrationStep::COUNT],
            existing_match: None,
            phase: WorkflowPhase::Active,
            in_flight: None,
            pending_lookup: None,
            epoch: 0,
            last_remote_error: None,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The in-progress draft
    pub fn draft(&self) -> &PersonDraft {
        &self.draft
    }

    /// The step the workflow is currently at
    pub fn current_step(&self) -> RegistrationStep {
        self.current_step
    }

    /// The lifecycle phase
    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    /// The recorded existing-person match, if any
    pub fn existing_match(&self) -> Option<&PersonSummary> {
        self.existing_match.as_ref()
    }

    /// The validity flag last computed for `step`
    pub fn is_step_valid(&self, step: RegistrationStep) -> bool {
        self.step_validity[step.index()]
    }

    /// Whether a remote call is outstanding
    pub fn has_call_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The last retryable remote error surfaced to the user, if any
    pub fn last_remote_error(&self) -> Option<&str> {
        self.last_remote_error.as_deref()
    }

    fn ensure_active(&self) -> Result<(), RegistrationError> {
        match self.phase {
            WorkflowPhase::Active => Ok(()),
            WorkflowPhase::Submitted(id) => Err(RegistrationError::WorkflowClosed(format!(
                "submitted as {id}"
            ))),
            WorkflowPhase::Abandoned => {
                Err(RegistrationError::WorkflowClosed("abandoned".to_string()))
            }
        }
    }

    fn ensure_at(&self, step: RegistrationStep) -> Result<(), RegistrationError> {
        if self.current_step != step {
            return Err(RegistrationError::WrongStep {
                expected: step,
                actual: self.current_step,
            });
        }
        Ok(())
    }

    fn ensure_no_call_in_flight(&self) -> Result<(), RegistrationError> {
        if self.in_flight.is_some() {
            return Err(RegistrationError::CallInFlight(self.current_step));
        }
        Ok(())
    }

    fn set_validity(&mut self, step: RegistrationStep, valid: bool) {
        self.step_validity[step.index()] = valid;
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Starts the Lookup submission
    ///
    /// Validates the request locally first: a request that fails the format
    /// gate is rejected here and no existence check must be made for it.
    /// On success the workflow records the single outstanding existence
    /// check and returns the ticket the caller must resolve.
    pub fn begin_lookup(&mut self, request: LookupRequest) -> Result<RemoteTicket, RegistrationError> {
        self.ensure_active()?;
        self.ensure_at(RegistrationStep::Lookup)?;
        self.ensure_no_call_in_flight()?;

        let outcome = StepValidator::validate_lookup_request(&request);
        if !outcome.passed() {
            self.set_validity(RegistrationStep::Lookup, false);
            return Err(RegistrationError::rejected(RegistrationStep::Lookup, outcome));
        }

        debug!(document_type = %request.document_type, "lookup submitted, existence check outstanding");
        self.pending_lookup = Some(request);
        self.in_flight = Some(RemoteCall::ExistenceCheck);
        Ok(RemoteTicket {
            epoch: self.epoch,
            call: RemoteCall::ExistenceCheck,
        })
    }

    /// Applies the existence-check answer for an earlier [`begin_lookup`]
    ///
    /// A ticket that no longer matches the workflow (reset happened, the
    /// user navigated away, or a second resolution arrives) is discarded as
    /// [`LookupResolution::Stale`].
    ///
    /// [`begin_lookup`]: RegistrationWorkflow::begin_lookup
    pub fn resolve_lookup(
        &mut self,
        ticket: RemoteTicket,
        answer: Result<ExistenceOutcome, PortError>,
    ) -> LookupResolution {
        let expected = ticket.epoch == self.epoch
            && ticket.call == RemoteCall::ExistenceCheck
            && self.in_flight == Some(RemoteCall::ExistenceCheck)
            && self.current_step == RegistrationStep::Lookup
            && self.phase == WorkflowPhase::Active;
        if !expected {
            debug!("discarding stale existence-check response");
            return LookupResolution::Stale;
        }

        self.in_flight = None;
        let request = match self.pending_lookup.take() {
            Some(request) => request,
            None => return LookupResolution::Stale,
        };

        match answer {
            Err(error) => {
                // A failed check blocks; it is never treated as "no match"
                warn!(%error, "existence check failed");
                self.last_remote_error = Some(format!(
                    "The registry could not be reached to check for an existing person. Please try again. ({error})"
                ));
                LookupResolution::Blocked
            }
            Ok(ExistenceOutcome::Match(summary)) => {
                debug!(person = %summary.id, "existence check found a match");
                self.last_remote_error = None;
                self.existing_match = Some(summary);
                self.set_validity(RegistrationStep::Lookup, false);
                LookupResolution::MatchFound
            }
            Ok(ExistenceOutcome::NoMatch) => {
                self.last_remote_error = None;
                self.existing_match = None;
                self.apply_lookup_document(request);
                self.set_validity(RegistrationStep::Lookup, true);
                self.current_step = RegistrationStep::NatureSelection;
                debug!("no existing person, advanced to nature selection");
                LookupResolution::Advanced
            }
        }
    }

    /// Installs the lookup document as entry 0 and seeds derived attributes
    fn apply_lookup_document(&mut self, request: LookupRequest) {
        let mut document = IdentityDocument::new(request.document_type, request.number.clone());
        document.country_of_issue = request.country_of_issue;
        document.is_current = true;

        if self.draft.documents.is_empty() {
            self.draft.add_document(document);
        } else {
            // Re-submitted lookup replaces the previous lookup document
            self.draft.documents[0] = document;
            self.set_validity(RegistrationStep::Documents, false);
        }

        let derived = if request.document_type == DocumentType::NationalId {
            national_id::derive_attributes(&request.number)
        } else {
            None
        };
        match derived {
            Some(attributes) => self.draft.seed_derived_attributes(attributes),
            None => self.draft.derived = None,
        }
    }

    // ========================================================================
    // Middle steps
    // ========================================================================

    /// Submits the current middle step (NatureSelection through Addresses)
    ///
    /// Validates only the field subset the step owns. A failed validation
    /// records the step as invalid and surfaces the issues; the user can
    /// correct and retry indefinitely.
    pub fn submit_step(&mut self) -> Result<RegistrationStep, RegistrationError> {
        self.ensure_active()?;
        self.ensure_no_call_in_flight()?;

        let next = match self.current_step {
            RegistrationStep::NatureSelection => RegistrationStep::BasicInfo,
            RegistrationStep::BasicInfo => RegistrationStep::Documents,
            RegistrationStep::Documents => RegistrationStep::Addresses,
            RegistrationStep::Addresses => RegistrationStep::Review,
            RegistrationStep::Lookup | RegistrationStep::Review => {
                return Err(RegistrationError::WrongStep {
                    expected: RegistrationStep::NatureSelection,
                    actual: self.current_step,
                });
            }
        };
        if self.existing_match.is_some() {
            return Err(RegistrationError::ExistingPersonBlocks);
        }

        let step = self.current_step;
        let outcome = StepValidator::validate_step(&self.draft, step);
        if !outcome.passed() {
            self.set_validity(step, false);
            return Err(RegistrationError::rejected(step, outcome));
        }

        self.set_validity(step, true);
        self.current_step = next;
        debug!(from = %step, to = %next, "step submitted");
        Ok(next)
    }

    // ========================================================================
    // Review
    // ========================================================================

    /// Starts the final submission
    ///
    /// Re-validates every upstream field subset; the persistence call is
    /// only allowed for a draft that validates in full.
    pub fn begin_submit(&mut self) -> Result<RemoteTicket, RegistrationError> {
        self.ensure_active()?;
        self.ensure_at(RegistrationStep::Review)?;
        self.ensure_no_call_in_flight()?;
        if self.existing_match.is_some() {
            return Err(RegistrationError::ExistingPersonBlocks);
        }

        let outcome = StepValidator::validate_step(&self.draft, RegistrationStep::Review);
        if !outcome.passed() {
            self.set_validity(RegistrationStep::Review, false);
            return Err(RegistrationError::rejected(RegistrationStep::Review, outcome));
        }

        self.set_validity(RegistrationStep::Review, true);
        self.in_flight = Some(RemoteCall::Persist);
        debug!("review submitted, persistence call outstanding");
        Ok(RemoteTicket {
            epoch: self.epoch,
            call: RemoteCall::Persist,
        })
    }

    /// Applies the persistence answer for an earlier [`begin_submit`]
    ///
    /// [`begin_submit`]: RegistrationWorkflow::begin_submit
    pub fn resolve_submit(
        &mut self,
        ticket: RemoteTicket,
        answer: Result<PersonId, PortError>,
    ) -> SubmitResolution {
        let expected = ticket.epoch == self.epoch
            && ticket.call == RemoteCall::Persist
            && self.in_flight == Some(RemoteCall::Persist)
            && self.current_step == RegistrationStep::Review
            && self.phase == WorkflowPhase::Active;
        if !expected {
            debug!("discarding stale persistence response");
            return SubmitResolution::Stale;
        }

        self.in_flight = None;
        match answer {
            Ok(person_id) => {
                debug!(person = %person_id, "draft persisted, workflow complete");
                self.last_remote_error = None;
                self.phase = WorkflowPhase::Submitted(person_id);
                SubmitResolution::Completed(person_id)
            }
            Err(error) => {
                warn!(%error, "persistence call failed");
                self.last_remote_error = Some(format!(
                    "The registration could not be saved. Please try again. ({error})"
                ));
                SubmitResolution::Failed
            }
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Moves one step backward without re-validation
    ///
    /// Returns `false` at the Lookup step. An outstanding remote call is
    /// forgotten: its response will resolve as stale.
    pub fn back(&mut self) -> bool {
        if self.phase != WorkflowPhase::Active {
            return false;
        }
        match self.current_step.previous() {
            Some(previous) => {
                self.in_flight = None;
                self.pending_lookup = None;
                self.current_step = previous;
                debug!(to = %previous, "moved backward");
                true
            }
            None => false,
        }
    }

    /// Abandons the workflow; terminal
    pub fn abandon(&mut self) {
        debug!("workflow abandoned");
        self.in_flight = None;
        self.pending_lookup = None;
        self.phase = WorkflowPhase::Abandoned;
    }

    /// Abandons the current run and reinitializes to a fresh Lookup
    ///
    /// All draft state is cleared. The epoch is bumped so any response
    /// still in flight for the abandoned run resolves as stale.
    pub fn reset(&mut self) {
        debug!("workflow reset");
        self.epoch += 1;
        self.draft = PersonDraft::new();
        self.current_step = RegistrationStep::Lookup;
        self.step_validity = [false; RegistrationStep::COUNT];
        self.existing_match = None;
        self.phase = WorkflowPhase::Active;
        self.in_flight = None;
        self.pending_lookup = None;
        self.last_remote_error = None;
    }

    // ========================================================================
    // Draft mutation
    //
    // Edits go through the workflow so that a change to an upstream field
    // invalidates every step whose field subset depends on it.
    // ========================================================================

    /// Selects the nature category
    ///
    /// Changing the category changes which BasicInfo fields are mandatory,
    /// so BasicInfo's validity is invalidated along with NatureSelection's.
    pub fn set_nature(&mut self, nature: PersonNature) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        self.draft.set_nature(nature);
        self.set_validity(RegistrationStep::NatureSelection, false);
        self.set_validity(RegistrationStep::BasicInfo, false);
        Ok(())
    }

    /// Edits the natural-person name block
    pub fn update_natural(
        &mut self,
        edit: impl FnOnce(&mut NaturalPersonDetails),
    ) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        if let Some(natural) = self.draft.natural.as_mut() {
            edit(natural);
            self.set_validity(RegistrationStep::BasicInfo, false);
        }
        Ok(())
    }

    /// Edits the organization block
    pub fn update_organization(
        &mut self,
        edit: impl FnOnce(&mut OrganizationDetails),
    ) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        if let Some(organization) = self.draft.organization.as_mut() {
            edit(organization);
            self.set_validity(RegistrationStep::BasicInfo, false);
        }
        Ok(())
    }

    /// Sets the nationality
    pub fn set_nationality(&mut self, nationality: impl Into<String>) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        self.draft.set_nationality(nationality);
        self.set_validity(RegistrationStep::BasicInfo, false);
        Ok(())
    }

    /// Updates the contact fields
    pub fn set_contact(&mut self, contact: ContactDetails) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        self.draft.set_contact(contact);
        self.set_validity(RegistrationStep::BasicInfo, false);
        Ok(())
    }

    /// Appends a document to the draft
    ///
    /// Entry 0 is always the lookup document; appended entries validate
    /// independently against their own type's rules at the Documents step.
    pub fn append_document(&mut self, document: IdentityDocument) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        self.draft.add_document(document);
        self.set_validity(RegistrationStep::Documents, false);
        Ok(())
    }

    /// Removes the document at `index`
    ///
    /// The lookup document (entry 0) cannot be removed.
    pub fn remove_document(&mut self, index: usize) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        if index == 0 {
            return Err(RegistrationError::LookupDocumentImmutable);
        }
        if index >= self.draft.documents.len() {
            return Err(RegistrationError::DocumentIndexOutOfRange(index));
        }
        self.draft.documents.remove(index);
        self.set_validity(RegistrationStep::Documents, false);
        Ok(())
    }

    /// Marks the document at `index` as the person's current alias
    pub fn mark_document_current(&mut self, index: usize) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        self.draft.mark_document_current(index)?;
        self.set_validity(RegistrationStep::Documents, false);
        Ok(())
    }

    /// Adds an address to the draft
    pub fn add_address(&mut self, address: Address) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        self.draft.add_address(address);
        self.set_validity(RegistrationStep::Addresses, false);
        Ok(())
    }

    /// Removes the address at `index`
    pub fn remove_address(&mut self, index: usize) -> Result<(), RegistrationError> {
        self.ensure_active()?;
        if index >= self.draft.addresses.len() {
            return Err(RegistrationError::AddressIndexOutOfRange(index));
        }
        self.draft.addresses.remove(index);
        self.set_validity(RegistrationStep::Addresses, false);
        Ok(())
    }
}

impl Default for RegistrationWorkflow {
    fn default() -> Self {
        Self::new()
    }
}
