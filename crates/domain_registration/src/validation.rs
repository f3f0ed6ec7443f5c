//! Step-scoped draft validation
//!
//! Each workflow step owns an explicit subset of the draft's fields, and
//! "can advance" is computed by validating only that subset. Review owns
//! nothing of its own and re-validates every upstream subset.
//!
//! Field ownership:
//!
//! - **Lookup**: the lookup document (entry 0 of the document list)
//! - **NatureSelection**: the nature category
//! - **BasicInfo**: name block / organization block, nationality, contact
//! - **Documents**: the whole document list and the current-document flag
//! - **Addresses**: the address list
//!
//! Rules are deliberately explicit per-step functions rather than a reactive
//! field graph; re-validation happens on every submit attempt and validity
//! is never assumed to persist once upstream fields change.

use chrono::{NaiveDate, Utc};
use validator::Validate;

use registry_kernel::{RuleCode, ValidationOutcome};
use domain_identity::DocumentValidator;

use crate::draft::PersonDraft;
use crate::workflow::{LookupRequest, RegistrationStep};

/// Validator for the per-step field subsets of a [`PersonDraft`]
pub struct StepValidator;

impl StepValidator {
    /// Validates a lookup request before any remote call is made
    ///
    /// An empty or malformed number fails here, and the workflow makes no
    /// existence-check call for a request that fails this gate.
    pub fn validate_lookup_request(request: &LookupRequest) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::ok();

        if request.number.trim().is_empty() {
            outcome.add_issue(
                RuleCode::DocumentNumberRequired,
                "lookup.number",
                "Document number is required",
            );
            return outcome;
        }

        if !request.document_type.number_matches_format(&request.number) {
            outcome.add_issue(
                RuleCode::DocumentNumberFormat,
                "lookup.number",
                format!(
                    "Number does not match the {} format",
                    request.document_type.code()
                ),
            );
            return outcome;
        }

        if request.document_type == domain_identity::DocumentType::NationalId
            && !domain_identity::national_id::validate_checksum(&request.number)
        {
            outcome.add_issue(
                RuleCode::IdentityChecksum,
                "lookup.number",
                "National identity number fails the check digit",
            );
        }

        outcome
    }

    /// Validates the field subset owned by `step`
    pub fn validate_step(draft: &PersonDraft, step: RegistrationStep) -> ValidationOutcome {
        Self::validate_step_at(draft, step, Utc::now().date_naive())
    }

    /// Validates the field subset owned by `step`, evaluated as of `today`
    pub fn validate_step_at(
        draft: &PersonDraft,
        step: RegistrationStep,
        today: NaiveDate,
    ) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::ok();
        match step {
            RegistrationStep::Lookup => Self::validate_lookup(draft, today, &mut outcome),
            RegistrationStep::NatureSelection => Self::validate_nature(draft, &mut outcome),
            RegistrationStep::BasicInfo => Self::validate_basic_info(draft, &mut outcome),
            RegistrationStep::Documents => {
                outcome.merge(DocumentValidator::validate_set(&draft.documents, today));
            }
            RegistrationStep::Addresses => Self::validate_addresses(draft, &mut outcome),
            RegistrationStep::Review => {
                for upstream in [
                    RegistrationStep::Lookup,
                    RegistrationStep::NatureSelection,
                    RegistrationStep::BasicInfo,
                    RegistrationStep::Documents,
                    RegistrationStep::Addresses,
                ] {
                    outcome.merge(Self::validate_step_at(draft, upstream, today));
                }
            }
        }
        outcome
    }

    fn validate_lookup(draft: &PersonDraft, today: NaiveDate, outcome: &mut ValidationOutcome) {
        match draft.documents.first() {
            None => outcome.add_issue(
                RuleCode::DocumentRequired,
                "documents",
                "The lookup document has not been captured",
            ),
            Some(document) => {
                outcome.merge(DocumentValidator::validate_at(document, "documents[0]", today));
            }
        }
    }

    fn validate_nature(draft: &PersonDraft, outcome: &mut ValidationOutcome) {
        if draft.nature.is_none() {
            outcome.add_issue(
                RuleCode::NatureRequired,
                "nature",
                "A person nature category must be selected",
            );
        }
    }

    fn validate_basic_info(draft: &PersonDraft, outcome: &mut ValidationOutcome) {
        let Some(nature) = draft.nature else {
            outcome.add_issue(
                RuleCode::NatureRequired,
                "nature",
                "A person nature category must be selected",
            );
            return;
        };

        if nature.is_natural() {
            match &draft.natural {
                None => {
                    outcome.add_issue(
                        RuleCode::SurnameRequired,
                        "natural.surname",
                        "Surname is required",
                    );
                    outcome.add_issue(
                        RuleCode::FirstNamesRequired,
                        "natural.first_names",
                        "First names are required",
                    );
                    outcome.add_issue(
                        RuleCode::InitialsRequired,
                        "natural.initials",
                        "Initials are required",
                    );
                }
                Some(natural) => {
                    if natural.surname.trim().is_empty() {
                        outcome.add_issue(
                            RuleCode::SurnameRequired,
                            "natural.surname",
                            "Surname is required",
                        );
                    }
                    if natural.first_names.trim().is_empty() {
                        outcome.add_issue(
                            RuleCode::FirstNamesRequired,
                            "natural.first_names",
                            "First names are required",
                        );
                    }
                    if natural.initials.trim().is_empty() {
                        outcome.add_issue(
                            RuleCode::InitialsRequired,
                            "natural.initials",
                            "Initials are required",
                        );
                    }
                }
            }
        } else {
            match &draft.organization {
                None => outcome.add_issue(
                    RuleCode::OrganizationNameRequired,
                    "organization.registered_name",
                    "Registered name is required",
                ),
                Some(organization) => {
                    if organization.registered_name.trim().is_empty() {
                        outcome.add_issue(
                            RuleCode::OrganizationNameRequired,
                            "organization.registered_name",
                            "Registered name is required",
                        );
                    }
                }
            }
            // A lingering name block with initials is a rule violation for
            // organizations, not just stale data
            if let Some(natural) = &draft.natural {
                if !natural.initials.trim().is_empty() {
                    outcome.add_issue(
                        RuleCode::InitialsNotAllowed,
                        "natural.initials",
                        "Organizations must not supply initials",
                    );
                }
            }
        }

        if let Some(nationality) = &draft.nationality {
            if nationality.len() != 2 || !nationality.chars().all(|c| c.is_ascii_uppercase()) {
                outcome.add_warning(
                    RuleCode::NationalityFormat,
                    "nationality",
                    "Nationality should be a 2-letter ISO country code",
                );
            }
        }

        if draft.contact.validate().is_err() {
            outcome.add_issue(
                RuleCode::EmailFormat,
                "contact.email",
                "Email address is not valid",
            );
        }
    }

    fn validate_addresses(draft: &PersonDraft, outcome: &mut ValidationOutcome) {
        if draft.addresses.is_empty() {
            outcome.add_issue(
                RuleCode::AddressRequired,
                "addresses",
                "At least one address is required",
            );
            return;
        }

        for (index, address) in draft.addresses.iter().enumerate() {
            if address.line1.trim().is_empty() {
                outcome.add_issue(
                    RuleCode::AddressLineRequired,
                    format!("addresses[{index}].line1"),
                    "Address line 1 is required",
                );
            }
            if address.city.trim().is_empty() {
                outcome.add_issue(
                    RuleCode::CityRequired,
                    format!("addresses[{index}].city"),
                    "City is required",
                );
            }
            if address.postal_code.len() != 4
                || !address.postal_code.chars().all(|c| c.is_ascii_digit())
            {
                outcome.add_issue(
                    RuleCode::PostalCodeFormat,
                    format!("addresses[{index}].postal_code"),
                    "Postal code must be 4 numeric digits",
                );
            }
        }

        let primary_count = draft.addresses.iter().filter(|a| a.is_primary).count();
        if primary_count > 1 {
            outcome.add_warning(
                RuleCode::AddressRequired,
                "addresses",
                "Multiple primary addresses found",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{Address, AddressType};
    use crate::draft::{ContactDetails, NaturalPersonDetails, OrganizationDetails};
    use crate::nature::PersonNature;
    use domain_identity::{DocumentType, IdentityDocument};

    fn draft_with_names() -> PersonDraft {
        let mut draft = PersonDraft::new();
        draft.set_nature(PersonNature::NaturalPerson);
        *draft.natural.as_mut().unwrap() = NaturalPersonDetails {
            surname: "Dlamini".to_string(),
            first_names: "Thabo Peter".to_string(),
            initials: "TP".to_string(),
            gender: None,
            birth_date: None,
        };
        draft
    }

    #[test]
    fn test_lookup_request_empty_number() {
        let request = LookupRequest::new(DocumentType::NationalId, "");
        let outcome = StepValidator::validate_lookup_request(&request);
        assert!(outcome.has_code(RuleCode::DocumentNumberRequired));
    }

    #[test]
    fn test_lookup_request_bad_checksum() {
        let request = LookupRequest::new(DocumentType::NationalId, "8001015009088");
        let outcome = StepValidator::validate_lookup_request(&request);
        assert!(outcome.has_code(RuleCode::IdentityChecksum));
    }

    #[test]
    fn test_lookup_request_valid() {
        let request = LookupRequest::new(DocumentType::NationalId, "8001015009087");
        assert!(StepValidator::validate_lookup_request(&request).passed());
    }

    #[test]
    fn test_nature_step_requires_selection() {
        let draft = PersonDraft::new();
        let outcome = StepValidator::validate_step(&draft, RegistrationStep::NatureSelection);
        assert!(outcome.has_code(RuleCode::NatureRequired));
    }

    #[test]
    fn test_basic_info_natural_person_requires_initials() {
        let mut draft = draft_with_names();
        draft.natural.as_mut().unwrap().initials.clear();
        let outcome = StepValidator::validate_step(&draft, RegistrationStep::BasicInfo);
        assert!(outcome.has_code(RuleCode::InitialsRequired));
    }

    #[test]
    fn test_basic_info_organization_rejects_initials() {
        let mut draft = PersonDraft::new();
        draft.nature = Some(PersonNature::Company);
        draft.organization = Some(OrganizationDetails {
            registered_name: "Acme Transport (Pty) Ltd".to_string(),
            trading_name: None,
        });
        // Stale name block left behind by a hand-built draft
        draft.natural = Some(NaturalPersonDetails {
            initials: "TP".to_string(),
            ..Default::default()
        });
        let outcome = StepValidator::validate_step(&draft, RegistrationStep::BasicInfo);
        assert!(outcome.has_code(RuleCode::InitialsNotAllowed));
    }

    #[test]
    fn test_basic_info_valid_natural_person() {
        let draft = draft_with_names();
        let outcome = StepValidator::validate_step(&draft, RegistrationStep::BasicInfo);
        assert!(outcome.passed(), "issues: {}", outcome.summary());
    }

    #[test]
    fn test_basic_info_flags_bad_email() {
        let mut draft = draft_with_names();
        draft.set_contact(ContactDetails {
            email: Some("not-an-email".to_string()),
            phone: None,
        });
        let outcome = StepValidator::validate_step(&draft, RegistrationStep::BasicInfo);
        assert!(outcome.has_code(RuleCode::EmailFormat));
    }

    #[test]
    fn test_addresses_step_requires_one() {
        let draft = PersonDraft::new();
        let outcome = StepValidator::validate_step(&draft, RegistrationStep::Addresses);
        assert!(outcome.has_code(RuleCode::AddressRequired));
    }

    #[test]
    fn test_addresses_postal_code_format() {
        let mut draft = PersonDraft::new();
        draft.add_address(Address::new(
            AddressType::Residential,
            "12 Loop Street",
            "Cape Town",
            "80011",
        ));
        let outcome = StepValidator::validate_step(&draft, RegistrationStep::Addresses);
        assert!(outcome.has_code(RuleCode::PostalCodeFormat));
    }

    #[test]
    fn test_review_merges_upstream_issues() {
        let mut draft = draft_with_names();
        draft.add_document(
            IdentityDocument::new(DocumentType::NationalId, "8001015009087").as_current(),
        );
        // No addresses captured yet
        let outcome = StepValidator::validate_step(&draft, RegistrationStep::Review);
        assert!(!outcome.passed());
        assert!(outcome.has_code(RuleCode::AddressRequired));
    }
}
