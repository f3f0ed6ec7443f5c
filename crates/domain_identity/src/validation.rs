//! Identity document validation rules
//!
//! This module applies the document-scoped V-series rules:
//!
//! - The number must be present and match the type's shape rule
//! - A national ID number must pass the check digit
//! - An expiry date is mandatory for foreign IDs, and any expiry date
//!   present must lie strictly in the future at evaluation time
//! - Country of issue is mandatory for foreign IDs and passports, and must
//!   be a 2-letter ISO code wherever supplied
//! - Across a document set, exactly one entry must be marked current
//!
//! All rules are evaluated against an explicit `today` so callers (and
//! tests) control the evaluation instant; the convenience entry points use
//! the current calendar date.

use chrono::{NaiveDate, Utc};

use registry_kernel::{RuleCode, ValidationOutcome};

use crate::document::{DocumentType, IdentityDocument};
use crate::national_id;

/// Validator for identity documents
pub struct DocumentValidator;

impl DocumentValidator {
    /// Validates a single document against its type's rules
    ///
    /// # Arguments
    ///
    /// * `document` - The document to validate
    /// * `field` - Field path prefix for issue reporting (e.g. `documents[0]`)
    pub fn validate(document: &IdentityDocument, field: &str) -> ValidationOutcome {
        Self::validate_at(document, field, Utc::now().date_naive())
    }

    /// Validates a single document, evaluated as of `today`
    pub fn validate_at(document: &IdentityDocument, field: &str, today: NaiveDate) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::ok();

        Self::validate_number(document, field, &mut outcome);
        Self::validate_expiry(document, field, today, &mut outcome);
        Self::validate_country(document, field, &mut outcome);

        outcome
    }

    /// Validates a whole document set, including cross-document rules
    pub fn validate_set(documents: &[IdentityDocument], today: NaiveDate) -> ValidationOutcome {
        let mut outcome = ValidationOutcome::ok();

        if documents.is_empty() {
            outcome.add_issue(
                RuleCode::DocumentRequired,
                "documents",
                "At least one identity document is required",
            );
            return outcome;
        }

        for (index, document) in documents.iter().enumerate() {
            let field = format!("documents[{index}]");
            outcome.merge(Self::validate_at(document, &field, today));
        }

        let current_count = documents.iter().filter(|d| d.is_current).count();
        if current_count != 1 {
            outcome.add_issue(
                RuleCode::CurrentDocumentCardinality,
                "documents",
                format!("Exactly one document must be marked current, found {current_count}"),
            );
        }

        outcome
    }

    fn validate_number(document: &IdentityDocument, field: &str, outcome: &mut ValidationOutcome) {
        if document.number.trim().is_empty() {
            outcome.add_issue(
                RuleCode::DocumentNumberRequired,
                format!("{field}.number"),
                "Document number is required",
            );
            return;
        }

        if !document.type_code.number_matches_format(&document.number) {
            outcome.add_issue(
                RuleCode::DocumentNumberFormat,
                format!("{field}.number"),
                format!(
                    "Number does not match the {} format",
                    document.type_code.code()
                ),
            );
            return;
        }

        if document.type_code == DocumentType::NationalId
            && !national_id::validate_checksum(&document.number)
        {
            outcome.add_issue(
                RuleCode::IdentityChecksum,
                format!("{field}.number"),
                "National identity number fails the check digit",
            );
        }
    }

    fn validate_expiry(
        document: &IdentityDocument,
        field: &str,
        today: NaiveDate,
        outcome: &mut ValidationOutcome,
    ) {
        match document.expiry_date {
            None => {
                if document.type_code.requires_expiry() {
                    outcome.add_issue(
                        RuleCode::ExpiryDateRequired,
                        format!("{field}.expiry_date"),
                        format!(
                            "An expiry date is required for {} documents",
                            document.type_code.code()
                        ),
                    );
                }
            }
            Some(expiry) => {
                if expiry <= today {
                    outcome.add_issue(
                        RuleCode::ExpiryDateNotFuture,
                        format!("{field}.expiry_date"),
                        "Expiry date must be in the future",
                    );
                }
            }
        }
    }

    fn validate_country(document: &IdentityDocument, field: &str, outcome: &mut ValidationOutcome) {
        match &document.country_of_issue {
            None => {
                if document.type_code.requires_country_of_issue() {
                    outcome.add_issue(
                        RuleCode::CountryOfIssueRequired,
                        format!("{field}.country_of_issue"),
                        format!(
                            "Country of issue is required for {} documents",
                            document.type_code.code()
                        ),
                    );
                }
            }
            Some(country) => {
                if country.len() != 2 || !country.chars().all(|c| c.is_ascii_uppercase()) {
                    outcome.add_issue(
                        RuleCode::CountryOfIssueFormat,
                        format!("{field}.country_of_issue"),
                        "Country of issue must be a 2-letter ISO code",
                    );
                }
            }
        }
    }
}
