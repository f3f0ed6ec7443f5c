//! Shared validation vocabulary
//!
//! Field-level business rules across the registry are keyed by stable
//! V-series rule codes. A validation pass over a record (or a subset of its
//! fields) produces a [`ValidationOutcome`]: pass/fail plus the list of
//! field-scoped issues, each carrying its rule code and a human-readable
//! message. Warnings are advisory and never block.
//!
//! The codes are stable identifiers consumed by the admin surface to attach
//! inline messages to fields; renumbering them is a breaking change.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable rule codes for field-level business rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleCode {
    /// Document type must be selected
    DocumentTypeRequired,
    /// Document number must not be empty
    DocumentNumberRequired,
    /// Document number fails the type-specific pattern
    DocumentNumberFormat,
    /// National identity number fails the check digit
    IdentityChecksum,
    /// Expiry date is mandatory for this document type
    ExpiryDateRequired,
    /// Expiry date must be strictly in the future
    ExpiryDateNotFuture,
    /// Country of issue is mandatory for this document type
    CountryOfIssueRequired,
    /// Country of issue must be a 2-letter ISO code
    CountryOfIssueFormat,
    /// Exactly one document must be marked current
    CurrentDocumentCardinality,
    /// At least one document is required
    DocumentRequired,
    /// Person nature category must be selected
    NatureRequired,
    /// Surname is required
    SurnameRequired,
    /// First names are required for natural persons
    FirstNamesRequired,
    /// Initials are required for natural persons
    InitialsRequired,
    /// Initials must not be supplied for organizations
    InitialsNotAllowed,
    /// Organization name is required
    OrganizationNameRequired,
    /// Nationality must be a 2-letter ISO code
    NationalityFormat,
    /// Email address fails format validation
    EmailFormat,
    /// At least one address is required
    AddressRequired,
    /// Address line 1 is required
    AddressLineRequired,
    /// City is required
    CityRequired,
    /// Postal code must be 4 numeric digits
    PostalCodeFormat,
}

impl RuleCode {
    /// Returns the stable wire code for this rule
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleCode::DocumentTypeRequired => "V001",
            RuleCode::DocumentNumberRequired => "V002",
            RuleCode::DocumentNumberFormat => "V003",
            RuleCode::IdentityChecksum => "V004",
            RuleCode::ExpiryDateRequired => "V005",
            RuleCode::ExpiryDateNotFuture => "V006",
            RuleCode::CountryOfIssueRequired => "V007",
            RuleCode::CountryOfIssueFormat => "V008",
            RuleCode::CurrentDocumentCardinality => "V009",
            RuleCode::DocumentRequired => "V010",
            RuleCode::NatureRequired => "V011",
            RuleCode::SurnameRequired => "V012",
            RuleCode::FirstNamesRequired => "V013",
            RuleCode::InitialsRequired => "V014",
            RuleCode::InitialsNotAllowed => "V015",
            RuleCode::OrganizationNameRequired => "V016",
            RuleCode::NationalityFormat => "V017",
            RuleCode::EmailFormat => "V018",
            RuleCode::AddressRequired => "V019",
            RuleCode::AddressLineRequired => "V020",
            RuleCode::CityRequired => "V021",
            RuleCode::PostalCodeFormat => "V022",
        }
    }
}

impl fmt::Display for RuleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field-scoped validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The rule that was violated
    pub code: RuleCode,
    /// Dotted path of the offending field (e.g. `documents[1].expiry_date`)
    pub field: String,
    /// Human-readable message for inline display
    pub message: String,
}

impl ValidationIssue {
    /// Creates a new issue
    pub fn new(code: RuleCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.field, self.message)
    }
}

/// Result of a validation pass
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// List of blocking issues; empty means the pass succeeded
    pub issues: Vec<ValidationIssue>,
    /// List of advisory warnings (non-fatal)
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    /// Creates a successful outcome
    pub fn ok() -> Self {
        Self::default()
    }

    /// Whether the validated subset passed
    pub fn passed(&self) -> bool {
        self.issues.is_empty()
    }

    /// Adds a blocking issue to the outcome
    pub fn add_issue(&mut self, code: RuleCode, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue::new(code, field, message));
    }

    /// Adds an advisory warning to the outcome
    pub fn add_warning(&mut self, code: RuleCode, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(code, field, message));
    }

    /// Merges another outcome into this one
    pub fn merge(&mut self, other: ValidationOutcome) {
        self.issues.extend(other.issues);
        self.warnings.extend(other.warnings);
    }

    /// Returns true if the outcome contains the given rule code as an issue
    pub fn has_code(&self, code: RuleCode) -> bool {
        self.issues.iter().any(|i| i.code == code)
    }

    /// Joins all issue messages for a compact summary line
    pub fn summary(&self) -> String {
        self.issues
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_starts_passed() {
        let outcome = ValidationOutcome::ok();
        assert!(outcome.passed());
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_add_issue_fails_outcome() {
        let mut outcome = ValidationOutcome::ok();
        outcome.add_issue(RuleCode::SurnameRequired, "surname", "Surname is required");
        assert!(!outcome.passed());
        assert!(outcome.has_code(RuleCode::SurnameRequired));
        assert!(!outcome.has_code(RuleCode::InitialsRequired));
    }

    #[test]
    fn test_warnings_do_not_fail_outcome() {
        let mut outcome = ValidationOutcome::ok();
        outcome.add_warning(
            RuleCode::NationalityFormat,
            "nationality",
            "Nationality should be a 2-letter ISO code",
        );
        assert!(outcome.passed());
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_merge_combines_issues() {
        let mut a = ValidationOutcome::ok();
        a.add_issue(RuleCode::SurnameRequired, "surname", "Surname is required");
        let mut b = ValidationOutcome::ok();
        b.add_issue(RuleCode::CityRequired, "addresses[0].city", "City is required");

        a.merge(b);
        assert_eq!(a.issues.len(), 2);
        assert!(!a.passed());
    }

    #[test]
    fn test_rule_code_display() {
        assert_eq!(RuleCode::DocumentTypeRequired.to_string(), "V001");
        assert_eq!(RuleCode::PostalCodeFormat.to_string(), "V022");
    }

    #[test]
    fn test_issue_display_contains_code_and_field() {
        let issue = ValidationIssue::new(RuleCode::EmailFormat, "contact.email", "Invalid email");
        let rendered = issue.to_string();
        assert!(rendered.contains("V018"));
        assert!(rendered.contains("contact.email"));
    }
}
