//! Identity document types
//!
//! One [`IdentityDocument`] represents a single identification record for a
//! person. The number format and the expiry/country rules depend on the
//! document type; the format predicates here are shape checks only, with the
//! checksum and cross-document rules applied by the validator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use registry_kernel::DocumentId;

use crate::error::IdentityError;
use crate::national_id::ID_NUMBER_LENGTH;

/// Identity document type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    /// 13-digit national identity number with check digit
    NationalId,
    /// Foreign national identity document
    ForeignId,
    /// Revenue service tax reference number
    TaxRef,
    /// Business registration number
    BusinessReg,
    /// Passport
    Passport,
    /// Driving licence card number
    DriversLicense,
}

impl DocumentType {
    /// Returns the stable wire code for this document type
    pub fn code(&self) -> &'static str {
        match self {
            DocumentType::NationalId => "RSA_ID",
            DocumentType::ForeignId => "FOREIGN_ID",
            DocumentType::TaxRef => "TAX_REF",
            DocumentType::BusinessReg => "BUSINESS_REG",
            DocumentType::Passport => "PASSPORT",
            DocumentType::DriversLicense => "DRIVERS_LICENSE",
        }
    }

    /// Whether an expiry date is mandatory for this type
    pub fn requires_expiry(&self) -> bool {
        matches!(self, DocumentType::ForeignId)
    }

    /// Whether a country of issue is mandatory for this type
    pub fn requires_country_of_issue(&self) -> bool {
        matches!(self, DocumentType::ForeignId | DocumentType::Passport)
    }

    /// Checks the document number against this type's shape rule
    ///
    /// Shape only: the national ID check digit is a separate rule.
    pub fn number_matches_format(&self, number: &str) -> bool {
        match self {
            DocumentType::NationalId => {
                number.len() == ID_NUMBER_LENGTH && number.chars().all(|c| c.is_ascii_digit())
            }
            DocumentType::ForeignId => {
                (6..=20).contains(&number.len())
                    && number.chars().all(|c| c.is_ascii_alphanumeric())
            }
            DocumentType::TaxRef => {
                number.len() == 10 && number.chars().all(|c| c.is_ascii_digit())
            }
            DocumentType::BusinessReg => {
                (5..=20).contains(&number.len())
                    && number.chars().all(|c| c.is_ascii_digit() || c == '/')
            }
            DocumentType::Passport => {
                (6..=15).contains(&number.len())
                    && number.chars().all(|c| c.is_ascii_alphanumeric())
            }
            DocumentType::DriversLicense => {
                (8..=20).contains(&number.len())
                    && number.chars().all(|c| c.is_ascii_alphanumeric())
            }
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DocumentType {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RSA_ID" => Ok(DocumentType::NationalId),
            "FOREIGN_ID" => Ok(DocumentType::ForeignId),
            "TAX_REF" => Ok(DocumentType::TaxRef),
            "BUSINESS_REG" => Ok(DocumentType::BusinessReg),
            "PASSPORT" => Ok(DocumentType::Passport),
            "DRIVERS_LICENSE" => Ok(DocumentType::DriversLicense),
            other => Err(IdentityError::UnknownDocumentType(other.to_string())),
        }
    }
}

/// A single identification record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityDocument {
    pub id: DocumentId,
    pub type_code: DocumentType,
    pub number: String,
    /// Country of issue (ISO 3166-1 alpha-2)
    pub country_of_issue: Option<String>,
    /// Whether this is the person's current alias document.
    /// At most one document per person carries this flag; the workflow
    /// enforces the invariant, not storage.
    pub is_current: bool,
    pub expiry_date: Option<NaiveDate>,
    pub captured_at: DateTime<Utc>,
}

impl IdentityDocument {
    /// Creates a new document record
    pub fn new(type_code: DocumentType, number: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new_v7(),
            type_code,
            number: number.into(),
            country_of_issue: None,
            is_current: false,
            expiry_date: None,
            captured_at: Utc::now(),
        }
    }

    /// Sets the country of issue
    pub fn with_country_of_issue(mut self, country: impl Into<String>) -> Self {
        self.country_of_issue = Some(country.into());
        self
    }

    /// Sets the expiry date
    pub fn with_expiry_date(mut self, expiry: NaiveDate) -> Self {
        self.expiry_date = Some(expiry);
        self
    }

    /// Marks this document as the person's current alias
    pub fn as_current(mut self) -> Self {
        self.is_current = true;
        self
    }

    /// Whether the expiry date, if any, lies strictly in the future of `today`
    pub fn has_future_expiry(&self, today: NaiveDate) -> bool {
        self.expiry_date.map_or(false, |exp| exp > today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_national_id_format() {
        assert!(DocumentType::NationalId.number_matches_format("8001015009087"));
        assert!(!DocumentType::NationalId.number_matches_format("800101500908"));
        assert!(!DocumentType::NationalId.number_matches_format("80010150090a7"));
    }

    #[test]
    fn test_foreign_id_format() {
        assert!(DocumentType::ForeignId.number_matches_format("AB12345"));
        assert!(!DocumentType::ForeignId.number_matches_format("AB123"));
        assert!(!DocumentType::ForeignId.number_matches_format("AB 12345"));
    }

    #[test]
    fn test_tax_ref_format() {
        assert!(DocumentType::TaxRef.number_matches_format("9012345678"));
        assert!(!DocumentType::TaxRef.number_matches_format("901234567"));
    }

    #[test]
    fn test_business_reg_format() {
        assert!(DocumentType::BusinessReg.number_matches_format("2015/123456/07"));
        assert!(!DocumentType::BusinessReg.number_matches_format("B123"));
    }

    #[test]
    fn test_expiry_and_country_requirements() {
        assert!(DocumentType::ForeignId.requires_expiry());
        assert!(!DocumentType::NationalId.requires_expiry());
        assert!(DocumentType::Passport.requires_country_of_issue());
        assert!(!DocumentType::TaxRef.requires_country_of_issue());
    }

    #[test]
    fn test_type_code_round_trip() {
        for doc_type in [
            DocumentType::NationalId,
            DocumentType::ForeignId,
            DocumentType::TaxRef,
            DocumentType::BusinessReg,
            DocumentType::Passport,
            DocumentType::DriversLicense,
        ] {
            let parsed: DocumentType = doc_type.code().parse().unwrap();
            assert_eq!(parsed, doc_type);
        }
    }

    #[test]
    fn test_unknown_type_code() {
        let result: Result<DocumentType, _> = "VISA".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_future_expiry() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();
        let doc = IdentityDocument::new(DocumentType::ForeignId, "AB12345")
            .with_expiry_date(NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
        assert!(doc.has_future_expiry(today));

        let expired = IdentityDocument::new(DocumentType::ForeignId, "AB12345")
            .with_expiry_date(today);
        assert!(!expired.has_future_expiry(today));
    }
}
