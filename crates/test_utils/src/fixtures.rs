//! Pre-built test data for common entities

use chrono::{Datelike, NaiveDate};

use domain_identity::{DocumentType, IdentityDocument};
use domain_registration::{Address, AddressType, PersonNature, PersonSummary};
use registry_kernel::PersonId;

/// A checksum-valid national ID for a male born 1980-01-01
pub const SAMPLE_NATIONAL_ID: &str = "8001015009087";

/// National identity number fixtures
pub struct IdentityFixtures;

impl IdentityFixtures {
    /// Appends the check digit that makes a 12-digit prefix verify
    pub fn complete_checksum(prefix: &str) -> String {
        assert_eq!(prefix.len(), 12, "prefix must be 12 digits");
        let digits: Vec<u32> = prefix
            .chars()
            .map(|c| c.to_digit(10).expect("prefix must be numeric"))
            .collect();

        let mut sum = 0u32;
        for (i, &digit) in digits.iter().enumerate() {
            let mut value = digit;
            if i % 2 == 1 {
                value *= 2;
                if value > 9 {
                    value -= 9;
                }
            }
            sum += value;
        }
        let check = (10 - (sum % 10)) % 10;
        format!("{prefix}{check}")
    }

    /// Builds a checksum-valid national ID encoding the given birth date
    /// and gender sequence
    pub fn valid_national_id(birth_date: NaiveDate, sequence: u32) -> String {
        assert!(sequence <= 9999, "sequence must be 4 digits");
        let prefix = format!(
            "{:02}{:02}{:02}{:04}08",
            birth_date.year() % 100,
            birth_date.month(),
            birth_date.day(),
            sequence
        );
        Self::complete_checksum(&prefix)
    }

    /// A checksum-valid national ID for a female born 1992-02-20
    pub fn female_national_id() -> String {
        Self::valid_national_id(NaiveDate::from_ymd_opt(1992, 2, 20).unwrap(), 4720)
    }
}

/// Document fixtures
pub struct DocumentFixtures;

impl DocumentFixtures {
    /// The sample national ID document, marked current
    pub fn national_id() -> IdentityDocument {
        IdentityDocument::new(DocumentType::NationalId, SAMPLE_NATIONAL_ID).as_current()
    }

    /// A valid foreign ID document with a future expiry
    pub fn foreign_id() -> IdentityDocument {
        IdentityDocument::new(DocumentType::ForeignId, "AB1234567")
            .with_country_of_issue("GB")
            .with_expiry_date(NaiveDate::from_ymd_opt(2030, 6, 30).unwrap())
    }

    /// A valid passport document
    pub fn passport() -> IdentityDocument {
        IdentityDocument::new(DocumentType::Passport, "M00153254")
            .with_country_of_issue("ZA")
            .with_expiry_date(NaiveDate::from_ymd_opt(2031, 3, 15).unwrap())
    }
}

/// Address fixtures
pub struct AddressFixtures;

impl AddressFixtures {
    /// A residential address that passes every address rule
    pub fn residential() -> Address {
        let mut address = Address::new(
            AddressType::Residential,
            "12 Loop Street",
            "Cape Town",
            "8001",
        );
        address.is_primary = true;
        address
    }

    /// A postal address
    pub fn postal() -> Address {
        let mut address = Address::new(AddressType::Postal, "PO Box 44", "Pretoria", "0002");
        address.suburb = Some("Arcadia".to_string());
        address
    }
}

/// Person summary fixtures
pub struct SummaryFixtures;

impl SummaryFixtures {
    /// An active natural person summary
    pub fn natural_person(display_name: impl Into<String>) -> PersonSummary {
        PersonSummary {
            id: PersonId::new_v7(),
            display_name: display_name.into(),
            nature: PersonNature::NaturalPerson,
            is_active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_identity::national_id;

    #[test]
    fn test_complete_checksum_matches_known_sample() {
        assert_eq!(
            IdentityFixtures::complete_checksum("800101500908"),
            SAMPLE_NATIONAL_ID
        );
    }

    #[test]
    fn test_valid_national_id_verifies() {
        let id = IdentityFixtures::female_national_id();
        assert!(national_id::validate_checksum(&id));
        assert_eq!(
            national_id::extract_gender(&id),
            Some(domain_identity::Gender::Female)
        );
    }
}
