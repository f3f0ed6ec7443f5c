//! Person draft aggregate
//!
//! [`PersonDraft`] is the in-progress registration record built up across
//! the workflow's steps. It is created empty at workflow start, mutated
//! step by step, and either discarded on reset or converted into a create
//! request at the review step. It is never partially persisted; the
//! backend collaborator is the sole owner of durable state.
//!
//! The draft itself enforces only structural rules (at most one current
//! document, detail block matching the selected nature); the field-level
//! V-series rules live in [`crate::validation`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use registry_kernel::DraftId;
use domain_identity::{DerivedIdentityAttributes, Gender, IdentityDocument};

use crate::address::Address;
use crate::error::RegistrationError;
use crate::nature::PersonNature;

/// Name block for natural persons
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NaturalPersonDetails {
    /// Legal surname
    pub surname: String,
    /// Full first names
    pub first_names: String,
    /// Initials
    pub initials: String,
    /// Gender, seeded from the identity number until overridden
    pub gender: Option<Gender>,
    /// Date of birth, seeded from the identity number until overridden
    pub birth_date: Option<NaiveDate>,
}

impl NaturalPersonDetails {
    /// Returns the full name in "First Last" format
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_names, self.surname)
    }
}

/// Detail block for organization natures
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationDetails {
    /// Registered legal name
    pub registered_name: String,
    /// Trading name, if different
    pub trading_name: Option<String>,
}

/// Contact fields shared by all natures
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ContactDetails {
    /// Primary email address
    #[validate(email)]
    pub email: Option<String>,
    /// Primary phone number
    pub phone: Option<String>,
}

/// The in-progress registration aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonDraft {
    /// Unique draft identifier (session-local, never persisted)
    pub id: DraftId,
    /// Selected nature category
    pub nature: Option<PersonNature>,
    /// Name block (natural natures)
    pub natural: Option<NaturalPersonDetails>,
    /// Organization block (organization natures)
    pub organization: Option<OrganizationDetails>,
    /// Nationality (ISO 3166-1 alpha-2)
    pub nationality: Option<String>,
    /// Attributes derived from the lookup document, cached until overridden
    pub derived: Option<DerivedIdentityAttributes>,
    /// Identity documents; entry 0 is the lookup document
    #[serde(default)]
    pub documents: Vec<IdentityDocument>,
    /// Postal addresses
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// Contact fields
    pub contact: ContactDetails,
    /// When this draft was created
    pub created_at: DateTime<Utc>,
    /// When this draft was last updated
    pub updated_at: DateTime<Utc>,
}

impl PersonDraft {
    /// Creates a new empty draft
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: DraftId::new_v7(),
            nature: None,
            natural: None,
            organization: None,
            nationality: None,
            derived: None,
            documents: Vec::new(),
            addresses: Vec::new(),
            contact: ContactDetails::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Returns a display name for this draft
    ///
    /// Natural natures render the name block, organizations their
    /// registered name; an unnamed draft falls back to the lookup
    /// document number.
    pub fn display_name(&self) -> String {
        if let Some(natural) = &self.natural {
            if !natural.surname.trim().is_empty() {
                return natural.full_name();
            }
        }
        if let Some(organization) = &self.organization {
            if !organization.registered_name.trim().is_empty() {
                return organization.registered_name.clone();
            }
        }
        self.documents
            .first()
            .map(|d| d.number.clone())
            .unwrap_or_else(|| "Unnamed draft".to_string())
    }

    /// Selects the nature category, dropping a mismatched detail block
    ///
    /// Switching from a natural category to an organization category (or
    /// back) discards the block the new category cannot carry.
    pub fn set_nature(&mut self, nature: PersonNature) {
        self.nature = Some(nature);
        if nature.is_natural() {
            self.organization = None;
            if self.natural.is_none() {
                self.natural = Some(NaturalPersonDetails::default());
                self.seed_natural_from_derived();
            }
        } else {
            self.natural = None;
            if self.organization.is_none() {
                self.organization = Some(OrganizationDetails::default());
            }
        }
        self.touch();
    }

    /// Caches attributes derived from the lookup document
    pub fn seed_derived_attributes(&mut self, attributes: DerivedIdentityAttributes) {
        self.derived = Some(attributes);
        self.seed_natural_from_derived();
        self.touch();
    }

    /// Copies cached derived attributes into an empty name block
    fn seed_natural_from_derived(&mut self) {
        if let (Some(natural), Some(derived)) = (self.natural.as_mut(), self.derived) {
            if natural.gender.is_none() {
                natural.gender = Some(derived.gender);
            }
            if natural.birth_date.is_none() {
                natural.birth_date = Some(derived.birth_date);
            }
        }
    }

    /// The gender in effect: an explicit override wins over the derived value
    pub fn effective_gender(&self) -> Option<Gender> {
        self.natural
            .as_ref()
            .and_then(|n| n.gender)
            .or(self.derived.map(|d| d.gender))
    }

    /// The birth date in effect: an explicit override wins over the derived value
    pub fn effective_birth_date(&self) -> Option<NaiveDate> {
        self.natural
            .as_ref()
            .and_then(|n| n.birth_date)
            .or(self.derived.map(|d| d.birth_date))
    }

    /// Returns the document currently marked as the person's alias
    pub fn current_document(&self) -> Option<&IdentityDocument> {
        self.documents.iter().find(|d| d.is_current)
    }

    /// Appends a document to the draft
    pub fn add_document(&mut self, document: IdentityDocument) {
        self.documents.push(document);
        self.touch();
    }

    /// Marks the document at `index` as current, clearing the flag elsewhere
    pub fn mark_document_current(&mut self, index: usize) -> Result<(), RegistrationError> {
        if index >= self.documents.len() {
            return Err(RegistrationError::DocumentIndexOutOfRange(index));
        }
        for (i, document) in self.documents.iter_mut().enumerate() {
            document.is_current = i == index;
        }
        self.touch();
        Ok(())
    }

    /// Adds an address to the draft
    pub fn add_address(&mut self, address: Address) {
        self.addresses.push(address);
        self.touch();
    }

    /// Updates the contact fields
    pub fn set_contact(&mut self, contact: ContactDetails) {
        self.contact = contact;
        self.touch();
    }

    /// Sets the nationality
    pub fn set_nationality(&mut self, nationality: impl Into<String>) {
        self.nationality = Some(nationality.into());
        self.touch();
    }
}

impl Default for PersonDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_identity::DocumentType;

    fn derived() -> DerivedIdentityAttributes {
        DerivedIdentityAttributes {
            gender: Gender::Male,
            birth_date: NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_set_nature_creates_matching_block() {
        let mut draft = PersonDraft::new();
        draft.set_nature(PersonNature::NaturalPerson);
        assert!(draft.natural.is_some());
        assert!(draft.organization.is_none());

        draft.set_nature(PersonNature::Company);
        assert!(draft.natural.is_none());
        assert!(draft.organization.is_some());
    }

    #[test]
    fn test_derived_attributes_seed_name_block() {
        let mut draft = PersonDraft::new();
        draft.seed_derived_attributes(derived());
        draft.set_nature(PersonNature::NaturalPerson);

        let natural = draft.natural.as_ref().unwrap();
        assert_eq!(natural.gender, Some(Gender::Male));
        assert_eq!(
            natural.birth_date,
            Some(NaiveDate::from_ymd_opt(1980, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_explicit_override_wins_over_derived() {
        let mut draft = PersonDraft::new();
        draft.seed_derived_attributes(derived());
        draft.set_nature(PersonNature::NaturalPerson);

        draft.natural.as_mut().unwrap().gender = Some(Gender::Female);
        assert_eq!(draft.effective_gender(), Some(Gender::Female));
    }

    #[test]
    fn test_mark_document_current_is_exclusive() {
        let mut draft = PersonDraft::new();
        draft.add_document(
            IdentityDocument::new(DocumentType::NationalId, "8001015009087").as_current(),
        );
        draft.add_document(IdentityDocument::new(DocumentType::Passport, "P1234567"));

        draft.mark_document_current(1).unwrap();
        assert!(!draft.documents[0].is_current);
        assert!(draft.documents[1].is_current);
        assert_eq!(draft.current_document().unwrap().number, "P1234567");
    }

    #[test]
    fn test_mark_document_current_out_of_range() {
        let mut draft = PersonDraft::new();
        assert!(draft.mark_document_current(0).is_err());
    }

    #[test]
    fn test_display_name_falls_back_to_document_number() {
        let mut draft = PersonDraft::new();
        assert_eq!(draft.display_name(), "Unnamed draft");

        draft.add_document(IdentityDocument::new(DocumentType::NationalId, "8001015009087"));
        assert_eq!(draft.display_name(), "8001015009087");

        draft.set_nature(PersonNature::NaturalPerson);
        let natural = draft.natural.as_mut().unwrap();
        natural.surname = "Dlamini".to_string();
        natural.first_names = "Thabo".to_string();
        assert_eq!(draft.display_name(), "Thabo Dlamini");
    }
}
