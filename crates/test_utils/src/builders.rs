//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible
//! defaults. Tests specify only the relevant fields and take defaults for
//! everything else; names come from `fake` so drafts do not all collide on
//! the same strings.

use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;

use domain_identity::IdentityDocument;
use domain_registration::{
    Address, ContactDetails, NaturalPersonDetails, OrganizationDetails, PersonDraft, PersonNature,
};

use crate::fixtures::{AddressFixtures, DocumentFixtures};

/// Builder for constructing test person drafts
pub struct PersonDraftBuilder {
    nature: PersonNature,
    surname: String,
    first_names: String,
    initials: String,
    registered_name: String,
    documents: Vec<IdentityDocument>,
    addresses: Vec<Address>,
    email: Option<String>,
}

impl Default for PersonDraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PersonDraftBuilder {
    /// Creates a builder for a natural person with one valid national ID
    /// document and one valid residential address
    pub fn new() -> Self {
        let surname: String = LastName().fake();
        let first_names: String = FirstName().fake();
        let initials = first_names.chars().next().unwrap_or('A').to_string();

        Self {
            nature: PersonNature::NaturalPerson,
            surname,
            first_names,
            initials,
            registered_name: "Acme Transport (Pty) Ltd".to_string(),
            documents: vec![DocumentFixtures::national_id()],
            addresses: vec![AddressFixtures::residential()],
            email: None,
        }
    }

    /// Sets the nature category
    pub fn with_nature(mut self, nature: PersonNature) -> Self {
        self.nature = nature;
        self
    }

    /// Sets the natural-person name block fields
    pub fn with_names(
        mut self,
        surname: impl Into<String>,
        first_names: impl Into<String>,
        initials: impl Into<String>,
    ) -> Self {
        self.surname = surname.into();
        self.first_names = first_names.into();
        self.initials = initials.into();
        self
    }

    /// Sets the organization's registered name
    pub fn with_registered_name(mut self, name: impl Into<String>) -> Self {
        self.registered_name = name.into();
        self
    }

    /// Replaces the document list
    pub fn with_documents(mut self, documents: Vec<IdentityDocument>) -> Self {
        self.documents = documents;
        self
    }

    /// Appends a document
    pub fn with_document(mut self, document: IdentityDocument) -> Self {
        self.documents.push(document);
        self
    }

    /// Replaces the address list
    pub fn with_addresses(mut self, addresses: Vec<Address>) -> Self {
        self.addresses = addresses;
        self
    }

    /// Sets the contact email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builds the draft
    pub fn build(self) -> PersonDraft {
        let mut draft = PersonDraft::new();
        draft.set_nature(self.nature);

        if self.nature.is_natural() {
            if let Some(natural) = draft.natural.as_mut() {
                *natural = NaturalPersonDetails {
                    surname: self.surname,
                    first_names: self.first_names,
                    initials: self.initials,
                    gender: None,
                    birth_date: None,
                };
            }
        } else if let Some(organization) = draft.organization.as_mut() {
            *organization = OrganizationDetails {
                registered_name: self.registered_name,
                trading_name: None,
            };
        }

        for document in self.documents {
            draft.add_document(document);
        }
        for address in self.addresses {
            draft.add_address(address);
        }
        draft.set_contact(ContactDetails {
            email: self.email,
            phone: None,
        });
        draft
    }
}
