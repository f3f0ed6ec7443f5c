//! Person nature categories
//!
//! The nature category selected in the second workflow step decides which
//! field set is mandatory in the basic-information step: natural persons
//! carry a name block with initials, organizations carry a registered name
//! and must not supply initials.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistrationError;

/// The nature category of a registered person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PersonNature {
    /// A natural person
    NaturalPerson,
    /// A registered company
    Company,
    /// A close corporation
    CloseCorporation,
    /// A trust entity
    Trust,
    /// A government body
    GovernmentBody,
}

impl PersonNature {
    /// Returns the stable wire code for this nature
    pub fn code(&self) -> &'static str {
        match self {
            PersonNature::NaturalPerson => "N",
            PersonNature::Company => "C",
            PersonNature::CloseCorporation => "CC",
            PersonNature::Trust => "T",
            PersonNature::GovernmentBody => "G",
        }
    }

    /// Whether this nature denotes a natural person
    ///
    /// Natural persons require the natural-person name block (surname,
    /// first names, initials); all other natures are organizations.
    pub fn is_natural(&self) -> bool {
        matches!(self, PersonNature::NaturalPerson)
    }
}

impl fmt::Display for PersonNature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PersonNature {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "N" => Ok(PersonNature::NaturalPerson),
            "C" => Ok(PersonNature::Company),
            "CC" => Ok(PersonNature::CloseCorporation),
            "T" => Ok(PersonNature::Trust),
            "G" => Ok(PersonNature::GovernmentBody),
            other => Err(RegistrationError::UnknownNatureCode(other.to_string())),
        }
    }
}
