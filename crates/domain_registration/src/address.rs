//! Address types

use serde::{Deserialize, Serialize};

use registry_kernel::AddressId;

/// Address type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    Residential,
    Postal,
    Business,
}

/// A postal address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub address_type: AddressType,
    pub line1: String,
    pub line2: Option<String>,
    pub suburb: Option<String>,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub is_primary: bool,
}

impl Address {
    /// Creates a new address
    pub fn new(
        address_type: AddressType,
        line1: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            id: AddressId::new_v7(),
            address_type,
            line1: line1.into(),
            line2: None,
            suburb: None,
            city: city.into(),
            postal_code: postal_code.into(),
            country: "ZA".to_string(),
            is_primary: false,
        }
    }

    /// Formats address for display
    pub fn format(&self) -> String {
        let mut lines = vec![self.line1.clone()];
        if let Some(l2) = &self.line2 {
            lines.push(l2.clone());
        }
        if let Some(suburb) = &self.suburb {
            lines.push(suburb.clone());
        }
        lines.push(format!("{} {}", self.city, self.postal_code));
        lines.push(self.country.clone());
        lines.join("\n")
    }
}
