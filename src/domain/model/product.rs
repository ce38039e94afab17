use crate::error::AttributeError;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Caller-supplied product attributes. Also the shape of the ledger-resident
/// product record, minus its key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub name: String,
    pub color: String,
    pub material: String,
    /// Minor currency units.
    pub price: u64,
    pub year: u32,
}

impl ProductAttributes {
    /// Builds attributes, defaulting `year` to the current UTC year.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        material: impl Into<String>,
        price: u64,
        year: Option<u32>,
    ) -> Self {
        let year = year.unwrap_or_else(|| chrono::Utc::now().year().max(0) as u32);
        Self {
            name: name.into(),
            color: color.into(),
            material: material.into(),
            price,
            year,
        }
    }

    /// Boundary check run before fingerprinting. Blank text or a zero year
    /// would be indistinguishable from a never-written ledger slot.
    pub fn validate(&self) -> Result<(), AttributeError> {
        if self.name.trim().is_empty() {
            return Err(AttributeError::Blank("name"));
        }
        if self.color.trim().is_empty() {
            return Err(AttributeError::Blank("color"));
        }
        if self.material.trim().is_empty() {
            return Err(AttributeError::Blank("material"));
        }
        if self.year == 0 {
            return Err(AttributeError::ZeroYear);
        }
        Ok(())
    }

    /// True for the all-empty/zero value the contract returns for a key that
    /// was never written.
    pub fn is_unset(&self) -> bool {
        self.name.is_empty()
            && self.color.is_empty()
            && self.material.is_empty()
            && self.price == 0
            && self.year == 0
    }
}
