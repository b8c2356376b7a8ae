//! Entity shapes, identity assignment and validation rules.
//!
//! Entities are only constructed through the validating constructors
//! ([`Child::new`], [`Gift::new`]) or through [`migrate`], which repairs
//! whatever it reads from storage. Fields are private so that nothing outside
//! the crate can put a document into a state that breaks its invariants.

mod child;
mod document;
mod gift;
pub mod migrate;
mod settings;

pub use child::Child;
pub use document::Document;
pub use gift::Gift;
pub use migrate::{migrate, MigrationReport, StoredRoot};
pub use settings::{SettingKey, SettingValue, Settings};

use crate::error::ValidationError;

/// Trim a display name and reject it if nothing is left.
pub(crate) fn validate_name(field: &'static str, name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(price)
    } else {
        Err(ValidationError::InvalidPrice(price))
    }
}

pub(crate) fn validate_budget(budget: Option<f64>) -> Result<Option<f64>, ValidationError> {
    match budget {
        Some(b) if !(b.is_finite() && b >= 0.0) => Err(ValidationError::InvalidBudget(b)),
        other => Ok(other),
    }
}
