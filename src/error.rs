//! Error types for the gift tracker.

use crate::types::{ChildId, GiftId};
use thiserror::Error;

/// Main error type for tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Child not found: {0}")]
    ChildNotFound(ChildId),

    #[error("Gift not found: {gift} (child {child})")]
    GiftNotFound { child: ChildId, gift: GiftId },

    #[error("Storage failure: {0}")]
    Storage(#[from] StoreError),
}

/// Rejected user input. Never leaves the document partially changed.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} name must not be empty")]
    EmptyName { field: &'static str },

    #[error("Price must be a finite number >= 0, got {0}")]
    InvalidPrice(f64),

    #[error("Budget must be a finite number >= 0, got {0}")]
    InvalidBudget(f64),

    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    #[error("Setting {key} expects a {expected} value")]
    SettingType {
        key: &'static str,
        expected: &'static str,
    },

    #[error("Setting {key} out of range: {value}")]
    SettingRange { key: &'static str, value: f64 },
}

/// Errors raised by the storage medium.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    #[error("Storage slot is locked by another process")]
    Locked,

    #[error("Storage directory does not exist: {0}")]
    NotInitialized(String),

    #[error("Storage quota exceeded: needed {needed} bytes, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;
