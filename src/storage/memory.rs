//! In-process storage slot.

use super::StorageSlot;
use crate::error::StoreError;
use parking_lot::Mutex;

/// A slot held in memory, with an optional size quota.
///
/// Behaves like a browser `localStorage` entry: writes larger than the quota
/// are rejected and leave the previous value in place.
#[derive(Debug, Default)]
pub struct MemorySlot {
    value: Mutex<Option<String>>,
    quarantined: Mutex<Option<String>>,
    quota: Option<usize>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that rejects values longer than `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Default::default()
        }
    }

    /// A slot that already holds `contents`.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(contents.into())),
            ..Default::default()
        }
    }

    /// Current raw value.
    pub fn contents(&self) -> Option<String> {
        self.value.lock().clone()
    }

    /// The last value handed to [`StorageSlot::quarantine`].
    pub fn quarantined(&self) -> Option<String> {
        self.quarantined.lock().clone()
    }
}

impl StorageSlot for MemorySlot {
    fn read(&self) -> Result<Option<String>, StoreError> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            if contents.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    needed: contents.len(),
                    quota,
                });
            }
        }
        *self.value.lock() = Some(contents.to_string());
        Ok(())
    }

    fn quarantine(&self, contents: &str) {
        *self.quarantined.lock() = Some(contents.to_string());
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let slot = MemorySlot::new();
        assert_eq!(slot.read().unwrap(), None);
        slot.write("{}").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_quota_rejects_large_write() {
        let slot = MemorySlot::with_quota(4);
        slot.write("{}").unwrap();

        let result = slot.write("{\"children\": []}");
        assert!(matches!(
            result,
            Err(StoreError::QuotaExceeded { needed: 16, quota: 4 })
        ));
        assert_eq!(slot.contents().as_deref(), Some("{}"));
    }
}
