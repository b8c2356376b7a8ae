//! Persistence of the document to a single storage slot.
//!
//! A slot is the storage medium: one named location holding one serialized
//! document, with whole-value read and write. [`PersistentStore`] sits on
//! top of a slot and owns the codec, the recovery policy for corrupt data
//! and the migration of older layouts.

mod file;
mod memory;
mod store;

pub use file::{FileSlot, StoreConfig};
pub use memory::MemorySlot;
pub use store::{LoadSource, PersistentStore};

use crate::error::StoreError;

/// A single named storage location holding one serialized document.
pub trait StorageSlot {
    /// Read the stored value, `None` if nothing has been written yet.
    fn read(&self) -> Result<Option<String>, StoreError>;

    /// Replace the stored value. Either the whole value is written or the
    /// previous value is left in place.
    fn write(&self, contents: &str) -> Result<(), StoreError>;

    /// Keep a copy of a value that could not be parsed before it gets
    /// overwritten. Best effort.
    fn quarantine(&self, _contents: &str) {}

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

impl<S: StorageSlot + ?Sized> StorageSlot for Box<S> {
    fn read(&self) -> Result<Option<String>, StoreError> {
        (**self).read()
    }

    fn write(&self, contents: &str) -> Result<(), StoreError> {
        (**self).write(contents)
    }

    fn quarantine(&self, contents: &str) {
        (**self).quarantine(contents)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
