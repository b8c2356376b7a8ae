use super::{FileSlot, MemorySlot, StorageSlot, StoreConfig};
use crate::error::StoreError;
use crate::model::{migrate, Document, MigrationReport};

/// How [`PersistentStore::load_detailed`] arrived at its document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadSource {
    /// Nothing stored yet; the default document was used.
    Missing,
    /// The stored document was read, repaired as described.
    Stored(MigrationReport),
    /// The slot could not be read or parsed; the default document was used.
    Recovered(String),
}

/// Whole-document persistence over a [`StorageSlot`].
pub struct PersistentStore<S> {
    slot: S,
}

impl PersistentStore<FileSlot> {
    /// Open a file-backed store.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        Ok(Self::new(FileSlot::open(config)?))
    }
}

impl PersistentStore<MemorySlot> {
    pub fn in_memory() -> Self {
        Self::new(MemorySlot::new())
    }
}

impl<S: StorageSlot> PersistentStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Read the stored document, or the default document if there is none or
    /// it cannot be read. Never fails.
    pub fn load(&self) -> Document {
        self.load_detailed().0
    }

    /// Like [`load`](Self::load), also reporting where the document came from.
    pub fn load_detailed(&self) -> (Document, LoadSource) {
        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return (Document::default(), LoadSource::Missing),
            Err(e) => {
                tracing::warn!(slot = %self.slot.describe(), error = %e, "storage unreadable, starting empty");
                return (Document::default(), LoadSource::Recovered(e.to_string()));
            }
        };

        match migrate::parse(&raw) {
            Ok((doc, report)) => {
                if !report.is_clean() {
                    tracing::warn!(slot = %self.slot.describe(), ?report, "repaired stored document");
                }
                (doc, LoadSource::Stored(report))
            }
            Err(e) => {
                tracing::warn!(slot = %self.slot.describe(), error = %e, "data corruption, resetting");
                self.slot.quarantine(&raw);
                (Document::default(), LoadSource::Recovered(e.to_string()))
            }
        }
    }

    /// Serialize the whole document and replace the stored value.
    pub fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(doc)?;
        self.slot.write(&encoded)?;
        tracing::debug!(slot = %self.slot.describe(), bytes = encoded.len(), "document saved");
        Ok(())
    }
}
