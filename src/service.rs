//! The tracker service: sole owner and mutator of the document.

use crate::aggregate::{budget_status, Summary};
use crate::error::{Result, StoreError, TrackerError};
use crate::model::{Child, Document, Gift, SettingKey, SettingValue};
use crate::seed::Seed;
use crate::storage::{FileSlot, LoadSource, MemorySlot, PersistentStore, StorageSlot, StoreConfig};
use crate::subscriptions::{
    SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager, TrackerEvent,
};
use crate::types::{ChildId, GiftId, GiftStatus};
use serde::{Deserialize, Serialize};

/// The value of an applied change together with the result of saving it.
///
/// A change that could not be saved is still applied in memory; the save
/// failure travels here and on the subscription channel.
#[must_use]
#[derive(Debug)]
pub struct Outcome<T> {
    value: T,
    persist_error: Option<StoreError>,
}

impl<T> Outcome<T> {
    fn saved(value: T, persist_error: Option<StoreError>) -> Self {
        Self {
            value,
            persist_error,
        }
    }

    /// Nothing changed, so nothing needed saving.
    fn unchanged(value: T) -> Self {
        Self::saved(value, None)
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// True when the change reached storage (or there was nothing to save).
    pub fn is_durable(&self) -> bool {
        self.persist_error.is_none()
    }

    pub fn persist_error(&self) -> Option<&StoreError> {
        self.persist_error.as_ref()
    }

    /// Fold a save failure into an error, for callers that treat it as one.
    pub fn into_result(self) -> Result<T> {
        match self.persist_error {
            Some(e) => Err(TrackerError::Storage(e)),
            None => Ok(self.value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            persist_error: self.persist_error,
        }
    }
}

/// Edits to a child. `None` fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildUpdate {
    pub name: Option<String>,
    pub budget: Option<f64>,
    /// Remove the budget. Takes precedence over `budget`.
    pub clear_budget: bool,
}

/// Edits to a gift. `None` fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub status: Option<GiftStatus>,
}

/// Owns the document, applies changes to it and saves it after each one.
pub struct TrackerService<S = FileSlot> {
    store: PersistentStore<S>,
    document: Document,
    subscriptions: SubscriptionManager,
}

impl TrackerService<FileSlot> {
    /// Open a file-backed store and load its document.
    pub fn open(config: StoreConfig) -> std::result::Result<Self, StoreError> {
        Ok(Self::start(PersistentStore::open(config)?))
    }
}

impl TrackerService<MemorySlot> {
    pub fn in_memory() -> Self {
        Self::start(PersistentStore::in_memory())
    }
}

impl<S: StorageSlot> TrackerService<S> {
    /// Load the stored document, or start from the default one. Never fails.
    pub fn start(store: PersistentStore<S>) -> Self {
        let (document, source) = store.load_detailed();
        match &source {
            LoadSource::Recovered(reason) => {
                tracing::warn!(slot = %store.slot().describe(), %reason, "started from default document")
            }
            _ => tracing::info!(
                slot = %store.slot().describe(),
                children = document.children().len(),
                "tracker started"
            ),
        }

        Self {
            store,
            document,
            subscriptions: SubscriptionManager::new(),
        }
    }

    // --- Reads ---

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn child(&self, id: ChildId) -> Option<&Child> {
        self.document.child(id)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.document)
    }

    pub fn store(&self) -> &PersistentStore<S> {
        &self.store
    }

    // --- Subscriptions ---

    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id)
    }

    // --- Children ---

    pub fn add_child(&mut self, name: &str, budget: Option<f64>) -> Result<Outcome<ChildId>> {
        let child = Child::new(name, budget)?;
        let id = child.id();
        let event = TrackerEvent::ChildAdded {
            child: id,
            name: child.name().to_string(),
        };
        self.document.push_child(child);
        tracing::debug!(child = %id, "child added");
        Ok(self.commit(id, vec![event]))
    }

    /// Rename a child or change its budget. All edits are validated before
    /// any is applied.
    pub fn update_child(&mut self, id: ChildId, update: ChildUpdate) -> Result<Outcome<()>> {
        let current = self
            .document
            .child(id)
            .ok_or(TrackerError::ChildNotFound(id))?;

        let mut edited = current.clone();
        if let Some(name) = &update.name {
            edited.rename(name)?;
        }
        if update.clear_budget {
            edited.set_budget(None)?;
        } else if update.budget.is_some() {
            edited.set_budget(update.budget)?;
        }

        if let Some(slot) = self.document.child_mut(id) {
            *slot = edited;
        }
        Ok(self.commit((), vec![TrackerEvent::ChildUpdated { child: id }]))
    }

    /// Remove a child and all its gifts. An unknown id is a no-op.
    pub fn delete_child(&mut self, id: ChildId) -> Outcome<Option<Child>> {
        match self.document.remove_child(id) {
            Some(child) => {
                let event = TrackerEvent::ChildRemoved {
                    child: id,
                    gifts: child.gifts().len(),
                };
                tracing::debug!(child = %id, gifts = child.gifts().len(), "child removed");
                self.commit(Some(child), vec![event])
            }
            None => {
                tracing::debug!(child = %id, "delete of unknown child ignored");
                Outcome::unchanged(None)
            }
        }
    }

    // --- Gifts ---

    pub fn add_gift(&mut self, child_id: ChildId, name: &str, price: f64) -> Result<Outcome<GiftId>> {
        let child = self
            .document
            .child_mut(child_id)
            .ok_or(TrackerError::ChildNotFound(child_id))?;
        let gift = Gift::new(name, price)?;
        let gift_id = gift.id();
        child.push_gift(gift);

        if let Some(status) = budget_status(child).filter(|s| s.over_budget) {
            tracing::warn!(
                child = %child_id,
                budget = status.budget,
                spent = status.spent,
                "child is over budget"
            );
        }

        let event = TrackerEvent::GiftAdded {
            child: child_id,
            gift: gift_id,
        };
        Ok(self.commit(gift_id, vec![event]))
    }

    /// Move a gift one step along idea -> purchased -> wrapped -> idea.
    pub fn toggle_gift_status(
        &mut self,
        child_id: ChildId,
        gift_id: GiftId,
    ) -> Result<Outcome<GiftStatus>> {
        let gift = self.gift_mut(child_id, gift_id)?;
        *gift = gift.clone().advance_status();
        let status = gift.status();

        let event = TrackerEvent::GiftUpdated {
            child: child_id,
            gift: gift_id,
            status,
        };
        Ok(self.commit(status, vec![event]))
    }

    /// Edit a gift's name, price or status. All edits are validated before
    /// any is applied.
    pub fn update_gift(
        &mut self,
        child_id: ChildId,
        gift_id: GiftId,
        update: GiftUpdate,
    ) -> Result<Outcome<()>> {
        let gift = self.gift_mut(child_id, gift_id)?;

        let mut edited = gift.clone();
        if let Some(name) = &update.name {
            edited.rename(name)?;
        }
        if let Some(price) = update.price {
            edited.set_price(price)?;
        }
        if let Some(status) = update.status {
            edited.set_status(status);
        }
        let status = edited.status();
        *gift = edited;

        let event = TrackerEvent::GiftUpdated {
            child: child_id,
            gift: gift_id,
            status,
        };
        Ok(self.commit((), vec![event]))
    }

    /// Remove one gift. An unknown child or gift is a no-op.
    pub fn delete_gift(&mut self, child_id: ChildId, gift_id: GiftId) -> Outcome<Option<Gift>> {
        let removed = self
            .document
            .child_mut(child_id)
            .and_then(|c| c.remove_gift(gift_id));
        match removed {
            Some(gift) => {
                let event = TrackerEvent::GiftRemoved {
                    child: child_id,
                    gift: gift_id,
                };
                self.commit(Some(gift), vec![event])
            }
            None => {
                tracing::debug!(child = %child_id, gift = %gift_id, "delete of unknown gift ignored");
                Outcome::unchanged(None)
            }
        }
    }

    // --- Settings ---

    /// Set a named setting. Unknown keys and mistyped or out-of-range values
    /// are rejected.
    pub fn update_setting(&mut self, key: &str, value: SettingValue) -> Result<Outcome<()>> {
        let key: SettingKey = key.parse()?;
        self.document.settings_mut().set(key, value)?;
        Ok(self.commit((), vec![TrackerEvent::SettingChanged { key, value }]))
    }

    /// Flip a boolean setting, returning its new value.
    pub fn toggle_setting(&mut self, key: &str) -> Result<Outcome<bool>> {
        let key: SettingKey = key.parse()?;
        let enabled = self.document.settings_mut().toggle(key)?;
        let event = TrackerEvent::SettingChanged {
            key,
            value: SettingValue::Bool(enabled),
        };
        Ok(self.commit(enabled, vec![event]))
    }

    // --- Seeding ---

    /// Append the seeded children. Every entry is validated before any is
    /// added.
    pub fn seed(&mut self, seed: &Seed) -> Result<Outcome<Vec<ChildId>>> {
        let children = seed.build()?;
        let ids: Vec<ChildId> = children.iter().map(Child::id).collect();
        for child in children {
            self.document.push_child(child);
        }
        tracing::info!(children = ids.len(), "document seeded");
        let event = TrackerEvent::Seeded {
            children: ids.len(),
        };
        Ok(self.commit(ids, vec![event]))
    }

    // --- Internals ---

    fn gift_mut(&mut self, child_id: ChildId, gift_id: GiftId) -> Result<&mut Gift> {
        self.document
            .child_mut(child_id)
            .ok_or(TrackerError::ChildNotFound(child_id))?
            .gift_mut(gift_id)
            .ok_or(TrackerError::GiftNotFound {
                child: child_id,
                gift: gift_id,
            })
    }

    /// Save the document after a change and tell subscribers about it.
    fn commit<T>(&mut self, value: T, events: Vec<TrackerEvent>) -> Outcome<T> {
        let persist_error = self.store.save(&self.document).err();

        for event in events {
            self.subscriptions.broadcast(event);
        }
        if let Some(e) = &persist_error {
            tracing::error!(slot = %self.store.slot().describe(), error = %e, "failed to save document");
            self.subscriptions.broadcast(TrackerEvent::PersistFailed {
                error: e.to_string(),
            });
        }

        Outcome::saved(value, persist_error)
    }
}
