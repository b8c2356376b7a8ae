//! Subscription types for live tracker updates.

use crate::model::{SettingKey, SettingValue};
use crate::types::{ChildId, GiftId, GiftStatus};
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping subscriber.
    /// Default: 256
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 256,
            filter: SubscriptionFilter::all(),
        }
    }
}

/// Filter criteria for subscriptions.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Only events about this child (None = all children).
    pub child: Option<ChildId>,

    /// Include child and gift events.
    pub include_records: bool,

    /// Include setting changes.
    pub include_settings: bool,

    /// Include persistence failures.
    pub include_storage: bool,
}

impl SubscriptionFilter {
    /// Subscribe to everything.
    pub fn all() -> Self {
        Self {
            child: None,
            include_records: true,
            include_settings: true,
            include_storage: true,
        }
    }

    /// Subscribe to changes of one child and its gifts.
    pub fn child(id: ChildId) -> Self {
        Self {
            child: Some(id),
            include_records: true,
            ..Default::default()
        }
    }

    /// Subscribe to persistence failures only.
    pub fn storage() -> Self {
        Self {
            include_storage: true,
            ..Default::default()
        }
    }

    pub(crate) fn matches(&self, event: &TrackerEvent) -> bool {
        match event {
            TrackerEvent::Dropped { .. } => true,
            TrackerEvent::PersistFailed { .. } => self.include_storage,
            TrackerEvent::SettingChanged { .. } => self.include_settings,
            TrackerEvent::Seeded { .. } => self.include_records && self.child.is_none(),
            other => {
                self.include_records
                    && match (self.child, other.child()) {
                        (Some(wanted), Some(child)) => wanted == child,
                        _ => true,
                    }
            }
        }
    }
}

/// Events emitted by the tracker after each change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TrackerEvent {
    // --- Record Events ---
    ChildAdded {
        child: ChildId,
        name: String,
    },

    ChildUpdated {
        child: ChildId,
    },

    /// A child and all of its gifts were removed.
    ChildRemoved {
        child: ChildId,
        gifts: usize,
    },

    GiftAdded {
        child: ChildId,
        gift: GiftId,
    },

    GiftUpdated {
        child: ChildId,
        gift: GiftId,
        status: GiftStatus,
    },

    GiftRemoved {
        child: ChildId,
        gift: GiftId,
    },

    /// Children were appended from a seed.
    Seeded {
        children: usize,
    },

    // --- Settings Events ---
    SettingChanged {
        key: SettingKey,
        value: SettingValue,
    },

    // --- Storage Events ---
    /// A change was applied in memory but could not be saved.
    PersistFailed {
        error: String,
    },

    // --- Lifecycle Events ---
    /// Subscription was dropped.
    Dropped {
        reason: DropReason,
    },
}

impl TrackerEvent {
    /// The child an event is about, if any.
    pub fn child(&self) -> Option<ChildId> {
        match self {
            TrackerEvent::ChildAdded { child, .. }
            | TrackerEvent::ChildUpdated { child }
            | TrackerEvent::ChildRemoved { child, .. }
            | TrackerEvent::GiftAdded { child, .. }
            | TrackerEvent::GiftUpdated { child, .. }
            | TrackerEvent::GiftRemoved { child, .. } => Some(*child),
            _ => None,
        }
    }
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<TrackerEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<TrackerEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<TrackerEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<TrackerEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything buffered right now.
    pub fn drain(&self) -> Vec<TrackerEvent> {
        self.receiver.try_iter().collect()
    }
}
