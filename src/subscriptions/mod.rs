//! Subscription system for live tracker updates.
//!
//! The presentation layer subscribes to learn when to re-render, and to hear
//! about changes that were applied in memory but could not be saved:
//! - Child and gift changes
//! - Setting changes
//! - Persistence failures
//!
//! Subscriptions have bounded buffers; a subscriber that falls behind gets a
//! final `Dropped` event and is removed rather than blocking the tracker.
//!
//! # Example
//!
//! ```ignore
//! let handle = tracker.subscribe(SubscriptionConfig::default());
//!
//! tracker.add_child("Timmy", None)?;
//!
//! for event in handle.drain() {
//!     match event {
//!         TrackerEvent::PersistFailed { error } => eprintln!("not saved: {error}"),
//!         _ => redraw(),
//!     }
//! }
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle, SubscriptionId,
    TrackerEvent,
};
