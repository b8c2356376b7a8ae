//! # Gift Tracker
//!
//! A local-first gift tracker: register children, attach wish-list gifts to
//! each, move gifts through an idea → purchased → wrapped cycle and see where
//! the money goes.
//!
//! ## Core Concepts
//!
//! - **Document**: the single root holding every child, gift and setting,
//!   always saved as a whole
//! - **Slot**: the storage medium, one named location holding the serialized
//!   document (a file, or memory)
//! - **Tracker**: the owner of the document; every change goes through it and
//!   is saved straight away
//! - **Aggregates**: pure statistics computed from a borrowed document
//!
//! ## Example
//!
//! ```ignore
//! use gift_tracker::{StoreConfig, TrackerService, Summary};
//!
//! let mut tracker = TrackerService::open(StoreConfig::at("./gifts.json"))?;
//!
//! let timmy = tracker.add_child("Timmy", Some(150.0))?.into_result()?;
//! let bike = tracker.add_gift(timmy, "Bicycle", 120.50)?.into_result()?;
//! tracker.toggle_gift_status(timmy, bike)?;
//!
//! let summary = tracker.summary();
//! println!("spent {:.2} on {} gifts", summary.total_spent, summary.gift_count);
//! ```

pub mod aggregate;
pub mod command;
pub mod error;
pub mod model;
pub mod seed;
pub mod service;
pub mod storage;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use aggregate::{
    BudgetBalance, BudgetStatus, ChildStats, GiftQuery, GiftRow, GiftSort, SpendingByChild,
    StatusCounts, Summary,
};
pub use command::{Command, CommandOutput};
pub use error::{Result, StoreError, TrackerError, ValidationError};
pub use model::{Child, Document, Gift, MigrationReport, SettingKey, SettingValue, Settings};
pub use seed::{Seed, SeedChild, SeedGift};
pub use service::{ChildUpdate, GiftUpdate, Outcome, TrackerService};
pub use storage::{FileSlot, LoadSource, MemorySlot, PersistentStore, StorageSlot, StoreConfig};
pub use subscriptions::{
    DropReason, SubscriptionConfig, SubscriptionFilter, SubscriptionHandle, SubscriptionId,
    TrackerEvent,
};
pub use types::*;
