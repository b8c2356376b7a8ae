//! Core identifier and scalar types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Unique identifier for a child.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChildId(pub Uuid);

impl ChildId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        ChildId(Uuid::new_v4())
    }
}

impl Default for ChildId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChildId({})", self.0)
    }
}

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChildId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(ChildId)
    }
}

/// Unique identifier for a gift.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GiftId(pub Uuid);

impl GiftId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        GiftId(Uuid::new_v4())
    }
}

impl Default for GiftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GiftId({})", self.0)
    }
}

impl fmt::Display for GiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GiftId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(GiftId)
    }
}

/// Milliseconds since Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Current time. A clock set before the epoch reads as zero.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        Timestamp(millis)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

/// Where a gift sits in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftStatus {
    #[default]
    Idea,
    Purchased,
    Wrapped,
}

impl GiftStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [GiftStatus; 3] = [GiftStatus::Idea, GiftStatus::Purchased, GiftStatus::Wrapped];

    /// The next status in the cycle idea -> purchased -> wrapped -> idea.
    pub fn next(self) -> Self {
        match self {
            GiftStatus::Idea => GiftStatus::Purchased,
            GiftStatus::Purchased => GiftStatus::Wrapped,
            GiftStatus::Wrapped => GiftStatus::Idea,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GiftStatus::Idea => "idea",
            GiftStatus::Purchased => "purchased",
            GiftStatus::Wrapped => "wrapped",
        }
    }

    /// Parse a stored status string. Returns `None` for anything outside the
    /// three known values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "idea" => Some(GiftStatus::Idea),
            "purchased" => Some(GiftStatus::Purchased),
            "wrapped" => Some(GiftStatus::Wrapped),
            _ => None,
        }
    }
}

impl fmt::Display for GiftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
