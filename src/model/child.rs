use super::{validate_budget, validate_name, Gift};
use crate::error::ValidationError;
use crate::types::{ChildId, GiftId, Timestamp};
use serde::Serialize;

/// A named beneficiary owning an ordered list of gifts.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    id: ChildId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    budget: Option<f64>,
    created_at: Timestamp,
    gifts: Vec<Gift>,
}

impl Child {
    /// Create a child with a fresh id and no gifts.
    pub fn new(name: &str, budget: Option<f64>) -> Result<Self, ValidationError> {
        Ok(Self {
            id: ChildId::new(),
            name: validate_name("Child", name)?,
            budget: validate_budget(budget)?,
            created_at: Timestamp::now(),
            gifts: Vec::new(),
        })
    }

    pub(crate) fn from_parts(
        id: ChildId,
        name: String,
        budget: Option<f64>,
        created_at: Timestamp,
        gifts: Vec<Gift>,
    ) -> Self {
        Self {
            id,
            name,
            budget,
            created_at,
            gifts,
        }
    }

    pub fn id(&self) -> ChildId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn budget(&self) -> Option<f64> {
        self.budget
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Gifts in insertion order.
    pub fn gifts(&self) -> &[Gift] {
        &self.gifts
    }

    pub fn gift(&self, id: GiftId) -> Option<&Gift> {
        self.gifts.iter().find(|g| g.id() == id)
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validate_name("Child", name)?;
        Ok(())
    }

    pub fn set_budget(&mut self, budget: Option<f64>) -> Result<(), ValidationError> {
        self.budget = validate_budget(budget)?;
        Ok(())
    }

    pub(crate) fn gift_mut(&mut self, id: GiftId) -> Option<&mut Gift> {
        self.gifts.iter_mut().find(|g| g.id() == id)
    }

    pub(crate) fn push_gift(&mut self, gift: Gift) {
        self.gifts.push(gift);
    }

    pub(crate) fn remove_gift(&mut self, id: GiftId) -> Option<Gift> {
        let index = self.gifts.iter().position(|g| g.id() == id)?;
        Some(self.gifts.remove(index))
    }
}
