use super::{validate_name, validate_price};
use crate::error::ValidationError;
use crate::types::{GiftId, GiftStatus, Timestamp};
use serde::Serialize;

/// A priced wish-list item.
///
/// Gifts come from [`Gift::new`] or from a decoded [`Document`](crate::Document),
/// never straight from JSON:
///
/// ```compile_fail
/// let gift: gift_tracker::Gift =
///     serde_json::from_str(r#"{"name": "", "price": -50.0}"#).unwrap();
/// ```
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gift {
    id: GiftId,
    name: String,
    price: f64,
    status: GiftStatus,
    added_at: Timestamp,
}

impl Gift {
    /// Create a gift with a fresh id in the `idea` status.
    pub fn new(name: &str, price: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            id: GiftId::new(),
            name: validate_name("Gift", name)?,
            price: validate_price(price)?,
            status: GiftStatus::Idea,
            added_at: Timestamp::now(),
        })
    }

    /// Reassemble a gift from repaired storage fields.
    pub(crate) fn from_parts(
        id: GiftId,
        name: String,
        price: f64,
        status: GiftStatus,
        added_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            price,
            status,
            added_at,
        }
    }

    pub fn id(&self) -> GiftId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn status(&self) -> GiftStatus {
        self.status
    }

    pub fn added_at(&self) -> Timestamp {
        self.added_at
    }

    /// Return this gift moved one step along the status cycle.
    #[must_use]
    pub fn advance_status(self) -> Self {
        Self {
            status: self.status.next(),
            ..self
        }
    }

    pub fn rename(&mut self, name: &str) -> Result<(), ValidationError> {
        self.name = validate_name("Gift", name)?;
        Ok(())
    }

    pub fn set_price(&mut self, price: f64) -> Result<(), ValidationError> {
        self.price = validate_price(price)?;
        Ok(())
    }

    pub fn set_status(&mut self, status: GiftStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_gift_starts_as_idea() {
        let gift = Gift::new(" Bicycle ", 120.5).unwrap();
        assert_eq!(gift.name(), "Bicycle");
        assert_eq!(gift.price(), 120.5);
        assert_eq!(gift.status(), GiftStatus::Idea);
    }

    #[test]
    fn test_new_gift_rejects_bad_input() {
        assert_eq!(
            Gift::new("", 1.0),
            Err(ValidationError::EmptyName { field: "Gift" })
        );
        assert!(matches!(
            Gift::new("Kite", -1.0),
            Err(ValidationError::InvalidPrice(_))
        ));
        assert!(Gift::new("Kite", f64::NAN).is_err());
    }

    #[test]
    fn test_advance_status_keeps_identity() {
        let gift = Gift::new("Kite", 10.0).unwrap();
        let id = gift.id();
        let advanced = gift.advance_status();
        assert_eq!(advanced.id(), id);
        assert_eq!(advanced.status(), GiftStatus::Purchased);
        assert_eq!(advanced.name(), "Kite");
    }

    #[test]
    fn test_failed_edit_leaves_gift_unchanged() {
        let mut gift = Gift::new("Kite", 10.0).unwrap();
        assert!(gift.set_price(-3.0).is_err());
        assert!(gift.rename("   ").is_err());
        assert_eq!(gift.price(), 10.0);
        assert_eq!(gift.name(), "Kite");
    }

    #[test]
    fn test_serialized_shape() {
        let gift = Gift::new("Kite", 10.0).unwrap();
        let value = serde_json::to_value(&gift).unwrap();
        assert_eq!(value["name"], "Kite");
        assert_eq!(value["status"], "idea");
        assert!(value.get("addedAt").is_some());
        assert_eq!(value["id"], gift.id().to_string());
    }
}
