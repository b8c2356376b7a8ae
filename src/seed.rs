//! One-time pre-population of a document.
//!
//! Seeds describe children and gifts by value only; ids and timestamps are
//! assigned by the model constructors when the seed is built, and every entry
//! passes the same validation as user input.

use crate::error::ValidationError;
use crate::model::{Child, Gift};
use crate::types::GiftStatus;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    #[serde(default)]
    pub children: Vec<SeedChild>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedChild {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default)]
    pub gifts: Vec<SeedGift>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeedGift {
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub status: GiftStatus,
}

impl SeedGift {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            status: GiftStatus::Idea,
        }
    }

    pub fn with_status(mut self, status: GiftStatus) -> Self {
        self.status = status;
        self
    }
}

impl Seed {
    /// The first-run sample shown to a new user.
    pub fn sample() -> Self {
        Self {
            children: vec![
                SeedChild {
                    name: "Timmy".to_string(),
                    budget: None,
                    gifts: vec![
                        SeedGift::new("Red Bicycle", 120.50).with_status(GiftStatus::Purchased)
                    ],
                },
                SeedChild {
                    name: "Sarah".to_string(),
                    budget: None,
                    gifts: vec![SeedGift::new("Doll House", 85.00)],
                },
            ],
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Build validated entities. Fails on the first invalid entry.
    pub fn build(&self) -> Result<Vec<Child>, ValidationError> {
        self.children
            .iter()
            .map(|seed| {
                let mut child = Child::new(&seed.name, seed.budget)?;
                for g in &seed.gifts {
                    let mut gift = Gift::new(&g.name, g.price)?;
                    gift.set_status(g.status);
                    child.push_gift(gift);
                }
                Ok(child)
            })
            .collect()
    }
}
