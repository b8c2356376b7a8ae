//! Named operations the presentation layer dispatches to the tracker.

use crate::error::Result;
use crate::model::SettingValue;
use crate::seed::Seed;
use crate::service::{ChildUpdate, GiftUpdate, Outcome, TrackerService};
use crate::storage::StorageSlot;
use crate::types::{ChildId, GiftId, GiftStatus};
use serde::{Deserialize, Serialize};

/// One user action, e.g. `{"op": "add_gift", "child": "…", "name": "Kite", "price": 5}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    AddChild {
        name: String,
        #[serde(default)]
        budget: Option<f64>,
    },
    UpdateChild {
        id: ChildId,
        update: ChildUpdate,
    },
    DeleteChild {
        id: ChildId,
    },
    AddGift {
        child: ChildId,
        name: String,
        price: f64,
    },
    UpdateGift {
        child: ChildId,
        gift: GiftId,
        update: GiftUpdate,
    },
    DeleteGift {
        child: ChildId,
        gift: GiftId,
    },
    ToggleGiftStatus {
        child: ChildId,
        gift: GiftId,
    },
    UpdateSetting {
        key: String,
        value: SettingValue,
    },
    ToggleSetting {
        key: String,
    },
    Seed {
        seed: Seed,
    },
}

/// What a command produced.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CommandOutput {
    Child(ChildId),
    Gift(GiftId),
    Status(GiftStatus),
    Flag(bool),
    /// Whether a delete found something to remove.
    Removed(bool),
    Seeded(Vec<ChildId>),
    Done,
}

impl<S: StorageSlot> TrackerService<S> {
    /// Run a command against the matching operation.
    pub fn execute(&mut self, command: Command) -> Result<Outcome<CommandOutput>> {
        tracing::debug!(?command, "executing command");
        let outcome = match command {
            Command::AddChild { name, budget } => {
                self.add_child(&name, budget)?.map(CommandOutput::Child)
            }
            Command::UpdateChild { id, update } => {
                self.update_child(id, update)?.map(|()| CommandOutput::Done)
            }
            Command::DeleteChild { id } => self
                .delete_child(id)
                .map(|removed| CommandOutput::Removed(removed.is_some())),
            Command::AddGift { child, name, price } => {
                self.add_gift(child, &name, price)?.map(CommandOutput::Gift)
            }
            Command::UpdateGift {
                child,
                gift,
                update,
            } => self
                .update_gift(child, gift, update)?
                .map(|()| CommandOutput::Done),
            Command::DeleteGift { child, gift } => self
                .delete_gift(child, gift)
                .map(|removed| CommandOutput::Removed(removed.is_some())),
            Command::ToggleGiftStatus { child, gift } => self
                .toggle_gift_status(child, gift)?
                .map(CommandOutput::Status),
            Command::UpdateSetting { key, value } => self
                .update_setting(&key, value)?
                .map(|()| CommandOutput::Done),
            Command::ToggleSetting { key } => self.toggle_setting(&key)?.map(CommandOutput::Flag),
            Command::Seed { seed } => self.seed(&seed)?.map(CommandOutput::Seeded),
        };
        Ok(outcome)
    }
}
