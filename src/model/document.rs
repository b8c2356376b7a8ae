use super::migrate::{migrate, StoredRoot};
use super::{Child, Settings};
use crate::types::ChildId;
use serde::{Deserialize, Serialize};

/// The single persisted root: every child, their gifts, and the settings.
///
/// Deserializing goes through [`migrate`], so a decoded document always
/// satisfies the model invariants however broken its input was.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRoot")]
pub struct Document {
    children: Vec<Child>,
    settings: Settings,
}

impl Document {
    pub(crate) fn from_parts(children: Vec<Child>, settings: Settings) -> Self {
        Self { children, settings }
    }

    /// Children in display order.
    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn child(&self, id: ChildId) -> Option<&Child> {
        self.children.iter().find(|c| c.id() == id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn child_mut(&mut self, id: ChildId) -> Option<&mut Child> {
        self.children.iter_mut().find(|c| c.id() == id)
    }

    pub(crate) fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub(crate) fn push_child(&mut self, child: Child) {
        self.children.push(child);
    }

    /// Remove a child together with all of its gifts.
    pub(crate) fn remove_child(&mut self, id: ChildId) -> Option<Child> {
        let index = self.children.iter().position(|c| c.id() == id)?;
        Some(self.children.remove(index))
    }
}

impl From<StoredRoot> for Document {
    fn from(root: StoredRoot) -> Self {
        migrate(root).0
    }
}
