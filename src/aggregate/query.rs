//! Filtered, sorted gift listings across all children.

use crate::model::{Child, Document, Gift};
use serde::{Deserialize, Serialize};

/// Ordering of a gift listing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftSort {
    /// Children in display order, gifts in insertion order.
    #[default]
    Insertion,
    /// Most recently added first.
    Newest,
    PriceAsc,
    PriceDesc,
}

/// A listing request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GiftQuery {
    /// Only gifts of children with exactly this name.
    pub child: Option<String>,
    /// Case-insensitive substring of the child or gift name.
    pub search: Option<String>,
    pub sort: GiftSort,
}

/// One row of a listing: a gift and the child it belongs to.
#[derive(Clone, Copy, Debug)]
pub struct GiftRow<'a> {
    pub child: &'a Child,
    pub gift: &'a Gift,
}

impl GiftQuery {
    pub fn for_child(name: impl Into<String>) -> Self {
        Self {
            child: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn sorted(mut self, sort: GiftSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn run<'a>(&self, doc: &'a Document) -> Vec<GiftRow<'a>> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut rows: Vec<GiftRow<'a>> = doc
            .children()
            .iter()
            .filter(|c| self.child.as_deref().map_or(true, |name| c.name() == name))
            .flat_map(|child| child.gifts().iter().map(move |gift| GiftRow { child, gift }))
            .filter(|row| match &needle {
                Some(needle) => {
                    row.child.name().to_lowercase().contains(needle)
                        || row.gift.name().to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();

        // Stable sorts keep insertion order among equal keys.
        match self.sort {
            GiftSort::Insertion => {}
            GiftSort::Newest => rows.sort_by(|a, b| b.gift.added_at().cmp(&a.gift.added_at())),
            GiftSort::PriceAsc => rows.sort_by(|a, b| a.gift.price().total_cmp(&b.gift.price())),
            GiftSort::PriceDesc => rows.sort_by(|a, b| b.gift.price().total_cmp(&a.gift.price())),
        }
        rows
    }
}

/// Distinct child names in display order, for a filter picker.
pub fn child_names(doc: &Document) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for child in doc.children() {
        if !names.contains(&child.name()) {
            names.push(child.name());
        }
    }
    names
}
