//! Normalization of stored documents.
//!
//! The stored JSON is read into loose "stored" shapes where nearly every
//! field is optional, then repaired into a [`Document`] that satisfies all
//! model invariants. Two layouts are accepted:
//!
//! - the current layout, `{ children: [...], settings: {...} }`
//! - the legacy flat layout, a JSON array of gifts that each carry their
//!   child's name (`childName`, `giftName`, `dateAdded`)
//!
//! A well-formed current document migrates to itself.

use super::{Child, Document, Gift, SettingKey, SettingValue, Settings};
use crate::types::{ChildId, GiftId, GiftStatus, Timestamp};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::HashSet;
use uuid::Uuid;

/// Name given to entities stored without a usable name.
pub const UNNAMED: &str = "Unnamed";

/// Any root the store knows how to read.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum StoredRoot {
    Current(StoredDocument),
    Legacy(Vec<LegacyGift>),
}

#[derive(Debug, Default, Deserialize)]
pub struct StoredDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    children: Vec<StoredChild>,
    #[serde(default, deserialize_with = "null_as_default")]
    settings: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredChild {
    id: Option<String>,
    name: Option<String>,
    budget: Option<f64>,
    created_at: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    gifts: Vec<StoredGift>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGift {
    id: Option<String>,
    name: Option<String>,
    price: Option<Value>,
    status: Option<String>,
    added_at: Option<f64>,
}

/// An explicit `null` reads the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the legacy flat gift list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyGift {
    id: Option<String>,
    child_name: Option<String>,
    gift_name: Option<String>,
    price: Option<Value>,
    status: Option<String>,
    date_added: Option<f64>,
}

/// What had to be repaired while reading a stored document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// The root used the legacy flat gift layout.
    pub legacy_layout: bool,
    /// Ids that were missing, malformed or duplicated and got replaced.
    pub assigned_ids: usize,
    /// Statuses that were missing or unknown and became `idea`.
    pub defaulted_statuses: usize,
    /// Prices or budgets that were missing, non-numeric or negative.
    pub repaired_amounts: usize,
    /// Blank or missing names replaced with [`UNNAMED`].
    pub renamed_blank: usize,
    /// Settings entries with unknown keys or invalid values.
    pub dropped_settings: usize,
}

impl MigrationReport {
    /// True when the stored document needed no repair at all.
    pub fn is_clean(&self) -> bool {
        *self == MigrationReport::default()
    }
}

/// Parse raw stored JSON and migrate it.
pub fn parse(raw: &str) -> Result<(Document, MigrationReport), serde_json::Error> {
    let root: StoredRoot = serde_json::from_str(raw)?;
    Ok(migrate(root))
}

/// Repair a stored root into a valid document.
pub fn migrate(root: StoredRoot) -> (Document, MigrationReport) {
    let mut report = MigrationReport::default();
    let stored = match root {
        StoredRoot::Current(doc) => doc,
        StoredRoot::Legacy(gifts) => {
            report.legacy_layout = true;
            group_legacy(gifts)
        }
    };

    let mut child_ids = HashSet::new();
    let children = stored
        .children
        .into_iter()
        .map(|c| migrate_child(c, &mut child_ids, &mut report))
        .collect();
    let settings = migrate_settings(stored.settings, &mut report);

    (Document::from_parts(children, settings), report)
}

fn migrate_child(
    stored: StoredChild,
    seen: &mut HashSet<ChildId>,
    report: &mut MigrationReport,
) -> Child {
    let id = unique_id(stored.id.as_deref(), seen, ChildId, report);
    let name = repair_name(stored.name.as_deref(), report);
    let budget = stored.budget.map(|b| {
        if b.is_finite() && b >= 0.0 {
            b
        } else {
            report.repaired_amounts += 1;
            0.0
        }
    });
    let created_at = Timestamp(stored.created_at.map_or(0, |t| t as i64));

    let mut gift_ids = HashSet::new();
    let gifts = stored
        .gifts
        .into_iter()
        .map(|g| migrate_gift(g, &mut gift_ids, report))
        .collect();

    Child::from_parts(id, name, budget, created_at, gifts)
}

fn migrate_gift(
    stored: StoredGift,
    seen: &mut HashSet<GiftId>,
    report: &mut MigrationReport,
) -> Gift {
    let id = unique_id(stored.id.as_deref(), seen, GiftId, report);
    let name = repair_name(stored.name.as_deref(), report);
    let price = repair_price(stored.price.as_ref(), report);
    let status = match stored.status.as_deref().and_then(GiftStatus::parse) {
        Some(status) => status,
        None => {
            report.defaulted_statuses += 1;
            GiftStatus::Idea
        }
    };
    let added_at = Timestamp(stored.added_at.map_or(0, |t| t as i64));

    Gift::from_parts(id, name, price, status, added_at)
}

/// Keep a stored id if it parses and has not been seen in this scope,
/// otherwise mint a new one.
fn unique_id<T: Copy + Eq + std::hash::Hash>(
    raw: Option<&str>,
    seen: &mut HashSet<T>,
    wrap: fn(Uuid) -> T,
    report: &mut MigrationReport,
) -> T {
    if let Some(id) = raw.and_then(|s| Uuid::parse_str(s).ok()).map(wrap) {
        if seen.insert(id) {
            return id;
        }
    }
    report.assigned_ids += 1;
    loop {
        let id = wrap(Uuid::new_v4());
        if seen.insert(id) {
            return id;
        }
    }
}

fn repair_name(raw: Option<&str>, report: &mut MigrationReport) -> String {
    match raw.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            report.renamed_blank += 1;
            UNNAMED.to_string()
        }
    }
}

/// Prices were sometimes stored as strings by older app variants.
fn repair_price(raw: Option<&Value>, report: &mut MigrationReport) -> f64 {
    let valid = |p: &f64| p.is_finite() && *p >= 0.0;
    if let Some(Value::Number(n)) = raw {
        if let Some(p) = n.as_f64().filter(valid) {
            return p;
        }
    }
    report.repaired_amounts += 1;
    match raw {
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(valid).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn migrate_settings(stored: Map<String, Value>, report: &mut MigrationReport) -> Settings {
    let mut settings = Settings::default();
    for (key, value) in stored {
        let value = match value {
            Value::Bool(b) => Some(SettingValue::Bool(b)),
            Value::Number(n) => n.as_f64().map(SettingValue::Number),
            _ => None,
        };
        let applied = match (key.parse::<SettingKey>(), value) {
            (Ok(key), Some(value)) => settings.set(key, value).is_ok(),
            _ => false,
        };
        if !applied {
            report.dropped_settings += 1;
        }
    }
    settings
}

/// Group the legacy flat list by child name, in first-appearance order.
fn group_legacy(gifts: Vec<LegacyGift>) -> StoredDocument {
    let mut children: Vec<StoredChild> = Vec::new();
    for gift in gifts {
        let child_name = gift
            .child_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNNAMED)
            .to_string();
        let stored_gift = StoredGift {
            id: gift.id,
            name: gift.gift_name,
            price: gift.price,
            status: gift.status,
            added_at: gift.date_added,
        };
        match children
            .iter_mut()
            .find(|c| c.name.as_deref() == Some(child_name.as_str()))
        {
            Some(child) => {
                child.created_at = min_time(child.created_at, stored_gift.added_at);
                child.gifts.push(stored_gift);
            }
            None => children.push(StoredChild {
                id: None,
                name: Some(child_name),
                budget: None,
                created_at: stored_gift.added_at,
                gifts: vec![stored_gift],
            }),
        }
    }
    StoredDocument {
        children,
        settings: Map::new(),
    }
}

fn min_time(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn migrate_value(value: Value) -> (Document, MigrationReport) {
        parse(&value.to_string()).unwrap()
    }

    #[test]
    fn test_well_formed_document_is_unchanged() {
        let mut doc = Document::default();
        let mut child = Child::new("Timmy", Some(200.0)).unwrap();
        child.push_gift(Gift::new("Bicycle", 120.5).unwrap().advance_status());
        doc.push_child(child);

        let raw = serde_json::to_string(&doc).unwrap();
        let (migrated, report) = parse(&raw).unwrap();
        assert!(report.is_clean(), "{report:?}");
        assert_eq!(migrated, doc);
    }

    #[test]
    fn test_empty_object_is_default_document() {
        let (doc, report) = migrate_value(json!({}));
        assert_eq!(doc, Document::default());
        assert!(report.is_clean());
    }

    #[test]
    fn test_missing_ids_and_statuses_are_filled() {
        let (doc, report) = migrate_value(json!({
            "children": [{
                "name": "Jack",
                "createdAt": 1700000000000u64,
                "gifts": [
                    {"name": "Soccer Ball", "price": 65.0},
                    {"name": "Jersey", "price": 150.0, "status": "pending"}
                ]
            }]
        }));
        assert_eq!(report.assigned_ids, 3);
        assert_eq!(report.defaulted_statuses, 2);
        let child = &doc.children()[0];
        assert_eq!(child.name(), "Jack");
        assert_eq!(child.created_at(), Timestamp(1_700_000_000_000));
        assert!(child.gifts().iter().all(|g| g.status() == GiftStatus::Idea));
        assert_ne!(child.gifts()[0].id(), child.gifts()[1].id());
    }

    #[test]
    fn test_duplicate_ids_are_reassigned() {
        let id = Uuid::new_v4().to_string();
        let (doc, report) = migrate_value(json!({
            "children": [
                {"id": id, "name": "A", "gifts": []},
                {"id": id, "name": "B", "gifts": []}
            ]
        }));
        assert_eq!(report.assigned_ids, 1);
        assert_eq!(doc.children()[0].id().to_string(), id);
        assert_ne!(doc.children()[0].id(), doc.children()[1].id());
    }

    #[test]
    fn test_amounts_and_names_are_repaired() {
        let (doc, report) = migrate_value(json!({
            "children": [{
                "name": "  ",
                "budget": -10.0,
                "gifts": [
                    {"name": "Lego", "price": "19.99", "status": "idea"},
                    {"name": "Book", "price": -3, "status": "idea"},
                    {"name": "Hat", "status": "idea"}
                ]
            }]
        }));
        let child = &doc.children()[0];
        assert_eq!(child.name(), UNNAMED);
        assert_eq!(child.budget(), Some(0.0));
        let prices: Vec<f64> = child.gifts().iter().map(Gift::price).collect();
        assert_eq!(prices, [19.99, 0.0, 0.0]);
        assert_eq!(report.renamed_blank, 1);
        assert_eq!(report.repaired_amounts, 4);
    }

    #[test]
    fn test_settings_are_merged_over_defaults() {
        let (doc, report) = migrate_value(json!({
            "children": [],
            "settings": {"snowEnabled": false, "volume": 7, "theme": "dark"}
        }));
        assert!(!doc.settings().snow_enabled());
        assert_eq!(doc.settings().volume(), 0.5);
        assert!(!doc.settings().music_enabled());
        assert_eq!(report.dropped_settings, 2);
    }

    #[test]
    fn test_legacy_flat_layout_is_grouped() {
        let (doc, report) = migrate_value(json!([
            {"id": Uuid::new_v4().to_string(), "childName": "Timmy", "giftName": "Red Bicycle",
             "price": 120.5, "status": "purchased", "dateAdded": 2000},
            {"childName": "Sarah", "giftName": "Doll House", "price": 85.0,
             "status": "pending", "dateAdded": 1000},
            {"childName": "Timmy", "giftName": "Helmet", "price": 30.0,
             "status": "purchased", "dateAdded": 500}
        ]));
        assert!(report.legacy_layout);
        let names: Vec<_> = doc.children().iter().map(Child::name).collect();
        assert_eq!(names, ["Timmy", "Sarah"]);

        let timmy = &doc.children()[0];
        assert_eq!(timmy.gifts().len(), 2);
        assert_eq!(timmy.created_at(), Timestamp(500));
        assert_eq!(timmy.gifts()[0].status(), GiftStatus::Purchased);
        assert_eq!(doc.children()[1].gifts()[0].status(), GiftStatus::Idea);
    }

    #[test]
    fn test_null_collections_read_as_missing() {
        let (doc, report) = migrate_value(json!({
            "children": [
                {"name": "Timmy", "gifts": null},
                {"name": "Sarah", "gifts": [{"name": "Doll House", "price": 85.0, "status": "idea"}]}
            ],
            "settings": null
        }));
        assert_eq!(doc.children().len(), 2);
        assert!(doc.children()[0].gifts().is_empty());
        assert_eq!(doc.children()[1].gifts().len(), 1);
        assert_eq!(doc.settings(), &Settings::default());
        assert_eq!(report.dropped_settings, 0);

        let (doc, _) = migrate_value(json!({"children": null}));
        assert_eq!(doc, Document::default());
    }

    #[test]
    fn test_structurally_wrong_root_fails_to_parse() {
        assert!(parse("{\"children\": 5}").is_err());
        assert!(parse("null").is_err());
        assert!(parse("not json").is_err());
    }
}
