//! Integration tests for the gift tracker.

use gift_tracker::aggregate::{self, child_names};
use gift_tracker::{
    GiftQuery, GiftSort, GiftStatus, Seed, SettingValue, StoreConfig, SubscriptionConfig,
    SubscriptionFilter, TrackerEvent, TrackerService,
};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn test_config(dir: &TempDir) -> StoreConfig {
    StoreConfig::at(dir.path().join("gifts.json"))
}

// --- Realistic Workflow Tests ---

#[test]
fn test_first_child_first_gift() {
    init_tracing();
    let mut tracker = TrackerService::in_memory();
    assert!(tracker.document().is_empty());

    let timmy = tracker.add_child("Timmy", None).unwrap().into_result().unwrap();
    let bike = tracker
        .add_gift(timmy, "Bicycle", 120.50)
        .unwrap()
        .into_result()
        .unwrap();
    let status = tracker
        .toggle_gift_status(timmy, bike)
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(status, GiftStatus::Purchased);
    let child = tracker.child(timmy).unwrap();
    assert_eq!(child.gift(bike).unwrap().status(), GiftStatus::Purchased);
    assert_eq!(aggregate::total_spent_child(child), 120.50);
    assert_eq!(aggregate::total_spent(tracker.document()), 120.50);
}

#[test]
fn test_dashboard_for_two_children() {
    let mut tracker = TrackerService::in_memory();
    let jack = tracker.add_child("Jack", Some(300.0)).unwrap().into_value();
    let wills = tracker.add_child("Wills", Some(300.0)).unwrap().into_value();

    for (name, price) in [("Soccer Ball", 65.0), ("XBOX Headset", 100.0), ("Jersey", 150.0)] {
        tracker.add_gift(jack, name, price).unwrap().into_result().unwrap();
    }
    for (name, price) in [("TV", 280.0), ("Letter Jacket", 220.0)] {
        tracker.add_gift(wills, name, price).unwrap().into_result().unwrap();
    }

    let summary = tracker.summary();
    assert_eq!(summary.total_spent, 815.0);
    assert_eq!(summary.gift_count, 5);
    assert_eq!(summary.average_price, 163.0);
    assert_eq!(summary.statuses.idea, 5);
    assert!(!summary.balance.balanced);
    assert_eq!(summary.balance.spread, 185.0);

    let wills_stats = &summary.children[1];
    assert_eq!(wills_stats.name, "Wills");
    let budget = wills_stats.budget.unwrap();
    assert!(budget.over_budget);
    assert_eq!(budget.remaining, -200.0);

    let spending = aggregate::spending_by_child(tracker.document());
    assert_eq!(spending.get("Jack"), Some(315.0));
    assert_eq!(spending.get("Wills"), Some(500.0));
}

#[test]
fn test_delete_child_removes_gifts_from_aggregates() {
    let mut tracker = TrackerService::in_memory();
    let ids = tracker.seed(&Seed::sample()).unwrap().into_value();
    let before = aggregate::gift_count(tracker.document());
    let timmy_gifts = aggregate::gift_count_child(tracker.child(ids[0]).unwrap());

    let removed = tracker.delete_child(ids[0]).into_value().unwrap();
    assert_eq!(removed.name(), "Timmy");
    assert_eq!(
        aggregate::gift_count(tracker.document()),
        before - timmy_gifts
    );
    assert_eq!(aggregate::total_spent(tracker.document()), 85.0);
}

#[test]
fn test_gift_listing() {
    let mut tracker = TrackerService::in_memory();
    tracker.seed(&Seed::sample()).unwrap().into_result().unwrap();
    let timmy = tracker.document().children()[0].id();
    tracker.add_gift(timmy, "Helmet", 30.0).unwrap().into_result().unwrap();

    let doc = tracker.document();
    assert_eq!(child_names(doc), ["Timmy", "Sarah"]);

    let rows = GiftQuery::for_child("Timmy")
        .sorted(GiftSort::PriceAsc)
        .run(doc);
    let names: Vec<_> = rows.iter().map(|r| r.gift.name()).collect();
    assert_eq!(names, ["Helmet", "Red Bicycle"]);

    let rows = GiftQuery::default().search("doll").run(doc);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].child.name(), "Sarah");
}

#[test]
fn test_subscriber_sees_changes() {
    let mut tracker = TrackerService::in_memory();
    let handle = tracker.subscribe(SubscriptionConfig::default());

    let child = tracker.add_child("Anna", None).unwrap().into_value();
    let gift = tracker.add_gift(child, "Sled", 40.0).unwrap().into_value();
    tracker.toggle_gift_status(child, gift).unwrap().into_result().unwrap();
    tracker
        .update_setting("snowEnabled", SettingValue::Bool(false))
        .unwrap()
        .into_result()
        .unwrap();
    tracker.delete_child(child).into_result().unwrap();

    assert_eq!(
        handle.drain(),
        [
            TrackerEvent::ChildAdded {
                child,
                name: "Anna".into()
            },
            TrackerEvent::GiftAdded { child, gift },
            TrackerEvent::GiftUpdated {
                child,
                gift,
                status: GiftStatus::Purchased
            },
            TrackerEvent::SettingChanged {
                key: gift_tracker::SettingKey::SnowEnabled,
                value: SettingValue::Bool(false)
            },
            TrackerEvent::ChildRemoved { child, gifts: 1 },
        ]
    );
}

#[test]
fn test_child_scoped_subscription() {
    let mut tracker = TrackerService::in_memory();
    let anna = tracker.add_child("Anna", None).unwrap().into_value();
    let ben = tracker.add_child("Ben", None).unwrap().into_value();
    let handle = tracker.subscribe(SubscriptionConfig {
        filter: SubscriptionFilter::child(ben),
        ..Default::default()
    });

    tracker.add_gift(anna, "Sled", 40.0).unwrap().into_result().unwrap();
    let gift = tracker.add_gift(ben, "Kite", 15.0).unwrap().into_value();

    assert_eq!(
        handle.drain(),
        [TrackerEvent::GiftAdded { child: ben, gift }]
    );
}

// --- Persistence Across Restarts ---

#[test]
fn test_document_survives_restart() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    let (timmy, bike) = {
        let mut tracker = TrackerService::open(test_config(&dir)).unwrap();
        let timmy = tracker.add_child("Timmy", Some(200.0)).unwrap().into_value();
        let bike = tracker.add_gift(timmy, "Bicycle", 120.5).unwrap().into_value();
        tracker.toggle_gift_status(timmy, bike).unwrap().into_result().unwrap();
        tracker.toggle_setting("snowEnabled").unwrap().into_result().unwrap();
        (timmy, bike)
    };

    let tracker = TrackerService::open(test_config(&dir)).unwrap();
    let child = tracker.child(timmy).unwrap();
    assert_eq!(child.name(), "Timmy");
    assert_eq!(child.budget(), Some(200.0));
    assert_eq!(child.gift(bike).unwrap().status(), GiftStatus::Purchased);
    assert!(!tracker.document().settings().snow_enabled());
}

#[test]
fn test_persisted_shape() {
    let dir = TempDir::new().unwrap();
    let mut tracker = TrackerService::open(test_config(&dir)).unwrap();
    let timmy = tracker.add_child("Timmy", None).unwrap().into_value();
    let bike = tracker.add_gift(timmy, "Bicycle", 120.5).unwrap().into_value();

    let raw = std::fs::read_to_string(dir.path().join("gifts.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let child = &value["children"][0];
    assert_eq!(child["id"], timmy.to_string());
    assert_eq!(child["name"], "Timmy");
    assert!(child.get("budget").is_none());
    let gift = &child["gifts"][0];
    assert_eq!(gift["id"], bike.to_string());
    assert_eq!(gift["price"], 120.5);
    assert_eq!(gift["status"], "idea");
    assert_eq!(value["settings"]["snowEnabled"], true);
}
