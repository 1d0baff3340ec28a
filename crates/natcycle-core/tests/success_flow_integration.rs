//! Integration tests for the drop-off → milestone choreography.

use chrono::{DateTime, Duration, Utc};
use natcycle_core::{
    evaluate, CloseReason, DropoffCompletion, DropoffType, Event, MetricKind, MetricSnapshot,
    MilestoneEvent, MilestoneView, ModalKind, SuccessModalStore, SuccessTimings,
};

fn t0() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-06-05T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn at(ms: i64) -> DateTime<Utc> {
    t0() + Duration::milliseconds(ms)
}

#[test]
fn test_evaluator_examples() {
    let hit = evaluate(MetricKind::CarbonUnits, 9.0, 10.0).unwrap();
    assert_eq!(hit.crossed_threshold(), Some(10));

    let hit = evaluate(MetricKind::CarbonUnits, 24.0, 26.0).unwrap();
    assert_eq!(hit.crossed_threshold(), Some(25));

    assert!(evaluate(MetricKind::CarbonUnits, 0.0, 9.99).is_none());
}

fn completion(previous: (u32, u32), new: (u32, u32)) -> DropoffCompletion {
    serde_json::from_value(serde_json::json!({
        "materialType": "plastic",
        "carbonUnitsEarned": 5,
        "dropoffType": "simple",
        "newCarbonUnits": new.0,
        "newDropoffCount": new.1,
        "previousCarbonUnits": previous.0,
        "previousDropoffCount": previous.1
    }))
    .unwrap()
}

#[test]
fn test_trigger_crossing_mid_table_checkpoint() {
    let mut store = SuccessModalStore::default();
    let check = store
        .trigger_dropoff_success(&completion((20, 2), (30, 3)), t0())
        .unwrap();
    let shown = store.state().dropoff.data().unwrap();
    assert_eq!(shown.material_type, "plastic");
    assert_eq!(shown.dropoff_type, DropoffType::Simple);
    assert_eq!(check.due_at, at(6000));

    store.tick(at(5999));
    assert!(!store.state().milestone.is_open());

    // 20 < 25 <= 30
    store.tick(at(6000));
    assert_eq!(
        store.state().milestone.data(),
        Some(&MilestoneEvent::CarbonUnits {
            current_value: 30.0,
            crossed_threshold: 25
        })
    );
}

#[test]
fn test_trigger_without_crossing_opens_only_dropoff_modal() {
    let mut store = SuccessModalStore::default();
    store
        .trigger_dropoff_success(&completion((26, 2), (30, 3)), t0())
        .unwrap();
    assert!(store.state().dropoff.is_open());

    store.tick(at(6000));
    assert!(!store.state().milestone.is_open());

    let events = store.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        Event::MilestoneCheckCompleted { fired: false, at: when, .. } if *when == at(6000)
    )));
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::MilestoneReached { .. })));
}

#[test]
fn test_back_to_back_dropoffs_keep_first_milestone() {
    let mut store = SuccessModalStore::default();
    store.trigger_dropoff_success(&completion((0, 0), (10, 1)), t0());
    store.trigger_dropoff_success(&completion((10, 1), (12, 2)), at(1000));

    store.tick(at(60_000));
    let shown = store.state().milestone.data().unwrap();
    assert_eq!(shown.metric(), Some(MetricKind::CarbonUnits));
    assert_eq!(shown.crossed_threshold(), Some(10));
}

#[test]
fn test_first_dropoff_celebrates_carbon_before_count() {
    let mut store = SuccessModalStore::default();
    let completion = DropoffCompletion::new("aluminium", 10.0, DropoffType::Regular)
        .with_location("Lekki Drop Point")
        .with_metrics(None, MetricSnapshot::new(10.0, 1.0));

    store.trigger_dropoff_success(&completion, t0());
    store.tick(at(6000));

    let milestone = store.state().milestone.data().cloned();
    assert_eq!(
        milestone,
        Some(MilestoneEvent::CarbonUnits {
            current_value: 10.0,
            crossed_threshold: 10
        })
    );

    let view = MilestoneView::from_event(milestone.as_ref());
    assert_eq!(view.title, "10 Carbon Units!");
}

#[test]
fn test_user_closes_dropoff_before_auto_dismiss() {
    let mut store = SuccessModalStore::new(SuccessTimings::default());
    let completion = DropoffCompletion::new("paper", 1.0, DropoffType::Simple)
        .with_metrics(Some(MetricSnapshot::new(0.0, 0.0)), MetricSnapshot::new(1.0, 1.0));

    store.trigger_dropoff_success(&completion, t0());
    store.dismiss(ModalKind::DropoffSuccess, CloseReason::CloseButton, at(1500));
    store.tick(at(6000));

    // Drop-off count milestone still fires on schedule.
    assert_eq!(
        store.state().milestone.data().and_then(|m| m.metric()),
        Some(MetricKind::DropoffCount)
    );

    let closes: Vec<_> = store
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            Event::ModalClosed { modal, reason, .. } => Some((modal, reason)),
            _ => None,
        })
        .collect();
    assert_eq!(
        closes,
        vec![(ModalKind::DropoffSuccess, CloseReason::CloseButton)]
    );
}

#[test]
fn test_next_deadline_walks_the_timeline() {
    let mut store = SuccessModalStore::new(SuccessTimings::from_millis(5000, 4000, 6000));
    let completion = DropoffCompletion::new("glass", 3.0, DropoffType::Simple)
        .with_metrics(None, MetricSnapshot::new(10.0, 1.0));
    store.trigger_dropoff_success(&completion, t0());

    let mut fired_at = Vec::new();
    while let Some(deadline) = store.next_deadline() {
        fired_at.push((deadline - t0()).num_milliseconds());
        store.tick(deadline);
    }
    assert_eq!(fired_at, vec![5000, 6000, 10_000]);
    assert_eq!(store.snapshot(), Default::default());
}

#[test]
fn test_events_serialize_for_consumers() {
    let mut store = SuccessModalStore::default();
    store.show_milestone_success(MilestoneEvent::badge("Eco Starter"), t0());
    let events = store.drain_events();
    let json = serde_json::to_value(&events).unwrap();
    assert_eq!(json[0]["type"], "MilestoneReached");
    assert_eq!(json[0]["milestone"]["kind"], "badge_earned");
    assert_eq!(json[1]["type"], "ModalOpened");
    assert_eq!(json[1]["modal"], "milestone_success");

    let state = serde_json::to_value(store.snapshot()).unwrap();
    assert_eq!(state["milestone"]["isOpen"], true);
    assert_eq!(state["dropoff"]["isOpen"], false);
}
