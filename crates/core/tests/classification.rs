//! Monitor webhook classification rules.

use trafficlight_core::model::{Action, Color, MonitorEvent};
use trafficlight_core::classify;

fn errors(codes: &[&str]) -> MonitorEvent {
    MonitorEvent {
        monitor_errors: Some(codes.iter().map(|c| c.to_string()).collect()),
        resource_usage: None,
    }
}

#[test]
fn resource_usage_is_red() {
    let ev = MonitorEvent {
        monitor_errors: None,
        resource_usage: Some(serde_json::json!({"cpu": 97})),
    };
    assert_eq!(classify(&ev), vec![Action::on(Color::Red)]);
}

#[test]
fn resource_usage_wins_over_monitor_errors() {
    let ev = MonitorEvent {
        monitor_errors: Some(vec!["timeout".into(), "http code 301".into()]),
        resource_usage: Some(serde_json::json!(false)),
    };
    assert_eq!(classify(&ev), vec![Action::on(Color::Red)]);
}

#[test]
fn empty_event_is_all_clear() {
    assert_eq!(classify(&MonitorEvent::default()), vec![Action::on(Color::Green)]);

    let ev: MonitorEvent = serde_json::from_str(r#"{"monitor_name": "api", "monitor_status": "online"}"#).unwrap();
    assert_eq!(classify(&ev), vec![Action::on(Color::Green)]);
}

#[test]
fn empty_error_list_lights_nothing() {
    assert!(classify(&errors(&[])).is_empty());
}

#[test]
fn single_errors() {
    assert_eq!(classify(&errors(&["http code 404"])), vec![Action::on(Color::Red)]);
    assert_eq!(classify(&errors(&["timeout"])), vec![Action::on(Color::Orange)]);
    assert_eq!(classify(&errors(&["keyword not found"])), vec![Action::on(Color::Orange)]);
    assert_eq!(classify(&errors(&["connection failed"])), vec![Action::on(Color::Red)]);
}

#[test]
fn every_error_is_classified() {
    assert_eq!(
        classify(&errors(&["http code 404", "timeout"])),
        vec![Action::on(Color::Red), Action::on(Color::Orange)]
    );
    assert_eq!(
        classify(&errors(&["timeout", "http code 500", "http code 302"])),
        vec![
            Action::on(Color::Orange),
            Action::on(Color::Red),
            Action::on(Color::Orange),
        ]
    );
}

#[test]
fn unknown_errors_fail_safe_to_red() {
    assert_eq!(
        classify(&errors(&["dns lookup failed", "timeout"])),
        vec![Action::on(Color::Red), Action::on(Color::Orange)]
    );
}

#[test]
fn parses_monitor_payload() {
    let ev: MonitorEvent = serde_json::from_str(
        r#"{"monitor_id": "abc", "monitor_errors": ["ssl failed"], "timestamp": 1700000000}"#,
    )
    .unwrap();
    assert_eq!(classify(&ev), vec![Action::on(Color::Red)]);
}

#[test]
fn errors_keyed_by_location_are_classified_in_order() {
    let ev: MonitorEvent = serde_json::from_str(
        r#"{"monitor_errors": {"nyc": "timeout", "ams": "http code 500", "sgp": false}}"#,
    )
    .unwrap();
    assert_eq!(
        classify(&ev),
        vec![
            Action::on(Color::Orange),
            Action::on(Color::Red),
            Action::on(Color::Red),
        ]
    );
}
