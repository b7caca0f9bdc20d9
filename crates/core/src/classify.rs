use serde::{Deserialize, Serialize};

use crate::model::{Action, Color, MonitorEvent};

/// Monitor error codes that mean the target is down or refusing service.
const CRITICAL_ERRORS: &[&str] = &[
    "http code 400",
    "http code 401",
    "http code 402",
    "http code 403",
    "http code 404",
    "http code 405",
    "http code 406",
    "http code 408",
    "http code 409",
    "http code 414",
    "http code 429",
    "http code 431",
    "http code 495",
    "http code 496",
    "http code 497",
    "http code 500",
    "http code 501",
    "http code 502",
    "http code 503",
    "http code 504",
    "http code 505",
    "http code 511",
    "http code 522",
    "http code 525",
    "connection failed",
    "ssl failed",
    "auth failed",
];

/// Monitor error codes that mean the target answers but looks wrong.
const DEGRADED_ERRORS: &[&str] = &[
    "timeout",
    "keyword not found",
    "http code 300",
    "http code 301",
    "http code 302",
    "http code 303",
    "http code 307",
    "http code 308",
];

/// Severity bucket of a single monitor error code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    Critical,
    Degraded,
    Unrecognized,
}

impl ErrorClass {
    pub fn of(code: &str) -> Self {
        if CRITICAL_ERRORS.contains(&code) {
            Self::Critical
        } else if DEGRADED_ERRORS.contains(&code) {
            Self::Degraded
        } else {
            Self::Unrecognized
        }
    }

    /// Unrecognized codes alert as red.
    pub fn color(&self) -> Color {
        match self {
            Self::Critical | Self::Unrecognized => Color::Red,
            Self::Degraded => Color::Orange,
        }
    }
}

/// Map a monitor callback to light actions.
///
/// Callers reset the canonical colors before applying the result. Rules:
/// - `resource_usage` present: red, regardless of `monitor_errors`.
/// - neither field present: green.
/// - otherwise one action per error code, in order. An empty list yields nothing.
pub fn classify(event: &MonitorEvent) -> Vec<Action> {
    if event.resource_usage.is_some() {
        return vec![Action::on(Color::Red)];
    }

    match &event.monitor_errors {
        None => vec![Action::on(Color::Green)],
        Some(errors) => errors
            .iter()
            .map(|code| Action::on(ErrorClass::of(code).color()))
            .collect(),
    }
}

/// Error codes in the event that match no known bucket.
pub fn unrecognized_errors(event: &MonitorEvent) -> Vec<&str> {
    event
        .monitor_errors
        .iter()
        .flatten()
        .map(String::as_str)
        .filter(|code| ErrorClass::of(code) == ErrorClass::Unrecognized)
        .collect()
}
