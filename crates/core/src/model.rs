use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

/// Prefix shared by every persisted light key.
pub const KEY_PREFIX: &str = "trafficlight:";

/// Key holding the raw build status reported by the CI webhook.
pub const CI_STATUS_KEY: &str = "trafficlight:ci";

/// One indicator of the light.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Yellow,
    Green,
    /// Out-of-band alert color. Written by the monitor webhook, never reported back.
    Orange,
}

impl Color {
    /// The publicly reported triple, in response order.
    pub const CANONICAL: [Color; 3] = [Color::Red, Color::Yellow, Color::Green];

    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Orange => "orange",
        }
    }

    /// Storage key, e.g. `trafficlight:red`.
    pub fn key(&self) -> String {
        format!("{KEY_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide operating policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Lights are set by users through `POST /lights`.
    Public,
    /// Lights are derived from the last CI build status.
    Ci,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Public => "public",
            Mode::Ci => "ci",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build status as reported by the CI provider's webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStatus {
    Error,
    Stopped,
    Ignored,
    Blocked,
    InfrastructureFailure,
    Testing,
    Waiting,
    Success,
    Other(String),
}

impl BuildStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "error" => Self::Error,
            "stopped" => Self::Stopped,
            "ignored" => Self::Ignored,
            "blocked" => Self::Blocked,
            "infrastructure_failure" => Self::InfrastructureFailure,
            "testing" => Self::Testing,
            "waiting" => Self::Waiting,
            "success" => Self::Success,
            other => Self::Other(other.to_string()),
        }
    }

    /// The single color lit for this status, if any.
    pub fn active_color(&self) -> Option<Color> {
        match self {
            Self::Error
            | Self::Stopped
            | Self::Ignored
            | Self::Blocked
            | Self::InfrastructureFailure => Some(Color::Red),
            Self::Testing | Self::Waiting => Some(Color::Yellow),
            Self::Success => Some(Color::Green),
            Self::Other(_) => None,
        }
    }
}

/// Read-back view of the canonical lights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LightsState {
    pub mode: Mode,
    pub red: bool,
    pub yellow: bool,
    pub green: bool,
}

impl LightsState {
    pub fn dark(mode: Mode) -> Self {
        Self {
            mode,
            red: false,
            yellow: false,
            green: false,
        }
    }

    pub fn set(&mut self, color: Color, on: bool) {
        match color {
            Color::Red => self.red = on,
            Color::Yellow => self.yellow = on,
            Color::Green => self.green = on,
            Color::Orange => {}
        }
    }

    pub fn get(&self, color: Color) -> bool {
        match color {
            Color::Red => self.red,
            Color::Yellow => self.yellow,
            Color::Green => self.green,
            Color::Orange => false,
        }
    }
}

/// A single light change produced by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Action {
    pub color: Color,
    pub on: bool,
}

impl Action {
    pub fn on(color: Color) -> Self {
        Self { color, on: true }
    }
}

/// Uptime/resource monitor callback.
///
/// Only the two fields that drive classification are modelled; everything
/// else the monitor sends is ignored. A JSON `null` counts as absent.
///
/// `monitor_errors` may be a list or an object keyed by monitoring location; both
/// are flattened to their values in document order. Entries that are not
/// strings keep their JSON text, so they classify as unrecognized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitorEvent {
    #[serde(
        default,
        deserialize_with = "monitor_errors",
        skip_serializing_if = "Option::is_none"
    )]
    pub monitor_errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_usage: Option<serde_json::Value>,
}

fn error_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

fn monitor_errors<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    d.deserialize_any(MonitorErrorsVisitor)
}

struct MonitorErrorsVisitor;

impl<'de> Visitor<'de> for MonitorErrorsVisitor {
    type Value = Option<Vec<String>>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list or an object of monitor errors")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
        d.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::new();
        while let Some(v) = seq.next_element::<serde_json::Value>()? {
            out.push(error_text(v));
        }
        Ok(Some(out))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut out = Vec::new();
        while let Some((_location, v)) = map.next_entry::<String, serde_json::Value>()? {
            out.push(error_text(v));
        }
        Ok(Some(out))
    }

    // A bare scalar is a single error.
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(vec![v.to_string()]))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(vec![v.to_string()]))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(vec![v.to_string()]))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(vec![v.to_string()]))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(vec![serde_json::Value::from(v).to_string()]))
    }
}

/// CI provider build webhook: `{"build": {"status": "..."}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiWebhook {
    pub build: CiBuild,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiBuild {
    pub status: String,
}

/// Value supplied for one light in a user update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LightValue {
    Flag(bool),
    /// Stored verbatim, as form posts send `"true"`/`"false"` text.
    Raw(String),
    /// Any other JSON value, stored as its JSON text (`null`, `1`, ...).
    Other(serde_json::Value),
}

impl LightValue {
    pub fn to_stored(&self) -> String {
        match self {
            LightValue::Flag(on) => encode_flag(*on).to_string(),
            LightValue::Raw(s) => s.clone(),
            LightValue::Other(v) => v.to_string(),
        }
    }
}

// A present key is written even when its value is `null`.
fn present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<LightValue>, D::Error> {
    LightValue::deserialize(d).map(Some)
}

/// Body of `POST /lights`, JSON or form encoded. Absent colors are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightsUpdate {
    #[serde(default, deserialize_with = "present")]
    pub red: Option<LightValue>,
    #[serde(default, deserialize_with = "present")]
    pub yellow: Option<LightValue>,
    #[serde(default, deserialize_with = "present")]
    pub green: Option<LightValue>,
}

impl LightsUpdate {
    /// Provided canonical colors, in canonical order.
    pub fn entries(&self) -> Vec<(Color, &LightValue)> {
        let mut out = Vec::new();
        for (color, value) in [
            (Color::Red, &self.red),
            (Color::Yellow, &self.yellow),
            (Color::Green, &self.green),
        ] {
            if let Some(v) = value {
                out.push((color, v));
            }
        }
        out
    }
}

/// Wire form of a stored flag.
pub fn encode_flag(on: bool) -> &'static str {
    if on {
        "true"
    } else {
        "false"
    }
}

/// A stored value is on only when it is exactly `"true"`.
pub fn decode_flag(raw: Option<&str>) -> bool {
    raw == Some("true")
}
