// ── Per-room player status ──
//
// `room_player_status` returns a loose bag of fields whose presence varies
// by firmware and by what is playing. The raw map is kept intact; typed
// accessors read the handful of fields the player projection needs.

use serde::Serialize;
use serde_json::{Map, Value};

use super::is_truthy;

/// Player status of one room, as last reported by the device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RoomStatus {
    fields: Map<String, Value>,
}

impl RoomStatus {
    /// Wrap a `room_player_status` result. Non-object results carry no
    /// fields, so every accessor reads as unknown.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(fields) => Self { fields },
            _ => Self::default(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// `is_playing` truthy, or `status_code` equal to `playing` in any case.
    pub fn is_playing(&self) -> bool {
        if self.get("is_playing").is_some_and(is_truthy) {
            return true;
        }
        self.get("status_code")
            .and_then(scalar_text)
            .is_some_and(|code| code.eq_ignore_ascii_case("playing"))
    }

    /// Reported volume on the device's 0–100 scale.
    ///
    /// `zone_volume` wins over `current_volume`; only numeric values count.
    pub fn volume_percent(&self) -> Option<f64> {
        ["zone_volume", "current_volume"]
            .iter()
            .find_map(|field| self.get(field).and_then(Value::as_f64))
    }

    /// Volume normalized into `[0.0, 1.0]`.
    pub fn volume_level(&self) -> Option<f64> {
        self.volume_percent().map(|pct| (pct / 100.0).clamp(0.0, 1.0))
    }

    /// `title`, else the station name.
    pub fn title(&self) -> Option<&str> {
        self.non_empty_str("title")
            .or_else(|| self.non_empty_str("radio_name"))
    }

    pub fn artist(&self) -> Option<&str> {
        self.non_empty_str("artist")
    }

    pub fn album(&self) -> Option<&str> {
        self.non_empty_str("album")
    }

    /// Cover image URL.
    pub fn cover(&self) -> Option<&str> {
        self.non_empty_str("cover")
    }

    /// Repeat flag. Accepts booleans, numbers and their string forms.
    pub fn repeat(&self) -> Option<bool> {
        match self.get("repeat")? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|v| v != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Some(true),
                "0" | "false" | "off" | "no" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    fn non_empty_str(&self, field: &str) -> Option<&str> {
        self.get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
