// Wire-level types for the veoovibes command API.

use serde::Serialize;
use serde_json::{Map, Value};

/// A raw room object as returned under one key of `listrooms`.
pub type RoomObject = Map<String, Value>;

/// The `{status, code, result}` wrapper around every command response.
///
/// Fields are kept as loose JSON: the device is not consistent about
/// sending `code` as a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub status: Value,
    pub code: Value,
    pub result: Value,
}

impl Envelope {
    /// Split a decoded body into its envelope fields.
    ///
    /// Returns `None` when the body is not a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        let Value::Object(mut map) = value else {
            return None;
        };
        Some(Self {
            status: map.remove("status").unwrap_or(Value::Null),
            code: map.remove("code").unwrap_or(Value::Null),
            result: map.remove("result").unwrap_or(Value::Null),
        })
    }

    /// `code` rendered as text, so `0` and `"0"` compare equal.
    pub fn code_text(&self) -> Option<String> {
        match &self.code {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// `true` when the device reports `status == "succeeded"` and `code == "0"`.
    pub fn is_success(&self) -> bool {
        self.status.as_str() == Some("succeeded") && self.code_text().as_deref() == Some("0")
    }

    /// Re-assemble the envelope as JSON for diagnostics.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "status": self.status,
            "code": self.code,
            "result": self.result,
        })
    }
}
