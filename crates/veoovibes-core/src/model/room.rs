// ── Room identity ──
//
// Rooms come back from `listrooms` as loosely-typed objects. Their id may
// live under one of several fields depending on firmware; resolution tries
// each candidate in order.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use veoovibes_api::RoomObject;

use super::is_truthy;

/// Candidate id fields, in precedence order.
pub const ROOM_ID_FIELDS: [&str; 3] = ["id_room", "api_room_id", "key"];

/// Candidate display-name fields, in precedence order.
pub const ROOM_NAME_FIELDS: [&str; 2] = ["name", "api_room_name"];

// ── RoomId ──────────────────────────────────────────────────────────

/// Identifier of one room, as sent in the `room` query parameter.
///
/// Numeric ids are rendered the way JSON renders them (`95`, not `95.0`
/// unless the device sent a float).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for RoomId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve a room's id from the first candidate field holding a usable value.
///
/// Empty strings, zero, `false` and `null` count as absent and fall through
/// to the next candidate. Only strings and numbers can become ids.
pub fn resolve_room_id(raw: &RoomObject) -> Option<RoomId> {
    ROOM_ID_FIELDS
        .iter()
        .filter_map(|field| raw.get(*field))
        .find(|value| is_truthy(value))
        .and_then(scalar_id)
}

fn scalar_id(value: &Value) -> Option<RoomId> {
    match value {
        Value::String(s) => Some(RoomId::new(s.clone())),
        Value::Number(n) => Some(RoomId::new(n.to_string())),
        _ => None,
    }
}

// ── Room ────────────────────────────────────────────────────────────

/// One room from the device's room list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Room {
    /// `None` when no candidate field held a usable id.
    pub id: Option<RoomId>,
    pub name: String,
    /// The raw object as returned by `listrooms`, `key` included.
    pub attributes: RoomObject,
}

impl Room {
    pub fn from_raw(raw: RoomObject) -> Self {
        let id = resolve_room_id(&raw);
        let name = ROOM_NAME_FIELDS
            .iter()
            .filter_map(|field| raw.get(*field).and_then(Value::as_str))
            .find(|name| !name.is_empty())
            .map_or_else(
                || match &id {
                    Some(id) => format!("Room {id}"),
                    None => "Room".to_owned(),
                },
                str::to_owned,
            );

        Self {
            id,
            name,
            attributes: raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RoomObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("test fixture must be an object"),
        }
    }

    #[test]
    fn id_precedence_follows_candidate_order() {
        let room = raw(json!({"key": "k", "api_room_id": "a", "id_room": 95}));
        assert_eq!(resolve_room_id(&room), Some(RoomId::from("95")));

        let room = raw(json!({"key": "k", "api_room_id": "a"}));
        assert_eq!(resolve_room_id(&room), Some(RoomId::from("a")));

        let room = raw(json!({"key": "k"}));
        assert_eq!(resolve_room_id(&room), Some(RoomId::from("k")));
    }

    #[test]
    fn falsy_candidates_fall_through() {
        let room = raw(json!({"id_room": 0, "api_room_id": "", "key": "91"}));
        assert_eq!(resolve_room_id(&room), Some(RoomId::from("91")));

        let room = raw(json!({"id_room": null, "key": ""}));
        assert_eq!(resolve_room_id(&room), None);
    }

    #[test]
    fn non_scalar_ids_are_unresolvable() {
        let room = raw(json!({"id_room": [1, 2]}));
        assert_eq!(resolve_room_id(&room), None);
    }

    #[test]
    fn name_falls_back_to_room_id() {
        let named = Room::from_raw(raw(json!({"id_room": 1, "name": "Kitchen"})));
        assert_eq!(named.name, "Kitchen");

        let api_named = Room::from_raw(raw(json!({"id_room": 2, "name": "", "api_room_name": "Bath"})));
        assert_eq!(api_named.name, "Bath");

        let anonymous = Room::from_raw(raw(json!({"key": "7"})));
        assert_eq!(anonymous.name, "Room 7");
        assert_eq!(anonymous.id, Some(RoomId::from("7")));
    }
}
