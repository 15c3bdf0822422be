// Room endpoints
//
// Discovery (`listrooms`), per-room status, and the room transport
// controls. Each control is a single command with a `room` parameter.

use serde_json::Value;
use tracing::debug;

use crate::client::VeoovibesClient;
use crate::error::ApiError;
use crate::models::RoomObject;

/// Field injected into a room object to carry its `listrooms` key.
pub const ROOM_KEY_FIELD: &str = "key";

impl VeoovibesClient {
    /// List all rooms known to the device.
    ///
    /// `GET /api/v1/listrooms`. The result is an object keyed by room key
    /// (`{"95": {...}, "91": {...}}`); it is flattened into server order.
    pub async fn list_rooms(&self) -> Result<Vec<RoomObject>, ApiError> {
        debug!("listing rooms");
        let result = self.command("listrooms", &[]).await?;
        Ok(flatten_room_map(result))
    }

    /// Fetch the player status of one room.
    ///
    /// `GET /api/v1/room_player_status?room={room}`. Loosely-typed JSON: the
    /// field set varies by firmware and by what is playing.
    pub async fn get_room_status(&self, room: &str) -> Result<Value, ApiError> {
        self.command("room_player_status", &[("room", room.to_owned())])
            .await
    }

    /// `GET /api/v1/room_play?room={room}`
    pub async fn play_room(&self, room: &str) -> Result<(), ApiError> {
        debug!(room, "play");
        self.room_command("room_play", room).await
    }

    /// `GET /api/v1/room_stop?room={room}`
    pub async fn stop_room(&self, room: &str) -> Result<(), ApiError> {
        debug!(room, "stop");
        self.room_command("room_stop", room).await
    }

    /// `GET /api/v1/room_next?room={room}`
    pub async fn next_room(&self, room: &str) -> Result<(), ApiError> {
        debug!(room, "next track");
        self.room_command("room_next", room).await
    }

    /// `GET /api/v1/room_prev?room={room}`
    pub async fn prev_room(&self, room: &str) -> Result<(), ApiError> {
        debug!(room, "previous track");
        self.room_command("room_prev", room).await
    }

    /// Set the room volume on the device's 0–100 scale.
    ///
    /// `GET /api/v1/room_vol_set?room={room}&vol={vol}`. Out-of-range input
    /// is clamped before transmission.
    pub async fn set_room_volume(&self, room: &str, volume: i64) -> Result<(), ApiError> {
        let vol = clamp_volume(volume);
        debug!(room, vol, "set volume");
        self.command("room_vol_set", &[("room", room.to_owned()), ("vol", vol.to_string())])
            .await?;
        Ok(())
    }

    /// Toggle the room's repeat flag.
    ///
    /// `GET /api/v1/room_repeat?room={room}`
    pub async fn toggle_room_repeat(&self, room: &str) -> Result<(), ApiError> {
        debug!(room, "toggle repeat");
        self.room_command("room_repeat", room).await
    }

    /// Select a numbered group/program source for a room.
    ///
    /// `GET /api/v1/music_room?room={room}&group={group}&prog={prog}`
    pub async fn select_room_source(&self, room: &str, group: i64, prog: i64) -> Result<(), ApiError> {
        debug!(room, group, prog, "select source");
        self.command(
            "music_room",
            &[
                ("room", room.to_owned()),
                ("group", group.to_string()),
                ("prog", prog.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn room_command(&self, command: &str, room: &str) -> Result<(), ApiError> {
        self.command(command, &[("room", room.to_owned())]).await?;
        Ok(())
    }
}

/// Flatten a `listrooms` result into an ordered list of room objects.
///
/// Each object gets its map key injected as `key` unless it already has
/// one. Non-object values are dropped, and a non-object result yields an
/// empty list.
pub fn flatten_room_map(result: Value) -> Vec<RoomObject> {
    let Value::Object(rooms) = result else {
        return Vec::new();
    };

    rooms
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Object(mut room) => {
                room.entry(ROOM_KEY_FIELD).or_insert(Value::String(key));
                Some(room)
            }
            _ => None,
        })
        .collect()
}

/// Clamp a requested volume into the device's `[0, 100]` range.
pub fn clamp_volume(volume: i64) -> u8 {
    // Always within 0..=100 here.
    u8::try_from(volume.clamp(0, 100)).unwrap_or(100)
}
