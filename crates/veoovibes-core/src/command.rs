// ── Command API ──
//
// Every room control flows through one `Command` enum. The bridge routes
// each variant to its device command and refreshes afterwards.

use strum::Display;

use crate::model::RoomId;

/// All controls that can be issued against a room.
#[derive(Debug, Clone, PartialEq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Play { room: RoomId },
    Stop { room: RoomId },
    Next { room: RoomId },
    Previous { room: RoomId },
    /// Volume as a level in `[0.0, 1.0]`; clamped, then truncated to percent.
    SetVolume { room: RoomId, level: f64 },
    /// Volume on the device's 0–100 scale; clamped by the client.
    SetVolumePercent { room: RoomId, percent: i64 },
    ToggleRepeat { room: RoomId },
    /// Select a named entry of the configured source list.
    SelectSource { room: RoomId, name: String },
    /// Same as `Play`.
    TurnOn { room: RoomId },
    /// Same as `Stop`.
    TurnOff { room: RoomId },
}

impl Command {
    /// The room this command targets.
    pub fn room(&self) -> &RoomId {
        match self {
            Self::Play { room }
            | Self::Stop { room }
            | Self::Next { room }
            | Self::Previous { room }
            | Self::SetVolume { room, .. }
            | Self::SetVolumePercent { room, .. }
            | Self::ToggleRepeat { room }
            | Self::SelectSource { room, .. }
            | Self::TurnOn { room }
            | Self::TurnOff { room } => room,
        }
    }
}

/// Outcome of a command that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The device accepted the command.
    Ok,
    /// Nothing was sent; the reason is logged.
    Ignored { reason: String },
}

/// Convert a `[0.0, 1.0]` level to a device percent: clamp, then truncate.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
pub fn level_to_percent(level: f64) -> i64 {
    if level.is_nan() {
        return 0;
    }
    (level.clamp(0.0, 1.0) * 100.0) as i64
}
