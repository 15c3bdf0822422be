// ── Room players ──
//
// The media-player view of one room. Properties are read from the latest
// published snapshot on every access; controls go through
// `Bridge::execute` and never return errors to the caller.

use serde::Serialize;
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, warn};

use crate::bridge::Bridge;
use crate::command::Command;
use crate::model::{RoomId, RoomStatus};

/// Device manufacturer shown in device info.
pub const MANUFACTURER: &str = "inveoo";

// ── Types ────────────────────────────────────────────────────────

/// Player state derived from the room's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    Playing,
    /// Anything that is not playing, including stopped.
    Paused,
    /// No status for this room in the last cycle.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlayerFeature {
    Play,
    Stop,
    NextTrack,
    PreviousTrack,
    VolumeSet,
    TurnOn,
    TurnOff,
    RepeatSet,
    /// Only offered while the source list is non-empty.
    SelectSource,
}

/// Per-room device description. One device per room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: String,
    pub configuration_url: String,
}

/// Point-in-time copy of every player property, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub unique_id: String,
    pub room_id: RoomId,
    pub name: String,
    pub state: PlayerState,
    pub volume_level: Option<f64>,
    pub media_title: Option<String>,
    pub media_artist: Option<String>,
    pub media_album_name: Option<String>,
    pub media_image_url: Option<String>,
    pub repeat: Option<bool>,
    pub source_list: Vec<String>,
    pub supported_features: Vec<PlayerFeature>,
}

// ── RoomPlayer ───────────────────────────────────────────────────

/// One room exposed as a controllable media player.
#[derive(Clone)]
pub struct RoomPlayer {
    bridge: Bridge,
    room_id: RoomId,
    name: String,
    unique_id: String,
}

impl RoomPlayer {
    pub fn new(bridge: Bridge, room_id: RoomId, name: String) -> Self {
        let unique_id = format!("{}_room_{room_id}", bridge.config().installation_id);
        Self {
            bridge,
            room_id,
            name,
            unique_id,
        }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifier: self.unique_id.clone(),
            name: format!("Veoovibes – {}", self.name),
            manufacturer: MANUFACTURER.to_owned(),
            configuration_url: self.bridge.config().base_url.to_string(),
        }
    }

    /// Read one property from this room's current status.
    fn read<T>(&self, f: impl FnOnce(&RoomStatus) -> Option<T>) -> Option<T> {
        let snapshot = self.bridge.snapshot()?;
        snapshot.status(&self.room_id).and_then(f)
    }

    pub fn state(&self) -> PlayerState {
        self.read(|st| Some(st.is_playing()))
            .map_or(PlayerState::Unavailable, |playing| {
                if playing {
                    PlayerState::Playing
                } else {
                    PlayerState::Paused
                }
            })
    }

    pub fn volume_level(&self) -> Option<f64> {
        self.read(RoomStatus::volume_level)
    }

    pub fn media_title(&self) -> Option<String> {
        self.read(|st| st.title().map(str::to_owned))
    }

    pub fn media_artist(&self) -> Option<String> {
        self.read(|st| st.artist().map(str::to_owned))
    }

    pub fn media_album_name(&self) -> Option<String> {
        self.read(|st| st.album().map(str::to_owned))
    }

    pub fn media_image_url(&self) -> Option<String> {
        self.read(|st| st.cover().map(str::to_owned))
    }

    pub fn repeat(&self) -> Option<bool> {
        self.read(RoomStatus::repeat)
    }

    pub fn source_list(&self) -> Vec<String> {
        self.bridge.sources().iter().map(|s| s.name.clone()).collect()
    }

    pub fn supported_features(&self) -> Vec<PlayerFeature> {
        let has_sources = !self.bridge.sources().is_empty();
        PlayerFeature::iter()
            .filter(|f| *f != PlayerFeature::SelectSource || has_sources)
            .collect()
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            unique_id: self.unique_id.clone(),
            room_id: self.room_id.clone(),
            name: self.name.clone(),
            state: self.state(),
            volume_level: self.volume_level(),
            media_title: self.media_title(),
            media_artist: self.media_artist(),
            media_album_name: self.media_album_name(),
            media_image_url: self.media_image_url(),
            repeat: self.repeat(),
            source_list: self.source_list(),
            supported_features: self.supported_features(),
        }
    }

    // ── Controls ─────────────────────────────────────────────────

    async fn run(&self, cmd: Command) {
        let name = cmd.to_string();
        if let Err(e) = self.bridge.execute(cmd).await {
            warn!(player = %self.unique_id, command = %name, error = %e, "player command failed");
        }
    }

    fn room(&self) -> RoomId {
        self.room_id.clone()
    }

    pub async fn play(&self) {
        self.run(Command::Play { room: self.room() }).await;
    }

    pub async fn stop(&self) {
        self.run(Command::Stop { room: self.room() }).await;
    }

    pub async fn next_track(&self) {
        self.run(Command::Next { room: self.room() }).await;
    }

    pub async fn previous_track(&self) {
        self.run(Command::Previous { room: self.room() }).await;
    }

    pub async fn set_volume_level(&self, level: f64) {
        self.run(Command::SetVolume {
            room: self.room(),
            level,
        })
        .await;
    }

    pub async fn turn_on(&self) {
        self.run(Command::TurnOn { room: self.room() }).await;
    }

    pub async fn turn_off(&self) {
        self.run(Command::TurnOff { room: self.room() }).await;
    }

    pub async fn toggle_repeat(&self) {
        self.run(Command::ToggleRepeat { room: self.room() }).await;
    }

    /// Bring repeat to `enabled`. The device only offers a toggle, so this
    /// toggles unless the reported state already matches.
    pub async fn set_repeat(&self, enabled: bool) {
        if self.repeat() == Some(enabled) {
            debug!(player = %self.unique_id, enabled, "repeat already in requested state");
            return;
        }
        self.toggle_repeat().await;
    }

    pub async fn select_source(&self, name: &str) {
        self.run(Command::SelectSource {
            room: self.room(),
            name: name.to_owned(),
        })
        .await;
    }
}

impl std::fmt::Debug for RoomPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomPlayer")
            .field("unique_id", &self.unique_id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Bridge {
    /// One player per distinct resolvable room id, in room-list order.
    pub fn players(&self) -> Vec<RoomPlayer> {
        let Some(snapshot) = self.snapshot() else {
            return Vec::new();
        };
        snapshot
            .room_ids()
            .into_iter()
            .filter_map(|id| {
                let room = snapshot.room(id)?;
                Some(RoomPlayer::new(self.clone(), id.clone(), room.name.clone()))
            })
            .collect()
    }

    /// The player for one room id, if the room is in the snapshot.
    pub fn player(&self, room: &RoomId) -> Option<RoomPlayer> {
        self.players().into_iter().find(|p| p.room_id() == room)
    }
}
