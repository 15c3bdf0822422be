//! Polling and control layer between `veoovibes-api` and its front ends.
//!
//! - **[`Bridge`]**: one running installation. [`setup()`](Bridge::setup)
//!   validates the device, takes the first snapshot and spawns the periodic
//!   refresh and the options listener. [`Bridge::oneshot()`] runs a single
//!   closure without background polling, for CLI use.
//!
//! - **[`Aggregator`]**: one refresh cycle lists the rooms and fetches each
//!   room's status in turn. A failing room is left out; a failing room list
//!   keeps the previous [`Snapshot`] published.
//!
//! - **[`SnapshotStore`]**: the last published snapshot, swapped atomically
//!   and broadcast over a `watch` channel.
//!
//! - **[`RoomPlayer`]**: the media-player projection of one room.
//!
//! - **[`source`]**: the named `{group, prog}` source list, parsed from YAML
//!   or JSON text.

pub mod aggregator;
pub mod bridge;
pub mod command;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod player;
pub mod source;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregator::{Aggregator, collect_snapshot};
pub use bridge::Bridge;
pub use command::{Command, CommandResult, level_to_percent};
pub use config::{BridgeConfig, BridgeOptions, DEFAULT_REFRESH_INTERVAL};
pub use error::CoreError;
pub use model::{Room, RoomId, RoomStatus};
pub use player::{DeviceInfo, PlayerFeature, PlayerState, PlayerView, RoomPlayer};
pub use source::{EXAMPLE_SOURCE_MAP, SourceEntry, SourceList, parse_source_map};
pub use store::{Snapshot, SnapshotStore};

pub use veoovibes_api::ApiError;
