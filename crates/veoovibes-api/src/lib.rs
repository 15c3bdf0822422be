// veoovibes-api: Async Rust client for the veoovibes multi-room audio HTTP API

pub mod client;
pub mod error;
pub mod models;
pub mod rooms;
pub mod transport;

pub use client::{API_PREFIX, VeoovibesClient, normalize_base_url};
pub use error::ApiError;
pub use models::{Envelope, RoomObject};
pub use rooms::{clamp_volume, flatten_room_map};
pub use transport::{TlsMode, TransportConfig};
