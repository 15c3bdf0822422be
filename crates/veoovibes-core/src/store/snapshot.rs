// ── Poll-cycle snapshot ──
//
// One refresh produces one `Snapshot`. It is never mutated after
// construction; publishing swaps the whole value.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Room, RoomId, RoomStatus};

/// Room list plus per-room status from one poll cycle.
///
/// Every key of the status map is the id of a room in `rooms`. Rooms whose
/// status could not be fetched are simply absent from the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    rooms: Vec<Room>,
    status: HashMap<RoomId, RoomStatus>,
    fetched_at: DateTime<Utc>,
}

impl Snapshot {
    /// Assemble a snapshot, dropping status entries for unknown rooms.
    pub fn new(rooms: Vec<Room>, mut status: HashMap<RoomId, RoomStatus>, fetched_at: DateTime<Utc>) -> Self {
        let known: HashSet<&RoomId> = rooms.iter().filter_map(|r| r.id.as_ref()).collect();
        status.retain(|id, _| known.contains(id));
        Self {
            rooms,
            status,
            fetched_at,
        }
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn status_map(&self) -> &HashMap<RoomId, RoomStatus> {
        &self.status
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// First room with the given id.
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id.as_ref() == Some(id))
    }

    pub fn status(&self, id: &RoomId) -> Option<&RoomStatus> {
        self.status.get(id)
    }

    /// Distinct resolvable room ids, in room-list order.
    pub fn room_ids(&self) -> Vec<&RoomId> {
        let mut seen = HashSet::new();
        self.rooms
            .iter()
            .filter_map(|r| r.id.as_ref())
            .filter(|id| seen.insert(*id))
            .collect()
    }
}
