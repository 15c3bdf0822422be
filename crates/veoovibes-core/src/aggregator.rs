// ── Polling aggregator ──
//
// One refresh cycle: list rooms, then fetch each room's status one at a
// time. A room whose status fails is left out of the snapshot; a failed
// room list fails the whole cycle and publishes nothing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use veoovibes_api::VeoovibesClient;

use crate::error::CoreError;
use crate::model::{Room, RoomStatus};
use crate::store::{Snapshot, SnapshotStore};

/// Produces snapshots for one installation and publishes them.
pub struct Aggregator {
    client: Arc<VeoovibesClient>,
    store: Arc<SnapshotStore>,
    /// Held for a whole cycle so timer and on-demand refreshes never interleave.
    cycle: Mutex<()>,
}

impl Aggregator {
    pub fn new(client: Arc<VeoovibesClient>, store: Arc<SnapshotStore>) -> Self {
        Self {
            client,
            store,
            cycle: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        &self.store
    }

    /// Run one serialized cycle and publish its snapshot.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let _cycle = self.cycle.lock().await;
        let snapshot = collect_snapshot(&self.client).await?;
        Ok(self.store.publish(snapshot))
    }
}

/// Fetch the room list and every resolvable room's status.
///
/// Each distinct room id is queried once, sequentially, in room order.
pub async fn collect_snapshot(client: &VeoovibesClient) -> Result<Snapshot, CoreError> {
    let rooms: Vec<Room> = client
        .list_rooms()
        .await?
        .into_iter()
        .map(Room::from_raw)
        .collect();

    let mut status = HashMap::new();
    let mut seen = HashSet::new();
    for id in rooms.iter().filter_map(|r| r.id.as_ref()) {
        if !seen.insert(id) {
            continue;
        }
        match client.get_room_status(id.as_str()).await {
            Ok(value) => {
                status.insert(id.clone(), RoomStatus::from_value(value));
            }
            Err(e) => debug!(room = %id, error = %e, "room_player_status failed"),
        }
    }

    debug!(rooms = rooms.len(), with_status = status.len(), "refresh cycle complete");
    Ok(Snapshot::new(rooms, status, Utc::now()))
}
