// ── Snapshot store ──
//
// Holds the last published snapshot. Readers load it lock-free through
// `ArcSwapOption`; subscribers get every publication via a `watch`
// channel. A failed refresh publishes nothing, so the previous snapshot
// stays visible.

mod snapshot;

pub use snapshot::Snapshot;

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

/// The published snapshot of one installation.
pub struct SnapshotStore {
    current: ArcSwapOption<Snapshot>,
    tx: watch::Sender<Option<Arc<Snapshot>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            current: ArcSwapOption::const_empty(),
            tx,
        }
    }

    /// Replace the published snapshot and notify subscribers.
    pub fn publish(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        self.current.store(Some(Arc::clone(&snapshot)));
        self.tx.send_replace(Some(Arc::clone(&snapshot)));
        snapshot
    }

    /// The last published snapshot, if any cycle has succeeded yet.
    pub fn load(&self) -> Option<Arc<Snapshot>> {
        self.current.load_full()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.tx.subscribe()
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.load().map(|s| s.fetched_at())
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn publish_replaces_and_notifies() {
        let store = SnapshotStore::new();
        assert!(store.load().is_none());
        assert!(store.last_refresh().is_none());

        let mut rx = store.subscribe();
        let at = Utc::now();
        store.publish(Snapshot::new(Vec::new(), HashMap::new(), at));

        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(rx.borrow_and_update().as_ref().map(|s| s.fetched_at()), Some(at));
        assert_eq!(store.last_refresh(), Some(at));
    }
}
