// ── Bridge ──
//
// One running installation: the device client, its aggregator, the parsed
// source list, and the background tasks that keep the snapshot fresh and
// react to option changes. Replaces any process-wide registry; callers hold
// a `Bridge` and pass it around.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use veoovibes_api::VeoovibesClient;

use crate::aggregator::Aggregator;
use crate::command::{Command, CommandResult, level_to_percent};
use crate::config::{BridgeConfig, BridgeOptions};
use crate::error::CoreError;
use crate::source::{SourceEntry, SourceList, find_source, source_list};
use crate::store::{Snapshot, SnapshotStore};

// ── Bridge ───────────────────────────────────────────────────────

/// Handle to one running installation.
///
/// Cheaply cloneable via `Arc<BridgeInner>`. Created by
/// [`setup()`](Self::setup), stopped by [`teardown()`](Self::teardown).
#[derive(Clone)]
pub struct Bridge {
    inner: Arc<BridgeInner>,
}

struct BridgeInner {
    config: BridgeConfig,
    client: Arc<VeoovibesClient>,
    aggregator: Aggregator,
    options: ArcSwap<BridgeOptions>,
    sources: ArcSwap<Vec<SourceEntry>>,
    options_tx: watch::Sender<BridgeOptions>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Bridge {
    // ── Lifecycle ────────────────────────────────────────────────

    /// Validate the device, take the first snapshot and start background
    /// tasks.
    ///
    /// Fails with [`CoreError::CannotConnect`] if the room list cannot be
    /// fetched (during validation or the first refresh) and
    /// [`CoreError::NoRooms`] if it is empty.
    pub async fn setup(config: BridgeConfig) -> Result<Self, CoreError> {
        let client = VeoovibesClient::new(config.base_url.clone(), config.api_key.clone(), &config.transport())
            .map_err(|e| CoreError::Config {
                message: e.to_string(),
            })?;
        Self::setup_with_client(config, client).await
    }

    /// [`setup()`](Self::setup) with a pre-built client.
    pub async fn setup_with_client(config: BridgeConfig, client: VeoovibesClient) -> Result<Self, CoreError> {
        let room_count = validate_connection(&client).await?;
        debug!(rooms = room_count, url = %config.base_url, "device reachable");

        let store = Arc::new(SnapshotStore::new());
        let client = Arc::new(client);
        let sources = source_list(config.options.source_map.as_deref());
        let (options_tx, options_rx) = watch::channel(config.options.clone());

        let bridge = Self {
            inner: Arc::new(BridgeInner {
                aggregator: Aggregator::new(Arc::clone(&client), store),
                client,
                options: ArcSwap::from_pointee(config.options.clone()),
                sources: ArcSwap::new(sources),
                options_tx,
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
                config,
            }),
        };

        // The device answered validation; a failing first cycle is still a
        // connection failure, not an unknown one.
        let snapshot = bridge.inner.aggregator.refresh().await.map_err(|e| match e {
            CoreError::Api(source) => CoreError::CannotConnect {
                url: bridge.inner.client.base_url().to_string(),
                source,
            },
            other => other,
        })?;
        bridge.spawn_tasks(options_rx).await;

        info!(
            installation = %bridge.inner.config.installation_id,
            rooms = snapshot.rooms().len(),
            sources = bridge.inner.sources.load().len(),
            "bridge ready"
        );
        Ok(bridge)
    }

    /// Check that the device answers and reports at least one room.
    ///
    /// Returns the room count. Does not start anything.
    pub async fn validate(config: &BridgeConfig) -> Result<usize, CoreError> {
        let client = VeoovibesClient::new(config.base_url.clone(), config.api_key.clone(), &config.transport())
            .map_err(|e| CoreError::Config {
                message: e.to_string(),
            })?;
        validate_connection(&client).await
    }

    async fn spawn_tasks(&self, options_rx: watch::Receiver<BridgeOptions>) {
        let mut handles = self.inner.task_handles.lock().await;

        let interval = self.inner.config.refresh_interval;
        if !interval.is_zero() {
            let bridge = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(refresh_task(bridge, interval, cancel)));
        }

        let bridge = self.clone();
        let cancel = self.inner.cancel.clone();
        handles.push(tokio::spawn(options_listener_task(bridge, options_rx, cancel)));
    }

    /// Stop background tasks and wait for them. Safe to call twice.
    pub async fn teardown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!(installation = %self.inner.config.installation_id, "bridge stopped");
    }

    /// Set up, run `f`, tear down.
    ///
    /// Meant for single CLI invocations: the periodic refresh is disabled.
    pub async fn oneshot<F, Fut, T, E>(config: BridgeConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(Bridge) -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: From<CoreError>,
    {
        let config = config.with_refresh_interval(Duration::ZERO);
        let bridge = Self::setup(config).await?;
        let result = f(bridge.clone()).await;
        bridge.teardown().await;
        result
    }

    pub fn is_running(&self) -> bool {
        !self.inner.cancel.is_cancelled()
    }

    fn ensure_running(&self) -> Result<(), CoreError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(CoreError::Disconnected)
        }
    }

    // ── Options ──────────────────────────────────────────────────

    /// Hand new options to the background listener, which re-parses the
    /// source map and refreshes.
    pub fn update_options(&self, options: BridgeOptions) -> Result<(), CoreError> {
        self.ensure_running()?;
        self.inner.options_tx.send_replace(options);
        Ok(())
    }

    /// Apply new options inline: re-parse the source map, then refresh.
    pub async fn apply_options(&self, options: BridgeOptions) -> Result<Arc<Snapshot>, CoreError> {
        self.ensure_running()?;
        let sources = source_list(options.source_map.as_deref());
        info!(sources = sources.len(), "options changed");
        self.inner.sources.store(sources);
        self.inner.options.store(Arc::new(options));
        self.refresh().await
    }

    // ── Refresh & commands ───────────────────────────────────────

    /// Run one refresh cycle now. Serialized with the periodic task.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        self.ensure_running()?;
        self.inner.aggregator.refresh().await
    }

    /// Execute a command, then refresh regardless of its outcome.
    ///
    /// A failed refresh is only logged; the command's own result is
    /// returned.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        self.ensure_running()?;

        let result = route_command(self, &cmd).await;
        if let Err(ref e) = result {
            debug!(command = %cmd, room = %cmd.room(), error = %e, "command failed");
        }

        if let Err(e) = self.inner.aggregator.refresh().await {
            warn!(error = %e, "refresh after command failed");
        }
        result
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn config(&self) -> &BridgeConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &Arc<VeoovibesClient> {
        &self.inner.client
    }

    pub fn store(&self) -> &Arc<SnapshotStore> {
        self.inner.aggregator.store()
    }

    /// The last published snapshot.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.store().load()
    }

    /// Subscribe to snapshot publications.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.store().subscribe()
    }

    /// The current source list.
    pub fn sources(&self) -> SourceList {
        self.inner.sources.load_full()
    }

    /// The options currently in effect.
    pub fn options(&self) -> Arc<BridgeOptions> {
        self.inner.options.load_full()
    }
}

/// List rooms once: any failure is `CannotConnect`, zero rooms `NoRooms`.
async fn validate_connection(client: &VeoovibesClient) -> Result<usize, CoreError> {
    let url = client.base_url().to_string();
    let rooms = client
        .list_rooms()
        .await
        .map_err(|source| CoreError::CannotConnect {
            url: url.clone(),
            source,
        })?;
    if rooms.is_empty() {
        return Err(CoreError::NoRooms { url });
    }
    Ok(rooms.len())
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh the snapshot.
async fn refresh_task(bridge: Bridge, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = bridge.inner.aggregator.refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

/// Apply option changes sent through [`Bridge::update_options`].
async fn options_listener_task(
    bridge: Bridge,
    mut rx: watch::Receiver<BridgeOptions>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let options = rx.borrow_and_update().clone();
                if let Err(e) = bridge.apply_options(options).await {
                    warn!(error = %e, "applying options failed");
                }
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

async fn route_command(bridge: &Bridge, cmd: &Command) -> Result<CommandResult, CoreError> {
    let client = &bridge.inner.client;
    let room = cmd.room().as_str();

    match cmd {
        Command::Play { .. } | Command::TurnOn { .. } => client.play_room(room).await?,
        Command::Stop { .. } | Command::TurnOff { .. } => client.stop_room(room).await?,
        Command::Next { .. } => client.next_room(room).await?,
        Command::Previous { .. } => client.prev_room(room).await?,
        Command::SetVolume { level, .. } => client.set_room_volume(room, level_to_percent(*level)).await?,
        Command::SetVolumePercent { percent, .. } => client.set_room_volume(room, *percent).await?,
        Command::ToggleRepeat { .. } => client.toggle_room_repeat(room).await?,
        Command::SelectSource { name, .. } => {
            let sources = bridge.sources();
            let Some(source) = find_source(&sources, name) else {
                warn!(room, source = %name, "unknown source; nothing sent");
                return Ok(CommandResult::Ignored {
                    reason: format!("unknown source '{name}'"),
                });
            };
            client.select_room_source(room, source.group, source.prog).await?;
        }
    }
    Ok(CommandResult::Ok)
}
