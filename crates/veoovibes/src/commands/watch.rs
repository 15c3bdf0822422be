//! Watch mode: keep a bridge running and print every published snapshot.

use std::sync::Arc;

use tokio::sync::watch;
use veoovibes_core::{Bridge, BridgeConfig, PlayerView, RoomPlayer, Snapshot};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::rooms;

pub async fn handle(config: BridgeConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let bridge = Bridge::setup(config).await?;
    tracing::info!(
        interval = ?bridge.config().refresh_interval,
        "watching, press Ctrl-C to stop"
    );

    let result = watch_loop(&bridge, bridge.subscribe(), global).await;
    bridge.teardown().await;
    result
}

async fn watch_loop(
    bridge: &Bridge,
    mut rx: watch::Receiver<Option<Arc<Snapshot>>>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let current = rx.borrow_and_update().clone();
    if let Some(snapshot) = current {
        print_snapshot(bridge, &snapshot, global)?;
    }

    loop {
        tokio::select! {
            res = &mut shutdown => {
                res?;
                break;
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = rx.borrow_and_update().clone();
                if let Some(snapshot) = next {
                    print_snapshot(bridge, &snapshot, global)?;
                }
            }
        }
    }
    Ok(())
}

fn print_snapshot(bridge: &Bridge, snapshot: &Snapshot, global: &GlobalOpts) -> Result<(), CliError> {
    let views: Vec<PlayerView> = bridge.players().iter().map(RoomPlayer::view).collect();

    if matches!(global.output, OutputFormat::Table) {
        let stamp = snapshot.fetched_at().format("%Y-%m-%d %H:%M:%S UTC");
        output::print_output(&format!("── {stamp} ──"), global.quiet);
    }
    // One line per snapshot keeps JSON output streamable.
    let format = match global.output {
        OutputFormat::Json => OutputFormat::JsonCompact,
        ref other => other.clone(),
    };
    let out = rooms::render_views(&views, &format, output::should_color(&global.color))?;
    output::print_output(&out, global.quiet);
    Ok(())
}
