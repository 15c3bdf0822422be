//! Transport, volume, repeat and source handlers.
//!
//! Every control goes through `Bridge::execute`, which refreshes the
//! snapshot afterwards whether or not the device accepted the command.

use veoovibes_core::{Bridge, Command as CoreCommand, CommandResult, RoomId};

use crate::cli::{GlobalOpts, RoomArg, SourceArgs, VolumeArgs};
use crate::error::CliError;

use super::util;

async fn run(
    bridge: &Bridge,
    room: &str,
    global: &GlobalOpts,
    build: impl FnOnce(RoomId) -> CoreCommand,
) -> Result<CommandResult, CliError> {
    let id = util::resolve_room(bridge, room)?;
    let cmd = build(id);
    let label = cmd.to_string();
    let result = bridge.execute(cmd).await?;
    if !global.quiet && result == CommandResult::Ok {
        eprintln!("✓ {label} sent to room '{room}'");
    }
    Ok(result)
}

pub async fn play(bridge: &Bridge, args: &RoomArg, global: &GlobalOpts) -> Result<(), CliError> {
    run(bridge, &args.room, global, |room| CoreCommand::Play { room }).await?;
    Ok(())
}

pub async fn stop(bridge: &Bridge, args: &RoomArg, global: &GlobalOpts) -> Result<(), CliError> {
    run(bridge, &args.room, global, |room| CoreCommand::Stop { room }).await?;
    Ok(())
}

pub async fn next(bridge: &Bridge, args: &RoomArg, global: &GlobalOpts) -> Result<(), CliError> {
    run(bridge, &args.room, global, |room| CoreCommand::Next { room }).await?;
    Ok(())
}

pub async fn prev(bridge: &Bridge, args: &RoomArg, global: &GlobalOpts) -> Result<(), CliError> {
    run(bridge, &args.room, global, |room| CoreCommand::Previous { room }).await?;
    Ok(())
}

pub async fn repeat(bridge: &Bridge, args: &RoomArg, global: &GlobalOpts) -> Result<(), CliError> {
    run(bridge, &args.room, global, |room| CoreCommand::ToggleRepeat { room }).await?;
    Ok(())
}

pub async fn volume(bridge: &Bridge, args: &VolumeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let percent = args.percent;
    run(bridge, &args.room, global, |room| CoreCommand::SetVolumePercent { room, percent }).await?;
    Ok(())
}

/// Select a source. An unknown name is reported as an error here, even
/// though the bridge itself treats it as a no-op.
pub async fn source(bridge: &Bridge, args: SourceArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let SourceArgs { room, name } = args;
    let requested = name.clone();
    let result = run(bridge, &room, global, |room| CoreCommand::SelectSource { room, name }).await?;

    match result {
        CommandResult::Ok => Ok(()),
        CommandResult::Ignored { reason } => {
            tracing::debug!(%reason, "source selection ignored");
            let available: Vec<String> = bridge.sources().iter().map(|s| s.name.clone()).collect();
            Err(CliError::SourceNotFound {
                name: requested,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            })
        }
    }
}
