//! Command dispatch: bridges CLI args -> core Commands -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod controls;
pub mod diagnostics;
pub mod rooms;
pub mod sources;
pub mod util;
pub mod watch;

use veoovibes_core::Bridge;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, bridge: &Bridge, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Rooms(args) => rooms::handle(bridge, args, global).await,
        Command::Play(args) => controls::play(bridge, &args, global).await,
        Command::Stop(args) => controls::stop(bridge, &args, global).await,
        Command::Next(args) => controls::next(bridge, &args, global).await,
        Command::Prev(args) => controls::prev(bridge, &args, global).await,
        Command::Volume(args) => controls::volume(bridge, &args, global).await,
        Command::Repeat(args) => controls::repeat(bridge, &args, global).await,
        Command::Source(args) => controls::source(bridge, args, global).await,
        Command::Diagnostics => diagnostics::handle(bridge, global),
        // Handled before a bridge is set up
        Command::Check
        | Command::Watch
        | Command::Sources(_)
        | Command::Config(_)
        | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a running bridge".into(),
        )),
    }
}
