mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use veoovibes_core::Bridge;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Commands that never talk to the device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Sources(args) => commands::sources::handle(&args, &cli.global),
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "veoovibes", &mut std::io::stdout());
            Ok(())
        }

        // Setup validation only
        Command::Check => {
            let bridge_config = config::build_bridge_config(&cli.global)?;
            commands::check::handle(&bridge_config, &cli.global).await
        }

        // Long-running bridge with periodic refresh
        Command::Watch => {
            let bridge_config = config::build_bridge_config(&cli.global)?;
            commands::watch::handle(bridge_config, &cli.global).await
        }

        // Everything else: set up, run once, tear down
        cmd => {
            let bridge_config = config::build_bridge_config(&cli.global)?;
            let global = &cli.global;

            tracing::debug!(command = ?cmd, url = %bridge_config.base_url, "dispatching command");
            Bridge::oneshot(bridge_config, |bridge| async move {
                commands::dispatch(cmd, &bridge, global).await
            })
            .await
        }
    }
}
