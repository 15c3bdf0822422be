//! Clap derive structures for the `veoovibes` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// veoovibes -- control a veoovibes multi-room audio installation
#[derive(Debug, Parser)]
#[command(
    name = "veoovibes",
    version,
    about = "Control veoovibes multi-room audio from the command line",
    long_about = "Lists the rooms of a veoovibes device, shows what each room is playing,\n\
        and sends transport, volume, repeat and source commands.\n\n\
        Talks to the device's HTTP command API under /api/v1.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Device profile to use
    #[arg(long, short = 'p', env = "VEOOVIBES_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Device address, e.g. 192.168.1.50 or https://veoo.local (overrides profile)
    #[arg(long, short = 'u', env = "VEOOVIBES_URL", global = true)]
    pub url: Option<String>,

    /// API key, sent as the api_key query parameter
    #[arg(long, env = "VEOOVIBES_API_KEY", global = true, hide_env = true)]
    pub api_key: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "VEOOVIBES_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k', env = "VEOOVIBES_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "VEOOVIBES_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the device is reachable and reports rooms
    Check,

    /// List rooms and show room status
    #[command(alias = "r")]
    Rooms(RoomsArgs),

    /// Start playback in a room
    Play(RoomArg),

    /// Stop playback in a room
    Stop(RoomArg),

    /// Skip to the next track
    Next(RoomArg),

    /// Go back to the previous track
    #[command(alias = "previous")]
    Prev(RoomArg),

    /// Set a room's volume (0-100, out-of-range values are clamped)
    #[command(alias = "vol")]
    Volume(VolumeArgs),

    /// Toggle repeat in a room
    Repeat(RoomArg),

    /// Select a named source in a room
    Source(SourceArgs),

    /// Show the configured source list
    Sources(SourcesArgs),

    /// Poll the device and print every snapshot until interrupted
    Watch,

    /// Dump rooms, state, connection settings and sources
    #[command(alias = "diag")]
    Diagnostics,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ROOMS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RoomsArgs {
    #[command(subcommand)]
    pub command: RoomsCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomsCommand {
    /// List all rooms with their player state
    #[command(alias = "ls")]
    List,

    /// Fetch the raw player status of one room
    Status {
        /// Room id or name
        room: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTROLS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct RoomArg {
    /// Room id or name
    pub room: String,
}

#[derive(Debug, Args)]
pub struct VolumeArgs {
    /// Room id or name
    pub room: String,

    /// Volume percent
    #[arg(allow_negative_numbers = true)]
    pub percent: i64,
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Room id or name
    pub room: String,

    /// Source name, as listed by `veoovibes sources`
    pub name: String,
}

#[derive(Debug, Args)]
pub struct SourcesArgs {
    /// Parse this file instead of the profile's source map
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (API keys masked)
    Show,

    /// Print the config file location
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
