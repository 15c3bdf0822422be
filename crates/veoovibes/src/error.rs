//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code per category.

use miette::Diagnostic;
use thiserror::Error;

use veoovibes_config::ConfigError;
use veoovibes_core::{ApiError, CoreError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Setup ────────────────────────────────────────────────────────

    #[error("Cannot connect to veoovibes at {url}")]
    #[diagnostic(
        code(veoovibes::cannot_connect),
        help(
            "Check that the device is powered on and reachable.\n\
             URL: {url}\n\
             For a self-signed certificate, try: veoovibes check --insecure"
        )
    )]
    CannotConnect {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("No rooms reported by veoovibes at {url}")]
    #[diagnostic(
        code(veoovibes::no_rooms),
        help("Configure at least one room on the device, then run: veoovibes check")
    )]
    NoRooms { url: String },

    #[error("Bridge is no longer running")]
    #[diagnostic(code(veoovibes::disconnected))]
    Disconnected,

    // ── Rooms & sources ──────────────────────────────────────────────

    #[error("Room '{room}' not found")]
    #[diagnostic(
        code(veoovibes::room_not_found),
        help("Run: veoovibes rooms list to see available rooms")
    )]
    RoomNotFound { room: String },

    #[error("Source '{name}' is not in the source list")]
    #[diagnostic(
        code(veoovibes::source_not_found),
        help(
            "Configured sources: {available}\n\
             Run: veoovibes sources"
        )
    )]
    SourceNotFound { name: String, available: String },

    // ── Device ───────────────────────────────────────────────────────

    #[error("Device command failed: {source}")]
    #[diagnostic(code(veoovibes::device))]
    Device {
        #[source]
        source: ApiError,
    },

    #[error("Request '{command}' timed out")]
    #[diagnostic(
        code(veoovibes::timeout),
        help("Increase timeout with --timeout or check the device's responsiveness.")
    )]
    Timeout { command: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(veoovibes::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(veoovibes::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: veoovibes config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No device configured")]
    #[diagnostic(
        code(veoovibes::no_config),
        help(
            "Create a profile with: veoovibes config init\n\
             Or pass --url / set VEOOVIBES_URL.\n\
             Config expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(veoovibes::config))]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(veoovibes::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(veoovibes::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(veoovibes::internal))]
    Internal(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CannotConnect { source, .. } if source.is_timeout() => exit_code::TIMEOUT,
            Self::CannotConnect { .. } | Self::Disconnected => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NoRooms { .. } | Self::RoomNotFound { .. } | Self::SourceNotFound { .. } => {
                exit_code::NOT_FOUND
            }
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CannotConnect { url, source } => Self::CannotConnect { url, source },
            CoreError::NoRooms { url } => Self::NoRooms { url },
            CoreError::Api(e) => e.into(),
            CoreError::Disconnected => Self::Disconnected,
            CoreError::Config { message } => Self::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Internal(message) => Self::Internal(message),
        }
    }
}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                command: err.command().unwrap_or("request").to_owned(),
            };
        }
        match err {
            ApiError::InvalidUrl { input, reason } => Self::Validation {
                field: "url".into(),
                reason: format!("{input}: {reason}"),
            },
            other => Self::Device { source: other },
        }
    }
}
