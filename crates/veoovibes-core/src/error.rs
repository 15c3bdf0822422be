// ── Core error types ──
//
// User-facing errors from veoovibes-core. Command failures from the device
// stay wrapped as `ApiError`; setup failures get their own variants so the
// CLI can map them to distinct exit codes.

use thiserror::Error;
use veoovibes_api::ApiError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Setup errors ─────────────────────────────────────────────────
    #[error("Cannot connect to veoovibes at {url}: {source}")]
    CannotConnect {
        url: String,
        #[source]
        source: ApiError,
    },

    #[error("No rooms reported by veoovibes at {url}")]
    NoRooms { url: String },

    // ── Runtime errors ───────────────────────────────────────────────
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Bridge disconnected")]
    Disconnected,

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// The setup-form error key this error maps to.
    ///
    /// `cannot_connect` for device failures, `no_rooms` for an empty
    /// installation, `unknown` for everything else.
    pub fn setup_error_key(&self) -> &'static str {
        match self {
            Self::CannotConnect { .. } => "cannot_connect",
            Self::NoRooms { .. } => "no_rooms",
            Self::Api(_) | Self::Disconnected | Self::Config { .. } | Self::Internal(_) => {
                "unknown"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_error_keys() {
        let no_rooms = CoreError::NoRooms { url: "http://x".into() };
        assert_eq!(no_rooms.setup_error_key(), "no_rooms");
        assert_eq!(CoreError::Disconnected.setup_error_key(), "unknown");
        let cannot = CoreError::CannotConnect {
            url: "http://x".into(),
            source: ApiError::Client("boom".into()),
        };
        assert_eq!(cannot.setup_error_key(), "cannot_connect");
        assert!(cannot.to_string().contains("http://x"));
    }
}
