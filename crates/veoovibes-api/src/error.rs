use thiserror::Error;

/// The single error type of the `veoovibes-api` crate.
///
/// Every failed command call surfaces as an `ApiError`, whatever went wrong:
/// the transport, the HTTP status, or the `{status, code, result}` envelope.
/// Variants only record *which* cause occurred so diagnostics can show it;
/// callers are expected to treat them all as "the command failed".
#[derive(Debug, Error)]
pub enum ApiError {
    // ── Transport ───────────────────────────────────────────────────
    /// Connection refused, DNS failure, TLS failure, timeout, etc.
    #[error("{command} error: {source}")]
    Transport {
        command: String,
        #[source]
        source: reqwest::Error,
    },

    /// The device answered with a non-2xx HTTP status.
    #[error("{command} error: HTTP {status}")]
    Status {
        command: String,
        status: u16,
        body: String,
    },

    // ── Envelope ────────────────────────────────────────────────────
    /// The envelope reported `status != "succeeded"` or `code != "0"`.
    #[error("{command} failed: {envelope}")]
    Rejected {
        command: String,
        envelope: serde_json::Value,
    },

    /// The body was not a JSON object envelope.
    #[error("{command} error: {message}")]
    Deserialization {
        command: String,
        message: String,
        body: String,
    },

    // ── Setup ───────────────────────────────────────────────────────
    /// The configured base URL could not be turned into a request URL.
    #[error("Invalid base URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl ApiError {
    /// The command that failed, if the error came from a command call.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Transport { command, .. }
            | Self::Status { command, .. }
            | Self::Rejected { command, .. }
            | Self::Deserialization { command, .. } => Some(command),
            Self::InvalidUrl { .. } | Self::Client(_) => None,
        }
    }

    /// The raw envelope the device returned, for rejected commands.
    pub fn envelope(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Rejected { envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    /// Returns `true` if the request exceeded its timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_timeout())
    }

    /// Returns `true` if the device could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_connect())
    }
}
