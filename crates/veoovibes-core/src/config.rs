// ── Runtime bridge configuration ──
//
// Describes *how* to reach one veoovibes device. Carries the credential
// and polling tuning but never touches disk; the CLI builds a
// `BridgeConfig` from its profile and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use veoovibes_api::transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};
use veoovibes_api::{ApiError, normalize_base_url};

/// Default period of the background refresh task.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Options that may change while a bridge is running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BridgeOptions {
    /// Free-form source map (YAML or JSON), see [`crate::source`].
    pub source_map: Option<String>,
}

/// Configuration for one installation (one device).
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Identifier used to build entity unique ids.
    pub installation_id: String,
    /// Device base URL, already normalized.
    pub base_url: Url,
    /// Optional API key sent as the `api_key` query parameter.
    pub api_key: Option<SecretString>,
    /// Enforce TLS certificate verification.
    pub verify_tls: bool,
    /// Per-command timeout.
    pub timeout: Duration,
    /// Background refresh period. Zero disables the refresh task.
    pub refresh_interval: Duration,
    pub options: BridgeOptions,
}

impl BridgeConfig {
    /// Config with defaults for everything but the URL.
    pub fn new(base_url: Url) -> Self {
        Self {
            installation_id: installation_id_for(&base_url),
            base_url,
            api_key: None,
            verify_tls: true,
            timeout: DEFAULT_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            options: BridgeOptions::default(),
        }
    }

    /// Build a config from user input: the address is normalized and an
    /// empty API key is treated as absent.
    pub fn from_input(address: &str, api_key: Option<&str>, verify_tls: bool) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(address)?;
        let mut config = Self::new(base_url);
        config.api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| SecretString::from(k.to_owned()));
        config.verify_tls = verify_tls;
        Ok(config)
    }

    pub fn with_options(mut self, options: BridgeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// The transport settings derived from this config.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig::default()
            .with_tls(TlsMode::from_verify(self.verify_tls))
            .with_timeout(self.timeout)
    }
}

/// Stable installation id derived from the device address.
fn installation_id_for(url: &Url) -> String {
    let host = url.host_str().unwrap_or("device");
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    }
}
