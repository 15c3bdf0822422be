//! Shared configuration for veoovibes tools.
//!
//! TOML profiles, API key resolution (env + plaintext), source-map
//! loading, and translation to `veoovibes_core::BridgeConfig`. The CLI
//! layers its `GlobalOpts` overrides on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use veoovibes_api::normalize_base_url;
use veoovibes_core::{BridgeConfig, BridgeOptions};

/// Environment variable consulted for the API key when the profile names none.
pub const API_KEY_ENV: &str = "VEOOVIBES_API_KEY";

/// Prefix for environment overrides of config keys.
pub const ENV_PREFIX: &str = "VEOOVIBES_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to read source map {path}: {source}")]
    SourceMapFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is given on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use: the requested one, else the default.
    pub fn profile_name<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles.get(name).ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Skip TLS verification unless a profile says otherwise.
    #[serde(default)]
    pub insecure: bool,

    /// Per-command timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Background refresh period in seconds (`watch`).
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
            refresh_interval: default_refresh_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    15
}
fn default_refresh_interval() -> u64 {
    10
}

/// A named device profile.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Device address; a missing scheme means `http://`.
    pub base_url: String,

    /// API key (plaintext, prefer `api_key_env`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable holding the API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Override TLS verification.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_tls: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u64>,

    /// Inline source map (YAML or JSON).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map: Option<String>,

    /// Source map read from a file instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_map_file: Option<PathBuf>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "veoovibes", "veoovibes").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("veoovibes");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load config from `path` (if present), merged over defaults and under
/// `VEOOVIBES_*` environment overrides. Nested keys use `__`, e.g.
/// `VEOOVIBES_DEFAULTS__TIMEOUT=5`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__").ignore(&["api_key"]));

    Ok(figment.extract()?)
}

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API key: `api_key_env` variable, then `VEOOVIBES_API_KEY`,
/// then the plaintext `api_key`. `None` when nothing is set; the device
/// may not require one.
pub fn resolve_api_key(profile: &Profile) -> Option<SecretString> {
    resolve_api_key_with(profile, |name| std::env::var(name).ok())
}

/// [`resolve_api_key`] with an explicit environment lookup.
pub fn resolve_api_key_with(
    profile: &Profile,
    env: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    let non_empty = |v: String| {
        let v = v.trim().to_owned();
        (!v.is_empty()).then_some(v)
    };

    profile
        .api_key_env
        .as_deref()
        .and_then(&env)
        .and_then(non_empty)
        .or_else(|| env(API_KEY_ENV).and_then(non_empty))
        .or_else(|| profile.api_key.clone().and_then(non_empty))
        .map(SecretString::from)
}

/// The profile's source map text: inline, or read from `source_map_file`.
pub fn resolve_source_map(profile: &Profile) -> Result<Option<String>, ConfigError> {
    match (&profile.source_map, &profile.source_map_file) {
        (Some(_), Some(_)) => Err(ConfigError::Validation {
            field: "source_map".into(),
            reason: "set either source_map or source_map_file, not both".into(),
        }),
        (Some(inline), None) => Ok(Some(inline.clone())),
        (None, Some(path)) => std::fs::read_to_string(path)
            .map(Some)
            .map_err(|source| ConfigError::SourceMapFile {
                path: path.clone(),
                source,
            }),
        (None, None) => Ok(None),
    }
}

/// Build a `BridgeConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_bridge_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<BridgeConfig, ConfigError> {
    let base_url = normalize_base_url(&profile.base_url).map_err(|e| ConfigError::Validation {
        field: "base_url".into(),
        reason: e.to_string(),
    })?;

    let mut config = BridgeConfig::new(base_url).with_options(BridgeOptions {
        source_map: resolve_source_map(profile)?,
    });
    config.installation_id = profile_name.to_owned();
    config.api_key = resolve_api_key(profile);
    config.verify_tls = profile.verify_tls.unwrap_or(!defaults.insecure);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.refresh_interval =
        Duration::from_secs(profile.refresh_interval.unwrap_or(defaults.refresh_interval));
    Ok(config)
}
