//! CLI configuration: thin wrapper around `veoovibes_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--url, --api-key, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use veoovibes_core::BridgeConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use veoovibes_config::{
    Config, Defaults, Profile, config_path, load_config, profile_to_bridge_config,
    save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Build the `BridgeConfig` for this invocation.
///
/// Uses the active profile when one exists, with flags layered on top.
/// Without a profile, `--url` alone is enough.
pub fn build_bridge_config(global: &GlobalOpts) -> Result<BridgeConfig, CliError> {
    let cfg = load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    let url = global.url.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;

    let mut config = BridgeConfig::from_input(
        url,
        global.api_key.as_deref(),
        !(global.insecure || cfg.defaults.insecure),
    )?;
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
    config.refresh_interval = Duration::from_secs(cfg.defaults.refresh_interval);
    Ok(config)
}

/// Translate a `Profile` + global flags into a `BridgeConfig`.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<BridgeConfig, CliError> {
    let mut profile = profile.clone();
    if let Some(ref url) = global.url {
        profile.base_url.clone_from(url);
    }

    let mut config = profile_to_bridge_config(&profile, profile_name, defaults)?;

    if let Some(key) = global.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        config.api_key = Some(SecretString::from(key.to_owned()));
    }
    if global.insecure {
        config.verify_tls = false;
    }
    if let Some(secs) = global.timeout {
        config.timeout = Duration::from_secs(secs);
    }
    Ok(config)
}

fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["veoovibes"];
        argv.extend_from_slice(args);
        argv.push("check");
        Cli::try_parse_from(argv).expect("parse").global
    }

    fn profile() -> Profile {
        Profile {
            base_url: "192.168.1.50".into(),
            api_key: Some("from-profile".into()),
            timeout: Some(5),
            ..Profile::default()
        }
    }

    #[test]
    fn flags_override_profile_values() {
        let global = global(&["--url", "10.0.0.2:8080", "--api-key", "flag", "-k", "--timeout", "9"]);
        let config = resolve_profile(&profile(), "home", &Defaults::default(), &global).expect("config");

        assert_eq!(config.base_url.as_str(), "http://10.0.0.2:8080/");
        assert_eq!(config.installation_id, "home");
        assert_eq!(config.api_key.as_ref().map(|k| k.expose_secret().to_owned()).as_deref(), Some("flag"));
        assert!(!config.verify_tls);
        assert_eq!(config.timeout, Duration::from_secs(9));
    }

    #[test]
    fn profile_values_apply_without_flags() {
        let global = GlobalOpts {
            api_key: None,
            ..global(&[])
        };
        let config = resolve_profile(&profile(), "home", &Defaults::default(), &global).expect("config");

        assert_eq!(config.base_url.as_str(), "http://192.168.1.50/");
        assert!(config.verify_tls);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
