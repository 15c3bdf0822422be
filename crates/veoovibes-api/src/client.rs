// veoovibes HTTP command client
//
// Wraps `reqwest::Client` with command URL construction, `api_key`
// injection, and envelope unwrapping. Room endpoints are implemented as
// inherent methods in `rooms.rs` to keep this module focused on transport
// mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::ApiError;
use crate::models::Envelope;
use crate::transport::TransportConfig;

/// Fixed path prefix of every command endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Raw HTTP client for the veoovibes command API.
///
/// Every command is a `GET {base}/api/v1/{command}?api_key=..&...`. All
/// methods return the unwrapped `result` payload; the envelope is stripped
/// before the caller sees it.
#[derive(Clone)]
pub struct VeoovibesClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<SecretString>,
}

impl std::fmt::Debug for VeoovibesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VeoovibesClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "****"))
            .finish_non_exhaustive()
    }
}

impl VeoovibesClient {
    /// Create a client from a `TransportConfig`.
    pub fn new(
        base_url: Url,
        api_key: Option<SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, ApiError> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, api_key))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, api_key: Option<SecretString>) -> Self {
        let api_key = api_key.filter(|k| !k.expose_secret().is_empty());
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether an API key is sent with each command.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the full URL for a command: `{base}/api/v1/{command}`.
    pub(crate) fn command_url(&self, command: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{API_PREFIX}/{command}")
    }

    /// Query pairs for a command, with `api_key` first when configured.
    fn query<'a>(&'a self, params: &'a [(&'a str, String)]) -> Vec<(&'a str, &'a str)> {
        let mut query = Vec::with_capacity(params.len() + 1);
        if let Some(key) = &self.api_key {
            query.push(("api_key", key.expose_secret()));
        }
        query.extend(params.iter().map(|(k, v)| (*k, v.as_str())));
        query
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Issue one command and unwrap its envelope.
    ///
    /// Returns the `result` field verbatim (object, array, primitive, or
    /// `Null` when absent).
    pub async fn command(&self, command: &str, params: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.command_url(command);
        debug!(command, "GET {}", url);

        let resp = self
            .http
            .get(&url)
            .query(&self.query(params))
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                command: command.to_owned(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                command: command.to_owned(),
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let body = resp.text().await.map_err(|source| ApiError::Transport {
            command: command.to_owned(),
            source,
        })?;

        parse_envelope(command, &body)
    }
}

/// Decode a response body and enforce the `{status, code, result}` contract.
fn parse_envelope(command: &str, body: &str) -> Result<Value, ApiError> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        ApiError::Deserialization {
            command: command.to_owned(),
            message: format!("{e} (body preview: {preview:?})"),
            body: body.to_owned(),
        }
    })?;

    let envelope = Envelope::from_value(value).ok_or_else(|| ApiError::Deserialization {
        command: command.to_owned(),
        message: "response body is not a JSON object".into(),
        body: body.to_owned(),
    })?;

    if envelope.is_success() {
        trace!(command, "envelope ok");
        Ok(envelope.result)
    } else {
        Err(ApiError::Rejected {
            command: command.to_owned(),
            envelope: envelope.to_value(),
        })
    }
}

/// Normalize a user-entered device address into a base URL.
///
/// Adds `http://` when no scheme is given and strips trailing slashes, so
/// `"192.168.1.50/"` becomes `http://192.168.1.50`.
pub fn normalize_base_url(input: &str) -> Result<Url, ApiError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidUrl {
            input: input.to_owned(),
            reason: "address is empty".into(),
        });
    }

    let lower = trimmed.to_ascii_lowercase();
    let with_scheme = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_owned()
    } else {
        format!("http://{trimmed}")
    };

    let normalized = with_scheme.trim_end_matches('/');
    Url::parse(normalized).map_err(|e| ApiError::InvalidUrl {
        input: input.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client(base: &str, key: Option<&str>) -> VeoovibesClient {
        VeoovibesClient::with_client(
            reqwest::Client::new(),
            Url::parse(base).expect("valid url"),
            key.map(|k| SecretString::from(k.to_owned())),
        )
    }

    #[test]
    fn command_url_appends_prefix_and_command() {
        let c = client("http://10.0.0.5:8080/", None);
        assert_eq!(c.command_url("listrooms"), "http://10.0.0.5:8080/api/v1/listrooms");
    }

    #[test]
    fn command_url_keeps_base_path() {
        let c = client("https://veoo.local/proxy", None);
        assert_eq!(c.command_url("room_play"), "https://veoo.local/proxy/api/v1/room_play");
    }

    #[test]
    fn api_key_is_injected_first() {
        let c = client("http://veoo", Some("secret"));
        let params = [("room", "95".to_owned())];
        assert_eq!(c.query(&params), vec![("api_key", "secret"), ("room", "95")]);
    }

    #[test]
    fn empty_api_key_is_not_sent() {
        let c = client("http://veoo", Some(""));
        assert!(!c.has_api_key());
        assert!(c.query(&[]).is_empty());
    }

    #[test]
    fn envelope_success_returns_result() {
        let body = json!({"status": "succeeded", "code": "0", "result": {"a": 1}}).to_string();
        assert_eq!(parse_envelope("x", &body).expect("success"), json!({"a": 1}));
    }

    #[test]
    fn envelope_without_result_yields_null() {
        let body = json!({"status": "succeeded", "code": 0}).to_string();
        assert_eq!(parse_envelope("room_play", &body).expect("success"), Value::Null);
    }

    #[test]
    fn rejected_envelope_carries_raw_envelope() {
        let body = json!({"status": "error", "code": "3", "result": "nope"}).to_string();
        let err = parse_envelope("room_play", &body).expect_err("rejected");
        assert_eq!(err.command(), Some("room_play"));
        assert_eq!(
            err.envelope(),
            Some(&json!({"status": "error", "code": "3", "result": "nope"}))
        );
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = parse_envelope("listrooms", "<html>").expect_err("not json");
        assert!(matches!(err, ApiError::Deserialization { .. }));
    }

    #[test]
    fn normalize_adds_scheme_and_strips_slash() {
        let url = normalize_base_url("  192.168.1.50/ ").expect("valid");
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("192.168.1.50"));
        assert_eq!(url.path(), "/");
    }

    #[test]
    fn normalize_keeps_https() {
        let url = normalize_base_url("https://veoo.example:8443//").expect("valid");
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.port(), Some(8443));
    }

    #[test]
    fn normalize_rejects_empty() {
        assert!(matches!(
            normalize_base_url("   "),
            Err(ApiError::InvalidUrl { .. })
        ));
    }
}
