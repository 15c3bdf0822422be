// Diagnostics dump: last snapshot, connection settings and the parsed
// source list. The API key itself never appears, only whether one is set.

use serde_json::{Value, json};

use crate::bridge::Bridge;

impl Bridge {
    pub fn diagnostics(&self) -> Value {
        let snapshot = self.snapshot();
        let config = self.config();
        let sources = self.sources();

        let rooms: Vec<&serde_json::Map<String, Value>> = snapshot
            .as_ref()
            .map(|s| s.rooms().iter().map(|r| &r.attributes).collect())
            .unwrap_or_default();

        json!({
            "rooms": rooms,
            "state": snapshot.as_ref().map(|s| s.status_map()),
            "config": {
                "base_url": config.base_url.as_str(),
                "verify_tls": config.verify_tls,
                "api_key_present": self.client().has_api_key(),
            },
            "sources": sources.as_slice(),
            "last_refresh": snapshot.as_ref().map(|s| s.fetched_at().to_rfc3339()),
        })
    }
}
