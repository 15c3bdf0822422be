// ── Source list ──
//
// A named source is a `{group, prog}` pair understood by the `music_room`
// command. The list comes from one free-form text option written in YAML
// or JSON. Parsing never fails: bad input yields fewer entries, plus a
// warning in the log.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::{debug, warn};

/// Source map pre-filled by `config init`.
pub const EXAMPLE_SOURCE_MAP: &str = "sources:
  - name: \"FM4\"
    group: 1
    prog: 3
  - name: \"Lounge\"
    group: 2
    prog: 1
";

// ── SourceEntry ─────────────────────────────────────────────────────

/// One selectable source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SourceEntry {
    pub name: String,
    pub group: i64,
    pub prog: i64,
}

impl SourceEntry {
    /// Validate one raw entry. `None` if any field is missing or unusable.
    fn from_value(value: &Value) -> Option<Self> {
        let entry = value.as_object()?;
        Some(Self {
            name: entry.get("name").and_then(coerce_name)?,
            group: entry.get("group").and_then(coerce_int)?,
            prog: entry.get("prog").and_then(coerce_int)?,
        })
    }
}

/// Immutable, cheaply shared list of sources. Replaced wholesale on change.
pub type SourceList = Arc<Vec<SourceEntry>>;

/// Find a source by exact name.
pub fn find_source<'a>(sources: &'a [SourceEntry], name: &str) -> Option<&'a SourceEntry> {
    sources.iter().find(|s| s.name == name)
}

// ── Dialects ────────────────────────────────────────────────────────

/// Text formats accepted for the source map, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SourceMapDialect {
    Yaml,
    Json,
}

impl SourceMapDialect {
    /// Decode `input` and return its `sources` sequence, if this dialect
    /// reads it as a mapping holding one.
    fn sources(self, input: &str) -> Option<Vec<Value>> {
        let decoded: Value = match self {
            Self::Yaml => serde_yaml::from_str(input)
                .map_err(|e| debug!(dialect = %self, error = %e, "source map not decodable"))
                .ok()?,
            Self::Json => serde_json::from_str(input)
                .map_err(|e| debug!(dialect = %self, error = %e, "source map not decodable"))
                .ok()?,
        };

        match decoded {
            Value::Object(mut map) => take_sources(&mut map),
            _ => None,
        }
    }
}

fn take_sources(map: &mut Map<String, Value>) -> Option<Vec<Value>> {
    match map.remove("sources")? {
        Value::Array(entries) => Some(entries),
        _ => None,
    }
}

// ── Parsing ─────────────────────────────────────────────────────────

/// Parse a source map into its valid entries.
///
/// Blank input is an empty list. Otherwise each dialect is tried in turn
/// and the first one yielding a `sources` sequence wins; entries that fail
/// validation are dropped individually.
pub fn parse_source_map(input: &str) -> Vec<SourceEntry> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    let Some((dialect, raw)) = SourceMapDialect::iter()
        .find_map(|dialect| dialect.sources(input).map(|raw| (dialect, raw)))
    else {
        warn!("source map is neither YAML nor JSON with a `sources` list; ignoring it");
        return Vec::new();
    };

    let total = raw.len();
    let entries: Vec<SourceEntry> = raw.iter().filter_map(SourceEntry::from_value).collect();
    if entries.len() < total {
        warn!(
            dropped = total - entries.len(),
            kept = entries.len(),
            "source map entries without valid name/group/prog were dropped"
        );
    }
    debug!(%dialect, count = entries.len(), "source map parsed");
    entries
}

/// Parse an optional source map into a shareable list.
pub fn source_list(input: Option<&str>) -> SourceList {
    Arc::new(input.map(parse_source_map).unwrap_or_default())
}

// ── Coercion ────────────────────────────────────────────────────────

/// Integers, integral floats and trimmed integer strings. Booleans are not
/// numbers here.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .and_then(float_to_i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn float_to_i64(f: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, hence the strict upper bound.
    (f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

fn coerce_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => s.trim().to_owned(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!name.is_empty()).then_some(name)
}
