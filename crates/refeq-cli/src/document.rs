//! Loading JSON and TOML documents into value graphs.
//!
//! Strings holding an RFC 3339 timestamp and TOML datetimes become
//! temporal values so lenient date comparison has something to act on.

use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use refeq_engine::EngineConfig;
use refeq_types::{Introspect, Temporal, Value};

/// Document syntax, chosen by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Syntax {
    Json,
    Toml,
}

impl Syntax {
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

pub fn load(path: &Path) -> anyhow::Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let syntax = Syntax::of(path);
    debug!(path = %path.display(), ?syntax, "loading document");
    parse(&text, syntax).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse(text: &str, syntax: Syntax) -> anyhow::Result<Value> {
    match syntax {
        Syntax::Json => {
            let doc: serde_json::Value = serde_json::from_str(text)?;
            Ok(from_json(&doc))
        }
        Syntax::Toml => {
            let doc: toml::Value = toml::from_str(text)?;
            Ok(from_toml(&doc))
        }
    }
}

/// Engine configuration from a TOML file, or the default when no file is
/// given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn from_json(doc: &serde_json::Value) -> Value {
    match doc {
        serde_json::Value::String(s) => Temporal::parse_rfc3339(s)
            .map_or_else(|| Value::from(s.as_str()), Value::Temporal),
        serde_json::Value::Array(items) => Value::list(items.iter().map(from_json)),
        serde_json::Value::Object(fields) => Value::map(
            fields
                .iter()
                .map(|(k, v)| (Value::from(k.as_str()), from_json(v))),
        ),
        scalar => scalar.introspect(),
    }
}

fn from_toml(doc: &toml::Value) -> Value {
    match doc {
        toml::Value::String(s) => Value::from(s.as_str()),
        toml::Value::Integer(i) => Value::Int(*i),
        toml::Value::Float(f) => Value::Float(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(dt) => datetime(&dt.to_string()),
        toml::Value::Array(items) => Value::list(items.iter().map(from_toml)),
        toml::Value::Table(table) => Value::map(
            table
                .iter()
                .map(|(k, v)| (Value::from(k.as_str()), from_toml(v))),
        ),
    }
}

// TOML datetimes come in four flavours: offset, local datetime, local date
// and local time.
fn datetime(text: &str) -> Value {
    if let Some(t) = Temporal::parse_rfc3339(text) {
        return Value::Temporal(t);
    }
    if let Ok(dt) = text.parse::<NaiveDateTime>() {
        return dt.introspect();
    }
    if let Ok(date) = text.parse::<NaiveDate>() {
        return date.introspect();
    }
    if let Ok(time) = text.parse::<NaiveTime>() {
        return time.introspect();
    }
    Value::from(text)
}
