//! Record normalization
//!
//! Turns raw engine output or caller-supplied records into the canonical
//! field set. Full normalization strips engine artifacts and renames rank
//! fields; defaults-only backfill fills whatever is still missing and is
//! idempotent. Both enforce that exactly one of `msg`/`msg_json` survives.

use super::error::{LoggerError, Result};
use super::level::LogLevel;
use super::record::{self, keys, Record};
use serde_json::Value;

/// How much reshaping a sink applies to an incoming record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizeMode {
    /// Full remap: strip engine artifacts, rename rank fields, promote
    /// embedded JSON messages, then backfill defaults.
    #[default]
    Alter,
    /// Backfill missing defaults only; present fields stay untouched.
    Adapt,
    /// Record is asserted canonical; pass through.
    None,
}

/// Process-wide identity stamped into records that lack it.
#[derive(Debug, Clone)]
pub struct ProcessTags {
    pub host: String,
    pub pid: i64,
    pub service_color: Option<String>,
}

impl ProcessTags {
    /// Capture the current process identity once.
    pub fn capture() -> Self {
        let host = std::env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "unknown-host".to_string());
        Self {
            host,
            pid: std::process::id() as i64,
            service_color: std::env::var("SERVICE_COLOR").ok(),
        }
    }
}

/// Correlation identifiers are hoisted out of promoted payloads so search
/// tooling indexes them at the top level.
const CORRELATION_KEYS: [&str; 3] = ["correlationId", "correlation-id", "correlation_id"];

/// Per-sink normalizer: process identity plus the static per-logger field
/// options applied to every record.
#[derive(Debug, Clone)]
pub struct Normalizer {
    tags: ProcessTags,
    static_fields: Record,
}

impl Normalizer {
    pub fn new(static_fields: Record) -> Self {
        Self {
            tags: ProcessTags::capture(),
            static_fields,
        }
    }

    /// Construct with explicit tags; used where deterministic identity is
    /// needed.
    pub fn with_tags(static_fields: Record, tags: ProcessTags) -> Self {
        Self {
            tags,
            static_fields,
        }
    }

    pub fn static_fields(&self) -> &Record {
        &self.static_fields
    }

    /// Apply the given normalization mode to a record.
    pub fn apply(&self, record: Record, mode: NormalizeMode) -> Result<Record> {
        match mode {
            NormalizeMode::Alter => self.alter(record),
            NormalizeMode::Adapt => Ok(self.adapt(record)),
            NormalizeMode::None => Ok(record),
        }
    }

    /// Full remap of an engine-emitted record.
    pub fn alter(&self, mut record: Record) -> Result<Record> {
        // engine artifacts carry no information the canonical fields lack
        record.remove(keys::ENGINE_TIME);
        record.remove(keys::ENGINE_HOSTNAME);
        record.remove(keys::ENGINE_VERSION);
        record.remove(keys::ENGINE_NAME);

        // level rank -> loglevel + loglevel_value
        if let Some(level) = record.remove(keys::ENGINE_LEVEL) {
            let rank = level
                .as_i64()
                .ok_or_else(|| LoggerError::malformed(keys::ENGINE_LEVEL, "rank is not numeric"))?;
            record.insert(
                keys::LOGLEVEL.into(),
                Value::String(LogLevel::name_for_rank(rank).to_string()),
            );
            record.insert(keys::LOGLEVEL_VALUE.into(), Value::Number(rank.into()));
        }

        // promote an embedded JSON message to msg_json
        if let Some(value) = record.get(keys::MSG) {
            let raw = match value {
                Value::String(raw) => raw.clone(),
                other => {
                    return Err(LoggerError::malformed(
                        keys::MSG,
                        format!("expected a string, got {}", json_kind(other)),
                    ))
                }
            };
            if let Some(payload) = record::parse_json_payload(&raw) {
                record.remove(keys::MSG);
                if let Some(payload) = hoist_indexed_fields(payload, &mut record) {
                    record.insert(keys::MSG_JSON.into(), payload);
                }
            }
        }

        // static field options are identity tags; they win over per-call values
        for (key, value) in &self.static_fields {
            record.insert(key.clone(), value.clone());
        }

        Ok(self.adapt(record))
    }

    /// Fill missing defaults only. Idempotent: a fully-populated record
    /// passes through unchanged.
    pub fn adapt(&self, mut record: Record) -> Record {
        if !record.contains_key(keys::TIMESTAMP) {
            record.insert(keys::TIMESTAMP.into(), Value::String(record::now_iso8601()));
        }
        if !record.contains_key(keys::HOST) {
            record.insert(keys::HOST.into(), Value::String(self.tags.host.clone()));
        }
        if !record.contains_key(keys::PID) {
            record.insert(keys::PID.into(), Value::Number(self.tags.pid.into()));
        }
        if !record.contains_key(keys::LOGLEVEL) {
            record.insert(
                keys::LOGLEVEL.into(),
                Value::String(LogLevel::Info.to_str().to_string()),
            );
        }
        if !record.contains_key(keys::LOGLEVEL_VALUE) {
            record.insert(
                keys::LOGLEVEL_VALUE.into(),
                Value::Number(LogLevel::Info.rank().into()),
            );
        }
        if !record.contains_key(keys::LOG_TYPE) {
            record.insert(keys::LOG_TYPE.into(), Value::String("application".into()));
        }
        if !record.contains_key(keys::APPLICATION_TYPE) {
            record.insert(keys::APPLICATION_TYPE.into(), Value::String("service".into()));
        }
        if !record.contains_key(keys::SERVICE) {
            if let Some(service) = self.static_fields.get(keys::SERVICE) {
                record.insert(keys::SERVICE.into(), service.clone());
            }
        }
        if !record.contains_key(keys::CURRENT_COLOR) {
            if let Some(color) = &self.tags.service_color {
                record.insert(keys::CURRENT_COLOR.into(), Value::String(color.clone()));
            }
        }
        if !record.contains_key(keys::MSG) && !record.contains_key(keys::MSG_JSON) {
            record.insert(keys::MSG.into(), Value::String(record::EMPTY_MESSAGE.into()));
        }
        // exactly one of msg/msg_json survives; the structured payload wins
        if record.contains_key(keys::MSG) && record.contains_key(keys::MSG_JSON) {
            record.remove(keys::MSG);
        }
        record
    }
}

/// Hoists correlation identifiers and an embedded plain `msg` out of a
/// promoted payload. Returns the payload to keep as `msg_json`, or `None`
/// when it collapsed entirely into top-level fields.
fn hoist_indexed_fields(payload: Value, record: &mut Record) -> Option<Value> {
    let mut payload = match payload {
        Value::Object(map) => map,
        other => return Some(other),
    };

    for key in CORRELATION_KEYS {
        if let Some(value) = payload.remove(key) {
            record.insert(key.to_string(), value);
        }
    }

    if let Some(Value::String(inner)) = payload.get(keys::MSG).cloned() {
        payload.remove(keys::MSG);
        record.insert(keys::MSG.into(), Value::String(inner));
    }

    if payload.is_empty() {
        None
    } else {
        Some(Value::Object(payload))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
