//! Canonical record shape and field names
//!
//! A record is a plain JSON object. After normalization it is
//! self-describing ELK-style JSON: no knowledge of the emitting engine is
//! needed to read it.

use chrono::Utc;
use serde_json::{Map, Value};

/// The wire/disk form of a log record.
pub type Record = Map<String, Value>;

/// Canonical and engine-internal field names.
pub mod keys {
    pub const TIMESTAMP: &str = "@timestamp";
    pub const HOST: &str = "host";
    pub const PID: &str = "pid";
    pub const LOGLEVEL: &str = "loglevel";
    pub const LOGLEVEL_VALUE: &str = "loglevel_value";
    pub const LOG_TYPE: &str = "log_type";
    pub const APPLICATION_TYPE: &str = "application_type";
    pub const SERVICE: &str = "service";
    pub const CURRENT_COLOR: &str = "current_color";
    pub const MSG: &str = "msg";
    pub const MSG_JSON: &str = "msg_json";
    pub const CALLER: &str = "caller";

    // raw fields the engine stamps before dispatch; stripped or renamed
    // during full normalization
    pub const ENGINE_TIME: &str = "time";
    pub const ENGINE_HOSTNAME: &str = "hostname";
    pub const ENGINE_VERSION: &str = "v";
    pub const ENGINE_NAME: &str = "name";
    pub const ENGINE_LEVEL: &str = "level";
}

/// Sentinel message for records that carry neither `msg` nor `msg_json`.
pub const EMPTY_MESSAGE: &str = "[service_logger] empty.";

/// Current time in the canonical `@timestamp` shape.
pub fn now_iso8601() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Parses a message string as an embedded JSON payload.
///
/// Only object and array documents qualify for `msg_json` promotion;
/// scalars ("3", "true", quoted strings) stay plain text.
pub fn parse_json_payload(raw: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}
