//! HTTP access-log records
//!
//! Framework-agnostic: the web layer hands over the request/response facts
//! and receives one normalized access record per request, shaped like the
//! application records so both land in the same index. Feed the result to
//! [`ServiceLogger::raw`](crate::core::ServiceLogger::raw) or serialize it
//! directly.

use crate::core::normalizer::ProcessTags;
use crate::core::record::{keys, now_iso8601, Record};
use serde_json::{Number, Value};
use std::collections::HashMap;

/// Client identifier headers, most authoritative first.
const CLIENT_ID_HEADERS: [&str; 3] = ["auth-info-user-id", "customer-uuid", "customeruuid"];

const CORRELATION_HEADER: &str = "correlation-id";

/// Extractor failures surface as this sentinel instead of breaking the line.
const FAILED_FIELD: &str = "error";

/// The request/response facts an access record is built from.
///
/// Header names are expected lowercased, as HTTP/2-style frameworks
/// deliver them.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    pub remote_address: String,
    pub method: String,
    pub uri: String,
    pub query_string: Option<String>,
    pub status: u16,
    pub response_time_ms: f64,
    pub secure: bool,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl RequestInfo {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Caller-supplied per-request field extractor.
pub type FieldExtractor = Box<dyn Fn(&RequestInfo) -> Option<String> + Send + Sync>;

/// Builds one normalized access record per request.
pub struct AccessLogger {
    service: String,
    host: String,
    color: String,
    extras: Vec<(String, FieldExtractor)>,
}

impl AccessLogger {
    pub fn new(service_name: impl Into<String>) -> Self {
        let tags = ProcessTags::capture();
        Self {
            service: service_name.into(),
            host: tags.host,
            color: tags.service_color.unwrap_or_else(|| "unknown".to_string()),
            extras: Vec::new(),
        }
    }

    /// Add a caller-supplied field, appended before the final byte-count
    /// field. An extractor returning `None` records the failure sentinel.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, extractor: FieldExtractor) -> Self {
        self.extras.push((name.into(), extractor));
        self
    }

    /// Build the access record for one handled request.
    pub fn record(&self, request: &RequestInfo) -> Record {
        let mut record = Record::new();
        record.insert(keys::TIMESTAMP.into(), Value::String(now_iso8601()));
        record.insert(keys::HOST.into(), Value::String(self.host.clone()));
        record.insert(keys::LOGLEVEL.into(), Value::String("INFO".into()));
        record.insert(
            CORRELATION_HEADER.into(),
            Value::String(request.header(CORRELATION_HEADER).unwrap_or("").to_string()),
        );
        record.insert(keys::APPLICATION_TYPE.into(), Value::String("service".into()));
        record.insert(keys::LOG_TYPE.into(), Value::String("access".into()));
        record.insert(keys::SERVICE.into(), Value::String(self.service.clone()));
        record.insert(
            "remote_address".into(),
            Value::String(request.remote_address.clone()),
        );
        record.insert("status".into(), Value::Number(request.status.into()));
        record.insert("request_method".into(), Value::String(request.method.clone()));
        record.insert("uri".into(), Value::String(request.uri.clone()));
        record.insert(
            "query_string".into(),
            Value::String(request.query_string.clone().unwrap_or_default()),
        );
        record.insert(
            "response_time".into(),
            Number::from_f64(request.response_time_ms)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(FAILED_FIELD.into())),
        );
        record.insert(
            "protocol".into(),
            Value::String(if request.secure { "HTTPS" } else { "HTTP" }.into()),
        );
        record.insert(
            "server_name".into(),
            Value::String(request.header("host").unwrap_or("unknown").to_string()),
        );
        record.insert(keys::CURRENT_COLOR.into(), Value::String(self.color.clone()));
        record.insert(
            "remote_client_id".into(),
            Value::String(resolve_client_id(request)),
        );
        record.insert(
            "user_agent".into(),
            Value::String(request.header("user-agent").unwrap_or("").to_string()),
        );
        for (name, extractor) in &self.extras {
            let value = extractor(request).unwrap_or_else(|| FAILED_FIELD.to_string());
            record.insert(name.clone(), Value::String(value));
        }
        record.insert(
            "bytes_received".into(),
            Value::Number(bytes_received(request).into()),
        );
        record
    }

    /// The record serialized as one JSON line.
    pub fn line(&self, request: &RequestInfo) -> String {
        Value::Object(self.record(request)).to_string()
    }
}

/// First present header from the priority list, `"unknown"` otherwise.
fn resolve_client_id(request: &RequestInfo) -> String {
    for header in CLIENT_ID_HEADERS {
        if let Some(value) = request.header(header) {
            if !value.is_empty() {
                return value.to_string();
            }
        }
    }
    "unknown".to_string()
}

fn bytes_received(request: &RequestInfo) -> u64 {
    request
        .body
        .as_ref()
        .map(|body| body.len() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RequestInfo {
        RequestInfo {
            remote_address: "10.0.0.9".into(),
            method: "GET".into(),
            uri: "/orders".into(),
            query_string: Some("page=2".into()),
            status: 200,
            response_time_ms: 12.5,
            secure: true,
            headers: HashMap::from([
                ("host".to_string(), "api.internal".to_string()),
                ("user-agent".to_string(), "curl/8.0".to_string()),
                ("correlation-id".to_string(), "c-123".to_string()),
            ]),
            body: Some("{\"q\":1}".into()),
        }
    }

    #[test]
    fn test_fixed_field_set() {
        let record = AccessLogger::new("orders").record(&request());
        assert_eq!(record["log_type"], "access");
        assert_eq!(record["application_type"], "service");
        assert_eq!(record["service"], "orders");
        assert_eq!(record["loglevel"], "INFO");
        assert_eq!(record["remote_address"], "10.0.0.9");
        assert_eq!(record["status"], 200);
        assert_eq!(record["request_method"], "GET");
        assert_eq!(record["uri"], "/orders");
        assert_eq!(record["query_string"], "page=2");
        assert_eq!(record["response_time"], 12.5);
        assert_eq!(record["protocol"], "HTTPS");
        assert_eq!(record["server_name"], "api.internal");
        assert_eq!(record["correlation-id"], "c-123");
        assert_eq!(record["user_agent"], "curl/8.0");
        assert_eq!(record["bytes_received"], 7);
        assert!(record["@timestamp"].is_string());
    }

    #[test]
    fn test_client_id_priority() {
        let mut req = request();
        req.headers
            .insert("customeruuid".into(), "legacy".into());
        assert_eq!(resolve_client_id(&req), "legacy");

        req.headers
            .insert("customer-uuid".into(), "standard".into());
        assert_eq!(resolve_client_id(&req), "standard");

        req.headers
            .insert("auth-info-user-id".into(), "authoritative".into());
        assert_eq!(resolve_client_id(&req), "authoritative");
    }

    #[test]
    fn test_client_id_unknown_when_absent() {
        assert_eq!(resolve_client_id(&request()), "unknown");
    }

    #[test]
    fn test_extractor_failure_sentinel() {
        let logger = AccessLogger::new("orders")
            .with_field("tenant", Box::new(|req| req.header("x-tenant").map(String::from)))
            .with_field("broken", Box::new(|_| None));

        let record = logger.record(&request());
        assert_eq!(record["tenant"], "error");
        assert_eq!(record["broken"], "error");
    }

    #[test]
    fn test_extractor_success() {
        let logger = AccessLogger::new("orders")
            .with_field("agent_class", Box::new(|req| {
                req.header("user-agent").map(|ua| ua.split('/').next().unwrap_or("").to_string())
            }));

        let record = logger.record(&request());
        assert_eq!(record["agent_class"], "curl");
    }

    #[test]
    fn test_line_is_valid_json() {
        let line = AccessLogger::new("orders").line(&request());
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["log_type"], "access");
    }

    #[test]
    fn test_defaults_for_missing_request_facts() {
        let record = AccessLogger::new("orders").record(&RequestInfo::default());
        assert_eq!(record["query_string"], "");
        assert_eq!(record["server_name"], "unknown");
        assert_eq!(record["user_agent"], "");
        assert_eq!(record["protocol"], "HTTP");
        assert_eq!(record["bytes_received"], 0);
        assert_eq!(record["correlation-id"], "");
    }
}
