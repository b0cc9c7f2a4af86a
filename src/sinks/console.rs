//! Console sink
//!
//! Renders every accepted record immediately, either as a colorized human
//! line or as a single structured JSON line. The shape is fixed when the
//! sink is built, not per call.

use crate::core::record::keys;
use crate::core::{LogLevel, NormalizeMode, Normalizer, Record, Result, Sink};
use colored::Colorize;
use serde_json::Value;
use std::io::Write;

/// How a record is rendered on the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleFormat {
    /// `LEVEL @ timestamp : message` line.
    #[default]
    Human,
    /// The whole record as one JSON line.
    Json,
}

pub struct ConsoleSink {
    normalizer: Normalizer,
    format: ConsoleFormat,
}

impl ConsoleSink {
    pub fn new(normalizer: Normalizer, format: ConsoleFormat) -> Self {
        Self { normalizer, format }
    }
}

impl Sink for ConsoleSink {
    fn write(&self, record: Record, mode: NormalizeMode) -> Result<()> {
        let record = match self.normalizer.apply(record, mode) {
            Ok(record) => record,
            Err(e) => {
                eprintln!("[service_logger] dropped record after normalization failure: {}", e);
                return Ok(());
            }
        };

        let line = match self.format {
            ConsoleFormat::Human => render_human(&record),
            ConsoleFormat::Json => serde_json::to_string(&record)?,
        };
        let rank = record_rank(&record);
        let line = line.color(LogLevel::color_for_rank(rank));

        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Severity rank of a normalized record, 0 when absent.
fn record_rank(record: &Record) -> i64 {
    record
        .get(keys::LOGLEVEL_VALUE)
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

/// The human console line: `LEVEL @ timestamp : message`.
pub(crate) fn render_human(record: &Record) -> String {
    let rank = record_rank(record);
    let timestamp = record
        .get(keys::TIMESTAMP)
        .and_then(Value::as_str)
        .unwrap_or_default();
    let message = match record.get(keys::MSG) {
        Some(Value::String(text)) => text.clone(),
        _ => record
            .get(keys::MSG_JSON)
            .map(|payload| payload.to_string())
            .unwrap_or_default(),
    };
    format!(
        "{} @ {} : {}",
        LogLevel::name_for_rank(rank),
        timestamp,
        message
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalizer::ProcessTags;
    use serde_json::json;

    fn normalizer() -> Normalizer {
        Normalizer::with_tags(
            Record::new(),
            ProcessTags {
                host: "test-host".into(),
                pid: 1,
                service_color: None,
            },
        )
    }

    fn warn_record(msg: &str) -> Record {
        let mut record = Record::new();
        record.insert("@timestamp".into(), json!("2026-01-01T12:00:00.000Z"));
        record.insert("loglevel".into(), json!("WARN"));
        record.insert("loglevel_value".into(), json!(40));
        record.insert("msg".into(), json!(msg));
        record
    }

    #[test]
    fn test_render_human_text_message() {
        let line = render_human(&warn_record("disk almost full"));
        assert_eq!(line, "WARN @ 2026-01-01T12:00:00.000Z : disk almost full");
    }

    #[test]
    fn test_render_human_structured_message() {
        let mut record = warn_record("");
        record.remove("msg");
        record.insert("msg_json".into(), json!({"disk": "sda1"}));
        let line = render_human(&record);
        assert!(line.starts_with("WARN @ "));
        assert!(line.contains(r#"{"disk":"sda1"}"#));
    }

    #[test]
    fn test_render_human_unknown_rank() {
        let mut record = warn_record("odd");
        record.insert("loglevel_value".into(), json!(35));
        assert!(render_human(&record).starts_with("UNKNOWN @ "));
    }

    #[test]
    fn test_write_survives_malformed_record() {
        // a non-numeric rank fails full normalization; the sink must
        // swallow it rather than error out of the dispatch loop
        let sink = ConsoleSink::new(normalizer(), ConsoleFormat::Json);
        let mut record = Record::new();
        record.insert("level".into(), json!("forty"));
        assert!(sink.write(record, NormalizeMode::Alter).is_ok());
    }
}
