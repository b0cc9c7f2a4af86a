//! Property-based tests for service_logger using proptest

use proptest::prelude::*;
use serde_json::{json, Value};
use service_logger::core::normalizer::{NormalizeMode, Normalizer, ProcessTags};
use service_logger::core::record::Record;
use service_logger::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Trace),
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Fatal),
    ]
}

fn test_normalizer() -> Normalizer {
    Normalizer::with_tags(
        Record::new(),
        ProcessTags {
            host: "prop-host".into(),
            pid: 1,
            service_color: None,
        },
    )
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// String conversions roundtrip for every recognized severity
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let as_str = level.to_str();
        let parsed: LogLevel = as_str.parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Rank conversions roundtrip for every recognized severity
    #[test]
    fn test_log_level_rank_roundtrip(level in any_level()) {
        prop_assert_eq!(LogLevel::from_rank(level.rank()), Some(level));
        prop_assert_eq!(LogLevel::name_for_rank(level.rank()), level.to_str());
    }

    /// Every rank outside the table maps to UNKNOWN
    #[test]
    fn test_foreign_ranks_are_unknown(rank in any::<i64>()) {
        let in_table = matches!(rank, 10 | 20 | 30 | 40 | 50 | 60);
        if in_table {
            prop_assert_ne!(LogLevel::name_for_rank(rank), "UNKNOWN");
        } else {
            prop_assert_eq!(LogLevel::name_for_rank(rank), "UNKNOWN");
            prop_assert!(LogLevel::from_rank(rank).is_none());
        }
    }

    /// Ordering is consistent with ranks
    #[test]
    fn test_log_level_ordering(level1 in any_level(), level2 in any_level()) {
        prop_assert_eq!(level1 <= level2, level1.rank() <= level2.rank());
        prop_assert_eq!(level1 < level2, level1.rank() < level2.rank());
    }
}

// ============================================================================
// Normalization Invariants
// ============================================================================

fn arbitrary_partial_record() -> impl Strategy<Value = Record> {
    (
        proptest::option::of("[a-z]{1,12}"),
        proptest::option::of(any_level()),
        proptest::option::of(proptest::bool::ANY),
        proptest::option::of(0u32..100),
    )
        .prop_map(|(msg, level, structured, extra)| {
            let mut record = Record::new();
            if let Some(msg) = msg {
                record.insert("msg".into(), json!(msg));
            }
            if let Some(level) = level {
                record.insert("loglevel".into(), json!(level.to_str()));
                record.insert("loglevel_value".into(), json!(level.rank()));
            }
            if structured == Some(true) {
                record.insert("msg_json".into(), json!({"flag": true}));
            }
            if let Some(extra) = extra {
                record.insert("attempt".into(), json!(extra));
            }
            record
        })
}

proptest! {
    /// Applying ADAPT twice yields the same record as applying it once
    #[test]
    fn test_adapt_is_idempotent(record in arbitrary_partial_record()) {
        let normalizer = test_normalizer();
        let once = normalizer.adapt(record);
        let twice = normalizer.adapt(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// Exactly one of msg/msg_json survives backfill, never both or neither
    #[test]
    fn test_exactly_one_message_field(record in arbitrary_partial_record()) {
        let normalizer = test_normalizer();
        let record = normalizer.adapt(record);
        let has_msg = record.contains_key("msg");
        let has_msg_json = record.contains_key("msg_json");
        prop_assert!(has_msg ^ has_msg_json);
    }

    /// Full normalization of an engine record never leaves engine artifacts
    /// and always yields a record that passes backfill untouched
    #[test]
    fn test_alter_output_is_stable(msg in ".{0,40}", level in any_level()) {
        let normalizer = test_normalizer();
        let mut raw = Record::new();
        raw.insert("time".into(), json!("2026-01-01T00:00:00.000Z"));
        raw.insert("hostname".into(), json!("raw-host"));
        raw.insert("v".into(), json!(0));
        raw.insert("name".into(), json!("dev"));
        raw.insert("level".into(), json!(level.rank()));
        raw.insert("msg".into(), json!(msg));

        let altered = normalizer.alter(raw).unwrap();
        for artifact in ["time", "hostname", "v", "name", "level"] {
            prop_assert!(!altered.contains_key(artifact));
        }
        prop_assert_eq!(&altered["loglevel"], &json!(level.to_str()));

        let readapted = normalizer.adapt(altered.clone());
        prop_assert_eq!(altered, readapted);
    }

    /// Normalized records always serialize to valid single-line JSON
    #[test]
    fn test_records_serialize_to_one_line(record in arbitrary_partial_record()) {
        let normalizer = test_normalizer();
        let record = normalizer.apply(record, NormalizeMode::Adapt).unwrap();
        let line = serde_json::to_string(&record).unwrap();
        prop_assert!(!line.contains('\n'));
        let parsed: Value = serde_json::from_str(&line).unwrap();
        prop_assert!(parsed.is_object());
    }
}
