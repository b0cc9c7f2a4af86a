//! Caller-facing logger facade
//!
//! Owns the sink set, performs level gating and dispatch, and rebuilds the
//! sink set atomically when the active level changes at runtime. Records
//! are stamped with the raw engine fields here and handed to each sink for
//! full normalization.

use super::error::{LoggerError, Result};
use super::level::LogLevel;
use super::message::{Message, MessagePayload};
use super::normalizer::{NormalizeMode, Normalizer, ProcessTags};
use super::options::{LoggerOptions, RemoteScope};
use super::record::{self, keys, Record};
use super::sink::Sink;
use crate::sinks::{BufferedFileSink, ConsoleFormat, ConsoleSink};
use parking_lot::RwLock;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// File name of the append-only log inside the configured directory.
const LOG_FILE_NAME: &str = "service-log.json";

struct BoundSink {
    threshold: LogLevel,
    sink: Arc<dyn Sink>,
}

/// Immutable sink configuration. Level changes build a fresh set and swap
/// it behind one indirection; calls in flight finish on the old set.
struct SinkSet {
    level: LogLevel,
    skip_noisy: bool,
    sinks: Vec<BoundSink>,
}

pub struct ServiceLogger {
    options: LoggerOptions,
    name: String,
    silence: bool,
    tags: ProcessTags,
    sinks: RwLock<Arc<SinkSet>>,
}

impl ServiceLogger {
    /// Construct a logger from its options.
    ///
    /// Construction never fails: an invalid severity name falls back to
    /// INFO with a warning, and a file sink that cannot be opened degrades
    /// to console-only operation. Logging configuration must not prevent
    /// the process from starting.
    pub fn new(options: LoggerOptions) -> Self {
        let level = match options.level.as_deref() {
            Some(requested) => requested.parse::<LogLevel>().unwrap_or_else(|_| {
                eprintln!(
                    "[service_logger] level is not a supported severity: {}, defaulting to INFO.",
                    requested
                );
                LogLevel::Info
            }),
            None => {
                if options.production {
                    LogLevel::Warn
                } else {
                    LogLevel::Debug
                }
            }
        };

        let name = options.name.clone().unwrap_or_else(|| {
            if options.production {
                "prod".to_string()
            } else {
                "dev".to_string()
            }
        });

        let skip_noisy = options.silence
            || (options.production && !matches!(level, LogLevel::Trace | LogLevel::Debug));

        // storage bootstrap happens once here, never on a sink-set rebuild
        if !options.container_mode {
            if let Err(e) = prepare_log_dir(&options.log_dir) {
                eprintln!(
                    "[service_logger] could not prepare log directory '{}': {}",
                    options.log_dir.display(),
                    e
                );
            }
        }

        let sinks = build_sink_set(&options, level, skip_noisy);
        let logger = Self {
            silence: options.silence,
            tags: ProcessTags::capture(),
            name,
            sinks: RwLock::new(Arc::new(sinks)),
            options,
        };

        logger.emit(
            LogLevel::Info,
            Message::Text(format!(
                "[service_logger] Logger is: in-prod={}, in-container={}, level={}, skip_noisy={}",
                logger.options.production, logger.options.container_mode, level, skip_noisy
            )),
            Record::new(),
        );

        logger
    }

    pub fn options(&self) -> &LoggerOptions {
        &self.options
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_silenced(&self) -> bool {
        self.silence
    }

    /// The currently active minimum level.
    pub fn level(&self) -> LogLevel {
        self.sinks.read().level
    }

    /// Whether trace/debug calls are currently short-circuited.
    pub fn skips_noisy(&self) -> bool {
        self.sinks.read().skip_noisy
    }

    #[inline]
    pub fn trace(&self, message: impl Into<Message>) {
        self.trace_with(message, Record::new());
    }

    pub fn trace_with(&self, message: impl Into<Message>, fields: Record) {
        if self.silence || self.skips_noisy() {
            return;
        }
        self.emit(LogLevel::Trace, message.into(), fields);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<Message>) {
        self.debug_with(message, Record::new());
    }

    pub fn debug_with(&self, message: impl Into<Message>, fields: Record) {
        if self.silence || self.skips_noisy() {
            return;
        }
        self.emit(LogLevel::Debug, message.into(), fields);
    }

    #[inline]
    pub fn info(&self, message: impl Into<Message>) {
        self.info_with(message, Record::new());
    }

    pub fn info_with(&self, message: impl Into<Message>, fields: Record) {
        if self.silence {
            return;
        }
        self.emit(LogLevel::Info, message.into(), fields);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<Message>) {
        self.warn_with(message, Record::new());
    }

    pub fn warn_with(&self, message: impl Into<Message>, fields: Record) {
        if self.silence {
            return;
        }
        self.emit(LogLevel::Warn, message.into(), fields);
    }

    #[inline]
    pub fn error(&self, message: impl Into<Message>) {
        self.error_with(message, Record::new());
    }

    pub fn error_with(&self, message: impl Into<Message>, fields: Record) {
        if self.silence {
            return;
        }
        self.emit(LogLevel::Error, message.into(), fields);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<Message>) {
        self.fatal_with(message, Record::new());
    }

    pub fn fatal_with(&self, message: impl Into<Message>, fields: Record) {
        if self.silence {
            return;
        }
        self.emit(LogLevel::Fatal, message.into(), fields);
    }

    /// Generic entry point; applies the same gating as the per-level calls.
    pub fn log(&self, level: LogLevel, message: impl Into<Message>) {
        match level {
            LogLevel::Trace => self.trace(message),
            LogLevel::Debug => self.debug(message),
            LogLevel::Info => self.info(message),
            LogLevel::Warn => self.warn(message),
            LogLevel::Error => self.error(message),
            LogLevel::Fatal => self.fatal(message),
        }
    }

    /// Change the active level at runtime.
    ///
    /// An unsupported severity name aborts the transition (logged, current
    /// level retained). On success the whole sink set is rebuilt at the new
    /// level and swapped in atomically.
    pub fn change_level(&self, level: &str) {
        let new_level = match level.parse::<LogLevel>() {
            Ok(level) => level,
            Err(_) => {
                self.error(format!(
                    "[service_logger] level is not a supported severity: {}.",
                    level
                ));
                return;
            }
        };

        let current = self.level();
        self.info(format!(
            "[service_logger] changing level from {} to {}.",
            current, new_level
        ));

        let skip_noisy = !matches!(new_level, LogLevel::Trace | LogLevel::Debug);
        let set = build_sink_set(&self.options, new_level, skip_noisy);
        *self.sinks.write() = Arc::new(set);
    }

    /// Derive a view that merges fixed extra fields into every call.
    ///
    /// Purely a field-composition decorator: the child shares the parent's
    /// sinks and level, and the parent's own output is unaffected.
    pub fn create_child(&self, defaults: Record) -> ChildLogger<'_> {
        ChildLogger {
            parent: self,
            defaults,
        }
    }

    /// Write a caller-supplied record directly to every sink, bypassing
    /// the level machinery.
    ///
    /// `pre_normalized` asserts the record is already canonical (no
    /// normalization at all); otherwise missing defaults are backfilled.
    /// Handing anything but a JSON object here is a contract violation and
    /// yields a hard error.
    pub fn raw(&self, record: Value, pre_normalized: bool) -> Result<()> {
        let record = match record {
            Value::Object(record) => record,
            other => return Err(LoggerError::not_a_record(&other)),
        };
        if self.silence {
            return Ok(());
        }

        let mode = if pre_normalized {
            NormalizeMode::None
        } else {
            NormalizeMode::Adapt
        };

        let set = Arc::clone(&self.sinks.read());
        for bound in &set.sinks {
            if let Err(e) = bound.sink.write(record.clone(), mode) {
                eprintln!("[service_logger] sink '{}' failed: {}", bound.sink.name(), e);
            }
        }
        Ok(())
    }

    /// Access-log record builder for this logger's configured service name.
    pub fn access_logger(&self) -> crate::access::AccessLogger {
        crate::access::AccessLogger::new(self.options.service_name.clone())
    }

    /// Flush every sink.
    pub fn flush(&self) -> Result<()> {
        let set = Arc::clone(&self.sinks.read());
        for bound in &set.sinks {
            bound.sink.flush()?;
        }
        Ok(())
    }

    fn emit(&self, level: LogLevel, message: Message, mut fields: Record) {
        let set = Arc::clone(&self.sinks.read());
        if !set.sinks.iter().any(|bound| level >= bound.threshold) {
            return;
        }

        if let Some(resolver) = &self.options.caller {
            let caller = resolver.resolve().unwrap_or_else(|| "error".to_string());
            fields.insert(keys::CALLER.into(), Value::String(caller));
        }

        let record = self.engine_record(level, message, fields);
        for bound in &set.sinks {
            if level < bound.threshold {
                continue;
            }
            if let Err(e) = bound.sink.write(record.clone(), NormalizeMode::Alter) {
                eprintln!("[service_logger] sink '{}' failed: {}", bound.sink.name(), e);
            }
        }
    }

    /// The raw engine-emitted shape sinks expect for full normalization.
    fn engine_record(&self, level: LogLevel, message: Message, fields: Record) -> Record {
        let mut record = Record::new();
        record.insert(
            keys::ENGINE_TIME.into(),
            Value::String(record::now_iso8601()),
        );
        record.insert(
            keys::ENGINE_HOSTNAME.into(),
            Value::String(self.tags.host.clone()),
        );
        record.insert(keys::PID.into(), Value::Number(self.tags.pid.into()));
        record.insert(keys::ENGINE_NAME.into(), Value::String(self.name.clone()));
        record.insert(keys::ENGINE_VERSION.into(), Value::Number(0.into()));
        record.insert(keys::ENGINE_LEVEL.into(), Value::Number(level.rank().into()));
        for (key, value) in fields {
            record.insert(key, value);
        }
        match message.into_payload() {
            MessagePayload::Plain(text) => {
                record.insert(keys::MSG.into(), Value::String(text));
            }
            MessagePayload::Json(payload) => {
                record.insert(keys::MSG_JSON.into(), payload);
            }
        }
        record
    }
}

/// Derived facade view auto-merging fixed fields into every call.
///
/// The child's fields win over same-named per-call fields; they act as
/// identity tags for whatever scope the child represents.
pub struct ChildLogger<'a> {
    parent: &'a ServiceLogger,
    defaults: Record,
}

impl ChildLogger<'_> {
    pub fn trace(&self, message: impl Into<Message>) {
        self.trace_with(message, Record::new());
    }

    pub fn trace_with(&self, message: impl Into<Message>, fields: Record) {
        self.parent.trace_with(message, self.merged(fields));
    }

    pub fn debug(&self, message: impl Into<Message>) {
        self.debug_with(message, Record::new());
    }

    pub fn debug_with(&self, message: impl Into<Message>, fields: Record) {
        self.parent.debug_with(message, self.merged(fields));
    }

    pub fn info(&self, message: impl Into<Message>) {
        self.info_with(message, Record::new());
    }

    pub fn info_with(&self, message: impl Into<Message>, fields: Record) {
        self.parent.info_with(message, self.merged(fields));
    }

    pub fn warn(&self, message: impl Into<Message>) {
        self.warn_with(message, Record::new());
    }

    pub fn warn_with(&self, message: impl Into<Message>, fields: Record) {
        self.parent.warn_with(message, self.merged(fields));
    }

    pub fn error(&self, message: impl Into<Message>) {
        self.error_with(message, Record::new());
    }

    pub fn error_with(&self, message: impl Into<Message>, fields: Record) {
        self.parent.error_with(message, self.merged(fields));
    }

    pub fn fatal(&self, message: impl Into<Message>) {
        self.fatal_with(message, Record::new());
    }

    pub fn fatal_with(&self, message: impl Into<Message>, fields: Record) {
        self.parent.fatal_with(message, self.merged(fields));
    }

    fn merged(&self, mut fields: Record) -> Record {
        for (key, value) in &self.defaults {
            fields.insert(key.clone(), value.clone());
        }
        fields
    }
}

fn build_sink_set(options: &LoggerOptions, level: LogLevel, skip_noisy: bool) -> SinkSet {
    let mut sinks: Vec<BoundSink> = Vec::new();

    let push_local = |sinks: &mut Vec<BoundSink>| {
        let console_format = if options.container_mode {
            ConsoleFormat::Json
        } else {
            ConsoleFormat::Human
        };
        sinks.push(BoundSink {
            threshold: level,
            sink: Arc::new(ConsoleSink::new(
                Normalizer::new(options.static_fields.clone()),
                console_format,
            )),
        });

        if !options.container_mode {
            let path = options.log_dir.join(LOG_FILE_NAME);
            match BufferedFileSink::with_policy(
                &path,
                Normalizer::new(options.static_fields.clone()),
                options.flush_size,
                options.flush_timeout,
            ) {
                Ok(sink) => sinks.push(BoundSink {
                    threshold: level,
                    sink: Arc::new(sink),
                }),
                Err(e) => eprintln!(
                    "[service_logger] file sink unavailable ('{}'): {}, continuing console-only.",
                    path.display(),
                    e
                ),
            }
        }
    };

    match &options.remote {
        Some(remote) => match remote.factory.create(options) {
            Ok(sink) => {
                if remote.scope == RemoteScope::Mirror {
                    push_local(&mut sinks);
                }
                sinks.push(BoundSink {
                    threshold: level,
                    sink,
                });
            }
            Err(e) => {
                eprintln!(
                    "[service_logger] remote sink unavailable ({}), falling back to local sinks.",
                    e
                );
                push_local(&mut sinks);
            }
        },
        None => push_local(&mut sinks),
    }

    SinkSet {
        level,
        skip_noisy,
        sinks,
    }
}

/// One-time storage bootstrap: create the directory, or clear leftover
/// files from a previous run. Not performed again mid-run.
fn prepare_log_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        return std::fs::create_dir_all(dir);
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            let _ = std::fs::remove_file(&path);
        }
    }
    Ok(())
}
