//! Facade configuration surface

use super::caller::CallerResolver;
use super::error::Result;
use super::record::Record;
use super::sink::Sink;
use crate::sinks::buffered_file::{DEFAULT_FLUSH_SIZE, DEFAULT_FLUSH_TIMEOUT};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Where records for a configured remote destination go relative to the
/// local sink set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteScope {
    /// Remote sink runs alongside the local sinks.
    Mirror,
    /// Remote sink replaces the local sinks.
    Replace,
}

/// Factory seam for an external logging destination.
///
/// Construction may fail; the facade logs a diagnostic and falls back to
/// its local sinks rather than leaving the process without a logger.
pub trait RemoteSinkFactory: Send + Sync {
    fn create(&self, options: &LoggerOptions) -> Result<Arc<dyn Sink>>;
}

#[derive(Clone)]
pub struct RemoteConfig {
    pub scope: RemoteScope,
    pub factory: Arc<dyn RemoteSinkFactory>,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Recognized configuration options for a logger instance.
#[derive(Clone)]
pub struct LoggerOptions {
    /// Logger name; defaults to "dev" or "prod" per the production flag.
    pub name: Option<String>,
    /// Drop every non-raw log call.
    pub silence: bool,
    /// Production deployments default to WARN instead of DEBUG.
    pub production: bool,
    /// Stdout-only deployment: structured console output, no file sink.
    pub container_mode: bool,
    /// Directory holding the append-only log file.
    pub log_dir: PathBuf,
    /// Registry slot this instance publishes itself under.
    pub var_key: String,
    /// Requested severity name; invalid names fall back to INFO with a
    /// warning, absent defaults depend on the production flag.
    pub level: Option<String>,
    /// Service name used by access-log records.
    pub service_name: String,
    /// Static per-instance fields applied to every record.
    pub static_fields: Record,
    /// Buffered file sink: flush when this many records are queued.
    pub flush_size: usize,
    /// Buffered file sink: flush after this much idle time.
    pub flush_timeout: Duration,
    /// Optional call-site capture strategy.
    pub caller: Option<Arc<dyn CallerResolver>>,
    /// Optional secondary destination.
    pub remote: Option<RemoteConfig>,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        Self {
            name: None,
            silence: false,
            production: false,
            container_mode: false,
            log_dir: PathBuf::from("logs"),
            var_key: "LOG".to_string(),
            level: None,
            service_name: "unknown".to_string(),
            static_fields: Record::new(),
            flush_size: DEFAULT_FLUSH_SIZE,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            caller: None,
            remote: None,
        }
    }
}

impl fmt::Debug for LoggerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOptions")
            .field("name", &self.name)
            .field("silence", &self.silence)
            .field("production", &self.production)
            .field("container_mode", &self.container_mode)
            .field("log_dir", &self.log_dir)
            .field("var_key", &self.var_key)
            .field("level", &self.level)
            .field("service_name", &self.service_name)
            .field("static_fields", &self.static_fields)
            .field("flush_size", &self.flush_size)
            .field("flush_timeout", &self.flush_timeout)
            .field("caller", &self.caller.is_some())
            .field("remote", &self.remote)
            .finish()
    }
}

impl LoggerOptions {
    #[must_use]
    pub fn builder() -> LoggerOptionsBuilder {
        LoggerOptionsBuilder::new()
    }
}

/// Builder for [`LoggerOptions`] with a fluent API
///
/// # Example
/// ```
/// use service_logger::LoggerOptions;
///
/// let options = LoggerOptions::builder()
///     .name("checkout")
///     .level("DEBUG")
///     .container_mode(true)
///     .static_field("service", "checkout")
///     .build();
/// ```
pub struct LoggerOptionsBuilder {
    options: LoggerOptions,
}

impl LoggerOptionsBuilder {
    pub fn new() -> Self {
        Self {
            options: LoggerOptions::default(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.options.name = Some(name.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn silence(mut self, silence: bool) -> Self {
        self.options.silence = silence;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn production(mut self, production: bool) -> Self {
        self.options.production = production;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn container_mode(mut self, container_mode: bool) -> Self {
        self.options.container_mode = container_mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.log_dir = dir.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn var_key(mut self, key: impl Into<String>) -> Self {
        self.options.var_key = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.options.level = Some(level.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn service_name(mut self, name: impl Into<String>) -> Self {
        self.options.service_name = name.into();
        self
    }

    /// Add one static field applied to every record.
    #[must_use = "builder methods return a new value"]
    pub fn static_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.static_fields.insert(key.into(), value.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_size(mut self, size: usize) -> Self {
        self.options.flush_size = size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_timeout(mut self, timeout: Duration) -> Self {
        self.options.flush_timeout = timeout;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller(mut self, resolver: Arc<dyn CallerResolver>) -> Self {
        self.options.caller = Some(resolver);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn remote(mut self, scope: RemoteScope, factory: Arc<dyn RemoteSinkFactory>) -> Self {
        self.options.remote = Some(RemoteConfig { scope, factory });
        self
    }

    pub fn build(self) -> LoggerOptions {
        self.options
    }
}

impl Default for LoggerOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = LoggerOptions::default();
        assert!(!options.silence);
        assert!(!options.production);
        assert!(!options.container_mode);
        assert_eq!(options.log_dir, PathBuf::from("logs"));
        assert_eq!(options.var_key, "LOG");
        assert_eq!(options.flush_size, DEFAULT_FLUSH_SIZE);
        assert_eq!(options.flush_timeout, DEFAULT_FLUSH_TIMEOUT);
        assert!(options.level.is_none());
    }

    #[test]
    fn test_builder() {
        let options = LoggerOptions::builder()
            .name("checkout")
            .silence(true)
            .production(true)
            .container_mode(true)
            .log_dir("/tmp/logs")
            .var_key("CHECKOUT_LOG")
            .level("WARN")
            .service_name("checkout")
            .static_field("service", "checkout")
            .static_field("team", json!("payments"))
            .flush_size(20)
            .flush_timeout(Duration::from_millis(250))
            .build();

        assert_eq!(options.name.as_deref(), Some("checkout"));
        assert!(options.silence);
        assert!(options.production);
        assert!(options.container_mode);
        assert_eq!(options.log_dir, PathBuf::from("/tmp/logs"));
        assert_eq!(options.var_key, "CHECKOUT_LOG");
        assert_eq!(options.level.as_deref(), Some("WARN"));
        assert_eq!(options.static_fields["service"], "checkout");
        assert_eq!(options.static_fields["team"], "payments");
        assert_eq!(options.flush_size, 20);
        assert_eq!(options.flush_timeout, Duration::from_millis(250));
    }
}
