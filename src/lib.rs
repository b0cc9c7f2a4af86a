//! # Service Logger
//!
//! A structured-logging facade that normalizes heterogeneous log calls into
//! canonical ELK-style JSON records and delivers them to level-filtered
//! sinks.
//!
//! ## Features
//!
//! - **Canonical records**: every call becomes a self-describing JSON
//!   record with process and service identity filled in
//! - **Dual sinks**: an immediate console view (human or JSON line) plus a
//!   buffered append-only file sink with a size/idle flush policy
//! - **Fail-safe**: configuration mistakes and malformed records degrade
//!   with diagnostics, never a crash
//! - **Runtime control**: level changes swap the sink set atomically;
//!   child loggers tag every call with fixed fields

pub mod access;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::access::{AccessLogger, RequestInfo};
    pub use crate::core::{
        CallerResolver, ChildLogger, LoggerError, LoggerOptions, LoggerOptionsBuilder,
        LoggerRegistry, LogLevel, Message, NormalizeMode, Normalizer, ProcessTags, Record,
        RemoteConfig, RemoteScope, RemoteSinkFactory, Result, ServiceLogger, Sink, StackCaller,
    };
    pub use crate::sinks::{BufferedFileSink, ConsoleFormat, ConsoleSink};
}

pub use access::{AccessLogger, RequestInfo};
pub use core::{
    CallerResolver, ChildLogger, LoggerError, LoggerOptions, LoggerOptionsBuilder, LoggerRegistry,
    LogLevel, Message, NormalizeMode, Normalizer, ProcessTags, Record, RemoteConfig, RemoteScope,
    RemoteSinkFactory, Result, ServiceLogger, Sink, StackCaller,
};
pub use sinks::{BufferedFileSink, ConsoleFormat, ConsoleSink};
