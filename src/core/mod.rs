//! Core facade types and traits

pub mod caller;
pub mod error;
pub mod facade;
pub mod level;
pub mod message;
pub mod normalizer;
pub mod options;
pub mod record;
pub mod registry;
pub mod sink;

pub use caller::{CallerResolver, StackCaller};
pub use error::{LoggerError, Result};
pub use facade::{ChildLogger, ServiceLogger};
pub use level::LogLevel;
pub use message::Message;
pub use normalizer::{NormalizeMode, Normalizer, ProcessTags};
pub use options::{LoggerOptions, LoggerOptionsBuilder, RemoteConfig, RemoteScope, RemoteSinkFactory};
pub use record::{Record, EMPTY_MESSAGE};
pub use registry::LoggerRegistry;
pub use sink::Sink;
