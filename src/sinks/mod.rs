//! Sink implementations

pub mod buffered_file;
pub mod console;

pub use buffered_file::BufferedFileSink;
pub use console::{ConsoleFormat, ConsoleSink};

// Re-export the trait next to its implementations
pub use crate::core::Sink;
