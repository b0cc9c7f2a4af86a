//! Sink trait for record destinations

use super::error::Result;
use super::normalizer::NormalizeMode;
use super::record::Record;

/// A configured record destination.
///
/// `write` must accept the raw engine-emitted shape, tolerate any
/// normalization mode, and never panic back into the dispatch loop.
/// Normalization failures are handled inside the sink (diagnostic + drop);
/// only delivery failures surface as errors.
pub trait Sink: Send + Sync {
    fn write(&self, record: Record, mode: NormalizeMode) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
