//! Sink trait for encoded record destinations

use super::error::Result;

/// Destination for encoded records
///
/// Sinks are shared between threads, so each implementation serializes its
/// own writers: one call to `write_record` never interleaves with another.
pub trait Sink: Send + Sync {
    /// Write one complete, newline-terminated record
    fn write_record(&self, record: &[u8]) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
