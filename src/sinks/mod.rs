//! Sink implementations

pub mod buffer;
pub mod console;
pub mod file;
pub mod multi;

pub use buffer::BufferSink;
pub use console::{ConsoleSink, ConsoleStream};
pub use file::FileSink;
pub use multi::MultiSink;

pub use crate::core::Sink;
