//! Core types: levels, context, fields, masking, configuration and the
//! engine capability trait

pub mod config;
pub mod context;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod field;
pub mod log_level;
pub mod masking;
pub mod record;
pub mod sink;
pub mod timestamp;

pub use config::{Config, ConfigBuilder, EngineKind, ExitHandler, ResolvedConfig, StackMarshaller};
pub use context::CallContext;
pub use encoder::{ConsoleLayout, OutputFormat};
pub use engine::Engine;
pub use error::{LoggerError, Result};
pub use field::{build_fields, Field, Kv};
pub use log_level::LogLevel;
pub use masking::{default_mask, mask_sensitive, MaskFn};
pub use record::{Caller, Record};
pub use sink::Sink;
pub use timestamp::TimestampFormat;
