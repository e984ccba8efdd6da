//! # logfacade
//!
//! A backend-agnostic structured logging facade.
//!
//! Application code logs through one stable API (five levels, plain and
//! formatted variants) while the backend engine is chosen by configuration
//! and can be swapped at runtime.
//!
//! ## Features
//!
//! - **Request context**: request id, user info and source travel in an
//!   explicit [`CallContext`] and land on every record
//! - **Two engines**: a chained event builder and a typed field list, with
//!   identical filtering and field handling
//! - **Masking**: configured keys are masked at any depth of the metadata
//! - **Outputs**: JSON or console encodings, stdout/stderr, an append-only
//!   file, or both at once
//!
//! ```
//! use logfacade::{Config, CallContext, EngineKind, Logger, LogLevel, kv};
//!
//! let logger = Logger::new(
//!     Config::builder()
//!         .app_name("shop")
//!         .engine(EngineKind::Field)
//!         .level(LogLevel::Info)
//!         .mask_sensitive_data(["password"])
//!         .build(),
//! )
//! .unwrap();
//!
//! let ctx = CallContext::new().with_request_id("");
//! logger.info(Some(&ctx), None, Some(kv! { "password" => "hunter2" }), "login");
//! ```

pub mod core;
pub mod engines;
pub mod facade;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        CallContext, Config, ConfigBuilder, Engine, EngineKind, Field, Kv, LogLevel, LoggerError,
        Result, TimestampFormat,
    };
    pub use crate::facade::Logger;
    pub use crate::sinks::{BufferSink, ConsoleSink, FileSink, MultiSink, Sink};
}

pub use crate::core::{
    build_fields, default_mask, mask_sensitive, CallContext, Config, ConfigBuilder, Engine,
    EngineKind, ExitHandler, Field, Kv, LogLevel, LoggerError, MaskFn, ResolvedConfig, Result,
    StackMarshaller, TimestampFormat,
};
pub use crate::engines::{new_engine, EventEngine, FieldEngine};
pub use crate::facade::{global, set_config, Logger};
pub use crate::sinks::{BufferSink, ConsoleSink, FileSink, MultiSink, Sink};
