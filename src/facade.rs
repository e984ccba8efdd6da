//! Logging facade
//!
//! `Logger` is the injectable handle; the free functions in this module
//! forward to a process-wide default `Logger` created on first use.
//!
//! ```
//! use logfacade::{facade, CallContext, Config, LogLevel};
//!
//! let logger = facade::Logger::new(Config::builder().level(LogLevel::Info).build()).unwrap();
//! let ctx = CallContext::new().with_request_id("req-1");
//! logger.info(Some(&ctx), None, None, "ready");
//! ```

use crate::core::{
    build_fields, CallContext, Config, ConsoleLayout, Engine, Kv, LogLevel, Result,
};
use crate::engines::{new_engine, EventEngine, Output};
use parking_lot::RwLock;
use std::error::Error;
use std::fmt;
use std::panic::Location;
use std::sync::{Arc, OnceLock};

pub struct Logger {
    engine: RwLock<Arc<dyn Engine>>,
}

impl Logger {
    /// Build a logger for `config`
    pub fn new(config: Config) -> Result<Self> {
        let engine = new_engine(config.engine, config.resolve())?;
        Ok(Self::with_engine(engine))
    }

    pub fn with_engine(engine: Arc<dyn Engine>) -> Self {
        Self {
            engine: RwLock::new(engine),
        }
    }

    /// Replace the active engine with one built from `config`
    ///
    /// The new engine is constructed before anything is swapped, so on error
    /// the current engine keeps serving every call. The previous engine is
    /// flushed and closed once the last in-flight call using it returns.
    pub fn set_config(&self, config: Config) -> Result<()> {
        let engine = new_engine(config.engine, config.resolve())?;
        self.replace_engine(engine);
        Ok(())
    }

    /// Swap in `engine`, returning the one it replaced
    pub fn replace_engine(&self, engine: Arc<dyn Engine>) -> Arc<dyn Engine> {
        std::mem::replace(&mut *self.engine.write(), engine)
    }

    /// Snapshot of the active engine
    pub fn engine(&self) -> Arc<dyn Engine> {
        Arc::clone(&self.engine.read())
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.engine.read().enabled(level)
    }

    /// Log one record at `level`, reporting the caller of this method
    #[track_caller]
    pub fn log(
        &self,
        level: LogLevel,
        ctx: Option<&CallContext>,
        err: Option<&dyn Error>,
        metadata: Option<Kv>,
        args: fmt::Arguments<'_>,
    ) {
        self.log_at(Location::caller(), level, ctx, err, metadata, args);
    }

    /// Log one record reporting `location` as its caller
    ///
    /// For wrappers that cannot be `#[track_caller]` themselves.
    pub fn log_at(
        &self,
        location: &'static Location<'static>,
        level: LogLevel,
        ctx: Option<&CallContext>,
        err: Option<&dyn Error>,
        metadata: Option<Kv>,
        args: fmt::Arguments<'_>,
    ) {
        // Clone out of the lock so a concurrent set_config never waits on a
        // slow sink.
        let engine = self.engine();
        if !engine.enabled(level) {
            return;
        }
        engine.emit(level, build_fields(ctx, metadata), err, args, location);
    }

    #[track_caller]
    pub fn debug(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
        self.log(LogLevel::Debug, ctx, err, metadata, format_args!("{}", message));
    }

    #[track_caller]
    pub fn info(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
        self.log(LogLevel::Info, ctx, err, metadata, format_args!("{}", message));
    }

    #[track_caller]
    pub fn warn(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
        self.log(LogLevel::Warn, ctx, err, metadata, format_args!("{}", message));
    }

    #[track_caller]
    pub fn error(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
        self.log(LogLevel::Error, ctx, err, metadata, format_args!("{}", message));
    }

    /// Log, flush, then terminate the process (or run the exit handler)
    #[track_caller]
    pub fn fatal(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
        self.log(LogLevel::Fatal, ctx, err, metadata, format_args!("{}", message));
    }

    #[track_caller]
    pub fn debugf(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Debug, ctx, err, metadata, args);
    }

    #[track_caller]
    pub fn infof(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Info, ctx, err, metadata, args);
    }

    #[track_caller]
    pub fn warnf(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Warn, ctx, err, metadata, args);
    }

    #[track_caller]
    pub fn errorf(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Error, ctx, err, metadata, args);
    }

    #[track_caller]
    pub fn fatalf(&self, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
        self.log(LogLevel::Fatal, ctx, err, metadata, args);
    }

    pub fn flush(&self) -> Result<()> {
        self.engine().flush()
    }
}

impl Default for Logger {
    /// Development console logger: debug and above, caller, colour
    fn default() -> Self {
        let mut config = Config::builder()
            .level(LogLevel::Debug)
            .with_caller(true)
            .use_color(true)
            .build()
            .resolve();
        config.is_development = true;

        let output = Output::console(&config, ConsoleLayout::KeyValue);
        Self::with_engine(Arc::new(EventEngine::with_output(config, output)))
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let engine = self.engine.read();
        f.debug_struct("Logger")
            .field("engine", &engine.name())
            .field("level", &engine.level())
            .finish()
    }
}

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger used by the free functions and macros
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::default)
}

/// Reconfigure the process-wide logger
pub fn set_config(config: Config) -> Result<()> {
    global().set_config(config)
}

#[track_caller]
pub fn log(level: LogLevel, ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
    global().log(level, ctx, err, metadata, args);
}

#[track_caller]
pub fn debug(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
    global().debug(ctx, err, metadata, message);
}

#[track_caller]
pub fn info(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
    global().info(ctx, err, metadata, message);
}

#[track_caller]
pub fn warn(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
    global().warn(ctx, err, metadata, message);
}

#[track_caller]
pub fn error(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
    global().error(ctx, err, metadata, message);
}

#[track_caller]
pub fn fatal(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, message: &str) {
    global().fatal(ctx, err, metadata, message);
}

#[track_caller]
pub fn debugf(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
    global().debugf(ctx, err, metadata, args);
}

#[track_caller]
pub fn infof(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
    global().infof(ctx, err, metadata, args);
}

#[track_caller]
pub fn warnf(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
    global().warnf(ctx, err, metadata, args);
}

#[track_caller]
pub fn errorf(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
    global().errorf(ctx, err, metadata, args);
}

#[track_caller]
pub fn fatalf(ctx: Option<&CallContext>, err: Option<&dyn Error>, metadata: Option<Kv>, args: fmt::Arguments<'_>) {
    global().fatalf(ctx, err, metadata, args);
}
