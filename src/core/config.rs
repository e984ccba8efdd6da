//! Public configuration and its resolution into engine wiring
//!
//! `Config` is what applications fill in (by hand, through `ConfigBuilder`,
//! or deserialized from a settings file). `Config::resolve` turns it into the
//! `ResolvedConfig` both engines are built from. Resolution is pure and
//! cannot fail; the only fallible step of activation is opening the file,
//! done by the engine constructor.

use super::error::Result;
use super::log_level::LogLevel;
use super::masking::MaskFn;
use super::sink::Sink;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Deserializer, Serialize};
use std::backtrace::Backtrace;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Renders a captured stack trace into the record's stack field
pub type StackMarshaller = Arc<dyn Fn(&Backtrace) -> serde_json::Value + Send + Sync>;

/// Called with the exit code after a fatal record has been written
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Environments classified as development
pub const DEVELOPMENT_ENVIRONMENTS: [&str; 3] = ["dev", "development", "local"];

/// Backend selector
///
/// Unknown names fall back to the default `Event` engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum EngineKind {
    /// Chained event builder with a key=value console layout
    #[default]
    Event,
    /// Typed field list with a tabbed console layout
    Field,
}

impl EngineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineKind::Event => "event",
            EngineKind::Field => "field",
        }
    }
}

impl From<&str> for EngineKind {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "field" => EngineKind::Field,
            _ => EngineKind::Event,
        }
    }
}

impl From<String> for EngineKind {
    fn from(s: String) -> Self {
        EngineKind::from(s.as_str())
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging configuration
///
/// Every option is optional; `Config::default()` logs debug and above to
/// the console.
///
/// There is no caller skip option. Call sites are captured with
/// `#[track_caller]`, and wrappers that cannot carry that attribute pass
/// their own location to `Logger::log_at`. Keys this struct does not know,
/// such as `caller_skip` in a settings file written for another logger, are
/// ignored when deserializing.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Printed as `app` on every record when non-empty
    pub app_name: String,

    /// Printed as `env` on every record when non-empty.
    /// `dev`, `development` and `local` mark a development environment.
    pub environment: String,

    /// Minimum level to emit
    pub level: LogLevel,

    /// Format of the `timestamp` key (default: RFC 3339)
    #[serde(deserialize_with = "deserialize_time_format")]
    pub time_format: TimestampFormat,

    /// Attach the call site as `line`
    pub with_caller: bool,

    /// Attach a stack trace to records at or above `stack_level`
    pub with_stack: bool,

    /// Minimum level that gets a stack trace (default: Error)
    pub stack_level: Option<LogLevel>,

    /// Stack renderer; each engine has its own default
    #[serde(skip)]
    pub stack_marshaller: Option<StackMarshaller>,

    /// Metadata keys whose values are masked
    pub mask_sensitive_data: Vec<String>,

    /// Masking function (default: one `*` per character)
    #[serde(skip)]
    pub sensitive_data_masker: Option<MaskFn>,

    /// Encode records as JSON
    pub use_json: bool,

    /// Colorize console output; only honored in development environments
    pub use_color: bool,

    /// With `file_path` set, also copy every record to the console
    pub use_multi_writers: bool,

    /// Log file; when set the console is silent unless `use_multi_writers`
    pub file_path: Option<PathBuf>,

    /// Backend to activate
    pub engine: EngineKind,

    /// Replaces the process console stream
    #[serde(skip)]
    pub console_sink: Option<Arc<dyn Sink>>,

    /// Replaces process termination after a fatal record
    #[serde(skip)]
    pub exit_handler: Option<ExitHandler>,
}

fn deserialize_time_format<'de, D>(deserializer: D) -> std::result::Result<TimestampFormat, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(TimestampFormat::from(s.as_str()))
}

impl Config {
    /// Create a builder for Config
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse a configuration from JSON
    ///
    /// ```
    /// use logfacade::{Config, EngineKind, LogLevel};
    ///
    /// let config = Config::from_json_str(r#"{"level": "warn", "engine": "field"}"#).unwrap();
    /// assert_eq!(config.level, LogLevel::Warn);
    /// assert_eq!(config.engine, EngineKind::Field);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether `environment` names a development environment
    pub fn is_development(&self) -> bool {
        DEVELOPMENT_ENVIRONMENTS.contains(&self.environment.as_str())
    }

    /// Translate into the engine-neutral configuration
    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig {
            app_name: self.app_name.clone(),
            environment: self.environment.clone(),
            is_development: self.is_development(),
            level: self.level,
            time_format: self.time_format.clone(),
            with_caller: self.with_caller,
            with_stack: self.with_stack,
            stack_level: self.stack_level.unwrap_or(LogLevel::Error),
            stack_marshaller: self.stack_marshaller.clone(),
            sensitive_fields: self.mask_sensitive_data.iter().cloned().collect(),
            sensitive_masker: self.sensitive_data_masker.clone(),
            use_json: self.use_json,
            use_color: self.use_color,
            use_multi_writers: self.use_multi_writers,
            file_path: self
                .file_path
                .clone()
                .filter(|p| !p.as_os_str().is_empty()),
            console_sink: self.console_sink.clone(),
            exit_handler: self.exit_handler.clone(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("app_name", &self.app_name)
            .field("environment", &self.environment)
            .field("level", &self.level)
            .field("time_format", &self.time_format)
            .field("with_caller", &self.with_caller)
            .field("with_stack", &self.with_stack)
            .field("stack_level", &self.stack_level)
            .field("mask_sensitive_data", &self.mask_sensitive_data)
            .field("use_json", &self.use_json)
            .field("use_color", &self.use_color)
            .field("use_multi_writers", &self.use_multi_writers)
            .field("file_path", &self.file_path)
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

/// Engine-neutral configuration both engines are built from
///
/// Pluggable functions are passed through untouched; a `None` is replaced
/// by the engine's own default at the point of use.
#[derive(Clone)]
pub struct ResolvedConfig {
    pub app_name: String,
    pub environment: String,
    pub is_development: bool,
    pub level: LogLevel,
    pub time_format: TimestampFormat,
    pub with_caller: bool,
    pub with_stack: bool,
    pub stack_level: LogLevel,
    pub stack_marshaller: Option<StackMarshaller>,
    pub sensitive_fields: HashSet<String>,
    pub sensitive_masker: Option<MaskFn>,
    pub use_json: bool,
    pub use_color: bool,
    pub use_multi_writers: bool,
    pub file_path: Option<PathBuf>,
    pub console_sink: Option<Arc<dyn Sink>>,
    pub exit_handler: Option<ExitHandler>,
}

impl ResolvedConfig {
    /// Whether a record at `level` carries a stack trace
    pub fn wants_stack(&self, level: LogLevel) -> bool {
        self.with_stack && level >= self.stack_level
    }
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("app_name", &self.app_name)
            .field("environment", &self.environment)
            .field("is_development", &self.is_development)
            .field("level", &self.level)
            .field("stack_level", &self.stack_level)
            .field("sensitive_fields", &self.sensitive_fields)
            .field("file_path", &self.file_path)
            .finish_non_exhaustive()
    }
}

/// Builder for constructing Config with a fluent API
///
/// # Example
/// ```
/// use logfacade::{Config, LogLevel};
///
/// let config = Config::builder()
///     .app_name("shop")
///     .environment("local")
///     .level(LogLevel::Info)
///     .with_caller(true)
///     .mask_sensitive_data(["password", "token"])
///     .build();
///
/// assert!(config.resolve().is_development);
/// ```
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    #[must_use = "builder methods return a new value"]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.config.environment = environment.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.config.time_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_caller(mut self, enabled: bool) -> Self {
        self.config.with_caller = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_stack(mut self, enabled: bool) -> Self {
        self.config.with_stack = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_level(mut self, level: LogLevel) -> Self {
        self.config.stack_level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stack_marshaller(mut self, marshaller: StackMarshaller) -> Self {
        self.config.stack_marshaller = Some(marshaller);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn mask_sensitive_data<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.mask_sensitive_data = keys.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sensitive_data_masker(mut self, masker: MaskFn) -> Self {
        self.config.sensitive_data_masker = Some(masker);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn use_json(mut self, enabled: bool) -> Self {
        self.config.use_json = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn use_color(mut self, enabled: bool) -> Self {
        self.config.use_color = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn use_multi_writers(mut self, enabled: bool) -> Self {
        self.config.use_multi_writers = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.file_path = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn engine(mut self, engine: EngineKind) -> Self {
        self.config.engine = engine;
        self
    }

    /// Send console output to `sink` instead of stdout/stderr
    #[must_use = "builder methods return a new value"]
    pub fn console_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.config.console_sink = Some(sink);
        self
    }

    /// Call `handler` instead of terminating the process after a fatal record
    #[must_use = "builder methods return a new value"]
    pub fn exit_handler(mut self, handler: ExitHandler) -> Self {
        self.config.exit_handler = Some(handler);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
