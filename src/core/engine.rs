//! Capability interface every logging backend implements
//!
//! The facade only ever talks to an `Arc<dyn Engine>`, so backends can be
//! swapped without touching call sites. All backends share the same level
//! filtering and consume the same `Field`.

use super::error::Result;
use super::field::Field;
use super::log_level::LogLevel;
use std::error::Error;
use std::fmt;
use std::panic::Location;

pub trait Engine: Send + Sync {
    /// Selector name of this backend
    fn name(&self) -> &'static str;

    /// Minimum level this engine emits
    fn level(&self) -> LogLevel;

    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    /// Decorate, mask, encode and write one record
    ///
    /// Records below `level()` are dropped without touching a sink. A
    /// `Fatal` record is flushed to every sink and then the process is
    /// terminated (or the configured exit handler runs).
    fn emit(
        &self,
        level: LogLevel,
        field: Field,
        err: Option<&dyn Error>,
        message: fmt::Arguments<'_>,
        caller: &'static Location<'static>,
    );

    /// Flush every sink of this engine
    fn flush(&self) -> Result<()>;

    #[track_caller]
    fn debug(&self, field: Field, err: Option<&dyn Error>, message: &str) {
        self.emit(LogLevel::Debug, field, err, format_args!("{}", message), Location::caller());
    }

    #[track_caller]
    fn info(&self, field: Field, err: Option<&dyn Error>, message: &str) {
        self.emit(LogLevel::Info, field, err, format_args!("{}", message), Location::caller());
    }

    #[track_caller]
    fn warn(&self, field: Field, err: Option<&dyn Error>, message: &str) {
        self.emit(LogLevel::Warn, field, err, format_args!("{}", message), Location::caller());
    }

    #[track_caller]
    fn error(&self, field: Field, err: Option<&dyn Error>, message: &str) {
        self.emit(LogLevel::Error, field, err, format_args!("{}", message), Location::caller());
    }

    /// Emit and then terminate the process
    #[track_caller]
    fn fatal(&self, field: Field, err: Option<&dyn Error>, message: &str) {
        self.emit(LogLevel::Fatal, field, err, format_args!("{}", message), Location::caller());
    }

    #[track_caller]
    fn debugf(&self, field: Field, err: Option<&dyn Error>, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Debug, field, err, args, Location::caller());
    }

    #[track_caller]
    fn infof(&self, field: Field, err: Option<&dyn Error>, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Info, field, err, args, Location::caller());
    }

    #[track_caller]
    fn warnf(&self, field: Field, err: Option<&dyn Error>, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Warn, field, err, args, Location::caller());
    }

    #[track_caller]
    fn errorf(&self, field: Field, err: Option<&dyn Error>, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Error, field, err, args, Location::caller());
    }

    /// Emit and then terminate the process
    #[track_caller]
    fn fatalf(&self, field: Field, err: Option<&dyn Error>, args: fmt::Arguments<'_>) {
        self.emit(LogLevel::Fatal, field, err, args, Location::caller());
    }
}

/// Text of `err` followed by its `source()` chain
pub fn error_chain(err: &dyn Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
