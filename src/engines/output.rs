//! Output topology shared by every engine
//!
//! Resolved once at construction:
//!
//! | file | use_json | encoding | sinks                                  |
//! |------|----------|----------|----------------------------------------|
//! | yes  | any      | JSON     | file, plus stdout if `use_multi_writers` |
//! | no   | yes      | JSON     | stderr                                 |
//! | no   | no       | console  | stdout when colorized, else stderr     |
//!
//! Console colour requires a development environment and `use_color`.
//! A configured `console_sink` replaces every console stream above.

use crate::core::{
    ConsoleLayout, LogLevel, OutputFormat, Record, ResolvedConfig, Result, Sink, TimestampFormat,
};
use crate::sinks::{ConsoleSink, FileSink, MultiSink};
use std::sync::Arc;

/// Default exit code of a fatal record
pub const FATAL_EXIT_CODE: i32 = 1;

pub struct Output {
    format: OutputFormat,
    sink: Arc<dyn Sink>,
    time_format: TimestampFormat,
}

impl Output {
    /// Resolve encoder and sinks, opening the log file if one is configured
    pub fn resolve(config: &ResolvedConfig, layout: ConsoleLayout) -> Result<Self> {
        config.time_format.validate()?;
        let Some(ref path) = config.file_path else {
            return Ok(Self::console(config, layout));
        };

        let file: Arc<dyn Sink> = Arc::new(FileSink::open(path)?);
        let sink = if config.use_multi_writers {
            let console = config
                .console_sink
                .clone()
                .unwrap_or_else(|| Arc::new(ConsoleSink::stdout()));
            Arc::new(MultiSink::new(vec![file, console]))
        } else {
            file
        };

        Ok(Self {
            format: OutputFormat::Json,
            sink,
            time_format: config.time_format.clone(),
        })
    }

    /// Console-only output; ignores any configured file
    pub fn console(config: &ResolvedConfig, layout: ConsoleLayout) -> Self {
        let color = config.is_development && config.use_color;
        let format = if config.use_json {
            OutputFormat::Json
        } else {
            OutputFormat::Console { layout, color }
        };

        let sink = config.console_sink.clone().unwrap_or_else(|| {
            if color && !config.use_json {
                Arc::new(ConsoleSink::stdout())
            } else {
                Arc::new(ConsoleSink::stderr())
            }
        });

        Self {
            format,
            sink,
            time_format: config.time_format.clone(),
        }
    }

    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    pub fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// Encode and write `record`; failures are reported on stderr only
    pub fn write(&self, record: &Record) {
        let line = self.format.encode(record, &self.time_format);
        if let Err(e) = self.sink.write_record(line.as_bytes()) {
            eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", self.sink.name(), e);
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    /// Flush, then hand control to the exit handler
    ///
    /// Without a handler the process exits with `FATAL_EXIT_CODE`.
    pub fn finish_fatal(&self, config: &ResolvedConfig, level: LogLevel) {
        if level != LogLevel::Fatal {
            return;
        }
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        match config.exit_handler {
            Some(ref handler) => handler(FATAL_EXIT_CODE),
            None => std::process::exit(FATAL_EXIT_CODE),
        }
    }
}

impl Drop for Output {
    fn drop(&mut self) {
        if let Err(e) = self.sink.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}
