//! Event engine: records are built as a chain of calls on an `Event`
//!
//! ```text
//! engine.event(level)?.caller(loc).fields(field).stack().err(err).msg(args)
//! ```
//!
//! Per-call fields are collected into a sorted map, so keys of the same
//! record always come out in the same order. Console output uses the
//! key=value layout and stack traces go under `stacktrace`.

use super::output::Output;
use crate::core::context::{KEY_REQUEST_ID, KEY_SOURCE, KEY_USER_INFO};
use crate::core::engine::error_chain;
use crate::core::field::{KEY_ERROR, KEY_METADATA};
use crate::core::{
    default_mask, mask_sensitive, Caller, ConsoleLayout, Engine, Field, LogLevel, Record,
    ResolvedConfig, Result,
};
use serde_json::Value;
use std::backtrace::Backtrace;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::panic::Location;

pub const CALLER_KEY: &str = "line";
pub const STACK_KEY: &str = "stacktrace";

pub struct EventEngine {
    config: ResolvedConfig,
    output: Output,
    context: Vec<(String, Value)>,
}

impl EventEngine {
    pub const NAME: &'static str = "event";

    pub fn new(config: ResolvedConfig) -> Result<Self> {
        let output = Output::resolve(&config, ConsoleLayout::KeyValue)?;
        Ok(Self::with_output(config, output))
    }

    /// Build around an already resolved output
    pub fn with_output(config: ResolvedConfig, output: Output) -> Self {
        let mut context = Vec::new();
        if !config.app_name.is_empty() {
            context.push(("app".to_string(), Value::String(config.app_name.clone())));
        }
        if !config.environment.is_empty() {
            context.push(("env".to_string(), Value::String(config.environment.clone())));
        }

        Self {
            config,
            output,
            context,
        }
    }

    /// Start an event, or `None` when `level` is filtered out
    fn event(&self, level: LogLevel) -> Option<Event<'_>> {
        if level < self.config.level {
            return None;
        }
        let mut record = Record::new(level, String::new());
        record.fields.extend(self.context.iter().cloned());
        Some(Event {
            engine: self,
            record,
            fields: BTreeMap::new(),
        })
    }
}

impl Engine for EventEngine {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn level(&self) -> LogLevel {
        self.config.level
    }

    fn emit(
        &self,
        level: LogLevel,
        field: Field,
        err: Option<&dyn Error>,
        message: fmt::Arguments<'_>,
        caller: &'static Location<'static>,
    ) {
        if let Some(event) = self.event(level) {
            event.caller(caller).fields(field).stack().err(err).msg(message);
        }
    }

    fn flush(&self) -> Result<()> {
        self.output.flush()
    }
}

struct Event<'a> {
    engine: &'a EventEngine,
    record: Record,
    fields: BTreeMap<String, Value>,
}

impl Event<'_> {
    fn caller(mut self, location: &Location<'_>) -> Self {
        if self.engine.config.with_caller {
            self.record.caller = Some(Caller::new(CALLER_KEY, location));
        }
        self
    }

    fn fields(mut self, field: Field) -> Self {
        if !field.request_id.is_empty() {
            self.fields
                .insert(KEY_REQUEST_ID.to_string(), Value::String(field.request_id));
        }
        if let Some(source) = field.source {
            self.fields.insert(KEY_SOURCE.to_string(), source);
        }
        if let Some(user_info) = field.user_info {
            self.fields.insert(KEY_USER_INFO.to_string(), user_info);
        }
        self.fields.extend(field.fields);

        if let Some(mut metadata) = field.metadata {
            let config = &self.engine.config;
            match config.sensitive_masker {
                Some(ref mask) => mask_sensitive(&mut metadata, &config.sensitive_fields, &**mask),
                None => mask_sensitive(&mut metadata, &config.sensitive_fields, &default_mask),
            }
            self.fields
                .insert(KEY_METADATA.to_string(), Value::Object(metadata));
        }
        self
    }

    fn stack(mut self) -> Self {
        let config = &self.engine.config;
        if config.wants_stack(self.record.level) {
            let backtrace = Backtrace::force_capture();
            let stack = match config.stack_marshaller {
                Some(ref marshal) => marshal(&backtrace),
                None => marshal_frames(&backtrace),
            };
            self.fields.insert(STACK_KEY.to_string(), stack);
        }
        self
    }

    fn err(mut self, err: Option<&dyn Error>) -> Self {
        if let Some(err) = err {
            self.fields
                .insert(KEY_ERROR.to_string(), Value::String(error_chain(err)));
        }
        self
    }

    fn msg(mut self, message: fmt::Arguments<'_>) {
        self.record.message = message.to_string();
        self.record.fields.extend(self.fields);

        let engine = self.engine;
        engine.output.write(&self.record);
        engine.output.finish_fatal(&engine.config, self.record.level);
    }
}

/// Default stack rendering: one array entry per backtrace line
fn marshal_frames(backtrace: &Backtrace) -> Value {
    let frames = backtrace
        .to_string()
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| Value::String(line.to_string()))
        .collect();
    Value::Array(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, Kv};
    use crate::sinks::BufferSink;
    use serde_json::json;
    use std::sync::Arc;

    fn engine(builder: crate::core::ConfigBuilder) -> (EventEngine, BufferSink) {
        let sink = BufferSink::new();
        let config = builder.console_sink(Arc::new(sink.clone())).build().resolve();
        (EventEngine::new(config).unwrap(), sink)
    }

    fn json_engine() -> (EventEngine, BufferSink) {
        engine(Config::builder().use_json(true))
    }

    fn last_record(sink: &BufferSink) -> Value {
        let lines = sink.lines();
        serde_json::from_str(lines.last().expect("a record")).unwrap()
    }

    fn metadata(value: Value) -> Option<Kv> {
        match value {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    #[test]
    fn test_basic_record() {
        let (engine, sink) = json_engine();
        engine.info(Field::default(), None, "hello");

        let record = last_record(&sink);
        assert_eq!(record["level"], "info");
        assert_eq!(record["message"], "hello");
        assert!(record["timestamp"].is_string());
        assert!(record.get("metadata").is_none());
        assert!(record.get("error").is_none());
        assert!(record.get("request_id").is_none());
    }

    #[test]
    fn test_field_translation() {
        let (engine, sink) = json_engine();
        let field = Field {
            request_id: "req-9".into(),
            source: Some(json!("checkout")),
            user_info: Some(json!({"id": 5})),
            metadata: metadata(json!({"order": 17})),
            fields: vec![("attempt".into(), json!(2))],
        };
        let err = std::io::Error::new(std::io::ErrorKind::Other, "timeout");
        engine.warnf(field, Some(&err), format_args!("retry {}", 2));

        let record = last_record(&sink);
        assert_eq!(record["message"], "retry 2");
        assert_eq!(record["request_id"], "req-9");
        assert_eq!(record["source"], "checkout");
        assert_eq!(record["user_info"]["id"], 5);
        assert_eq!(record["attempt"], 2);
        assert_eq!(record["error"], "timeout");
        assert_eq!(record["metadata"]["order"], 17);
    }

    #[test]
    fn test_metadata_masked() {
        let (engine, sink) = engine(
            Config::builder()
                .use_json(true)
                .mask_sensitive_data(["password"]),
        );
        let field = Field {
            metadata: metadata(json!({
                "request": {"password": "secret", "input": ["a"]},
                "response": {"output": "value"}
            })),
            request_id: "password".into(),
            ..Field::default()
        };
        engine.info(field, None, "with data");

        let record = last_record(&sink);
        assert_eq!(record["metadata"]["request"]["password"], "******");
        assert_eq!(record["metadata"]["request"]["input"], json!(["a"]));
        assert_eq!(record["metadata"]["response"]["output"], "value");
        assert_eq!(record["request_id"], "password");
    }

    #[test]
    fn test_custom_masker() {
        let (engine, sink) = engine(
            Config::builder()
                .use_json(true)
                .mask_sensitive_data(["token"])
                .sensitive_data_masker(Arc::new(|_: &str| "[redacted]".to_string())),
        );
        let field = Field {
            metadata: metadata(json!({"token": "abc"})),
            ..Field::default()
        };
        engine.info(field, None, "masked");
        assert_eq!(last_record(&sink)["metadata"]["token"], "[redacted]");
    }

    #[test]
    fn test_level_filter_writes_nothing() {
        let (engine, sink) = engine(Config::builder().use_json(true).level(LogLevel::Warn));
        engine.debug(Field::default(), None, "hidden");
        engine.info(Field::default(), None, "hidden");
        assert_eq!(sink.len(), 0);

        engine.warn(Field::default(), None, "shown");
        assert_eq!(sink.lines().len(), 1);
    }

    #[test]
    fn test_static_fields() {
        let (engine, sink) = engine(
            Config::builder()
                .use_json(true)
                .app_name("shop")
                .environment("prod"),
        );
        engine.info(Field::default(), None, "static");
        let record = last_record(&sink);
        assert_eq!(record["app"], "shop");
        assert_eq!(record["env"], "prod");

        let (engine, sink) = json_engine();
        engine.info(Field::default(), None, "no static");
        let record = last_record(&sink);
        assert!(record.get("app").is_none());
        assert!(record.get("env").is_none());
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let (engine, sink) = engine(Config::builder().use_json(true).with_caller(true));
        engine.info(Field::default(), None, "where");
        let line = line!() - 1;

        let record = last_record(&sink);
        let caller = record[CALLER_KEY].as_str().unwrap();
        assert!(caller.ends_with(&format!("event.rs:{}", line)), "{caller}");
    }

    #[test]
    fn test_stack_at_stack_level() {
        let (engine, sink) = engine(Config::builder().use_json(true).with_stack(true));
        engine.warn(Field::default(), None, "no stack");
        assert!(last_record(&sink).get(STACK_KEY).is_none());

        engine.error(Field::default(), None, "stack");
        assert!(last_record(&sink)[STACK_KEY].is_array());
    }

    #[test]
    fn test_custom_stack_marshaller() {
        let (engine, sink) = engine(
            Config::builder()
                .use_json(true)
                .with_stack(true)
                .stack_level(LogLevel::Info)
                .stack_marshaller(Arc::new(|_: &Backtrace| json!("custom"))),
        );
        engine.info(Field::default(), None, "stack");
        assert_eq!(last_record(&sink)[STACK_KEY], "custom");
    }

    #[test]
    fn test_console_layout() {
        let (engine, sink) = engine(Config::builder().app_name("shop"));
        let field = Field {
            request_id: "r1".into(),
            ..Field::default()
        };
        engine.info(field, None, "console line");

        let line = sink.contents();
        assert!(line.contains("INF > console line"));
        assert!(line.contains("app=shop"));
        assert!(line.contains("request_id=r1"));
    }
}
