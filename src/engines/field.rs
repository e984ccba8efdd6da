//! Field engine: records carry an ordered list of typed fields
//!
//! A call is first checked against the level, producing an entry only when
//! it will be written. Fields keep the order they were attached in:
//! static fields, request id, source, user info, error, extra fields,
//! metadata. Console output uses the tabbed layout and stack traces go
//! under `stack` as one string.

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
use std::error::Error;
use std::fmt;
use std::panic::Location;

pub const CALLER_KEY: &str = "line";
pub const STACK_KEY: &str = "stack";

/// One typed key/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPair {
    pub key: String,
    pub value: Value,
}

impl FieldPair {
    pub fn string(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            value: Value::String(value.into()),
        }
    }

    pub fn any(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn error(err: &dyn Error) -> Self {
        Self::string(KEY_ERROR, error_chain(err))
    }
}

pub struct FieldEngine {
    config: ResolvedConfig,
    output: Output,
    base: Vec<FieldPair>,
}

impl FieldEngine {
    pub const NAME: &'static str = "field";

    pub fn new(config: ResolvedConfig) -> Result<Self> {
        let output = Output::resolve(&config, ConsoleLayout::Tabbed)?;
        Ok(Self::with_output(config, output))
    }

    pub fn with_output(config: ResolvedConfig, output: Output) -> Self {
        let mut base = Vec::with_capacity(2);
        if !config.app_name.is_empty() {
            base.push(FieldPair::string("app", config.app_name.as_str()));
        }
        if !config.environment.is_empty() {
            base.push(FieldPair::string("env", config.environment.as_str()));
        }

        Self { config, output, base }
    }

    /// Entry for `level`, or `None` when it would not be written
    fn check(&self, level: LogLevel, caller: &Location<'_>) -> Option<Record> {
        if level < self.config.level {
            return None;
        }
        let mut record = Record::new(level, String::new());
        if self.config.with_caller {
            record.caller = Some(Caller::new(CALLER_KEY, caller));
        }
        Some(record)
    }

    /// Translate a `Field` and error into the ordered field list
    fn field_pairs(&self, field: Field, err: Option<&dyn Error>) -> Vec<FieldPair> {
        let mut pairs = Vec::with_capacity(self.base.len() + field.fields.len() + 5);
        pairs.extend(self.base.iter().cloned());

        if !field.request_id.is_empty() {
            pairs.push(FieldPair::string(KEY_REQUEST_ID, field.request_id));
        }
        if let Some(source) = field.source {
            pairs.push(FieldPair::any(KEY_SOURCE, source));
        }
        if let Some(user_info) = field.user_info {
            pairs.push(FieldPair::any(KEY_USER_INFO, user_info));
        }
        if let Some(err) = err {
            pairs.push(FieldPair::error(err));
        }
        for (key, value) in field.fields {
            pairs.push(FieldPair::any(key, value));
        }
        if let Some(mut metadata) = field.metadata {
            self.mask(&mut metadata);
            pairs.push(FieldPair::any(KEY_METADATA, Value::Object(metadata)));
        }

        pairs
    }

    fn mask(&self, metadata: &mut crate::core::Kv) {
        let keys = &self.config.sensitive_fields;
        match self.config.sensitive_masker {
            Some(ref mask) => mask_sensitive(metadata, keys, &**mask),
            None => mask_sensitive(metadata, keys, &default_mask),
        }
    }

    fn stack(&self) -> FieldPair {
        let backtrace = Backtrace::force_capture();
        let value = match self.config.stack_marshaller {
            Some(ref marshal) => marshal(&backtrace),
            None => Value::String(backtrace.to_string()),
        };
        FieldPair::any(STACK_KEY, value)
    }

    fn write(&self, mut record: Record, pairs: Vec<FieldPair>) {
        record
            .fields
            .extend(pairs.into_iter().map(|pair| (pair.key, pair.value)));
        if self.config.wants_stack(record.level) {
            let stack = self.stack();
            record.push(stack.key, stack.value);
        }

        self.output.write(&record);
        self.output.finish_fatal(&self.config, record.level);
    }
}

impl Engine for FieldEngine {
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
        let Some(mut record) = self.check(level, caller) else {
            return;
        };
        record.message = message.to_string();
        let pairs = self.field_pairs(field, err);
        self.write(record, pairs);
    }

    fn flush(&self) -> Result<()> {
        self.output.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, ConfigBuilder, Kv};
    use crate::sinks::BufferSink;
    use serde_json::json;
    use std::sync::Arc;

    fn engine(builder: ConfigBuilder) -> (FieldEngine, BufferSink) {
        let sink = BufferSink::new();
        let config = builder.console_sink(Arc::new(sink.clone())).build().resolve();
        (FieldEngine::new(config).unwrap(), sink)
    }

    fn last_record(sink: &BufferSink) -> Value {
        let lines = sink.lines();
        serde_json::from_str(lines.last().expect("a record")).unwrap()
    }

    #[test]
    fn test_field_order() {
        let (engine, _sink) = engine(Config::builder().app_name("shop").environment("prod"));
        let mut metadata = Kv::new();
        metadata.insert("k".into(), json!(1));
        let field = Field {
            request_id: "r".into(),
            source: Some(json!("s")),
            user_info: Some(json!("u")),
            metadata: Some(metadata),
            fields: vec![("extra".into(), json!(true))],
        };
        let err = std::io::Error::new(std::io::ErrorKind::Other, "e");

        let keys: Vec<String> = engine
            .field_pairs(field, Some(&err))
            .into_iter()
            .map(|pair| pair.key)
            .collect();
        assert_eq!(
            keys,
            [
                "app",
                "env",
                "request_id",
                "source",
                "user_info",
                "error",
                "extra",
                "metadata"
            ]
        );
    }

    #[test]
    fn test_json_record() {
        let (engine, sink) = engine(
            Config::builder()
                .use_json(true)
                .mask_sensitive_data(["password"]),
        );
        let mut metadata = Kv::new();
        metadata.insert("user".into(), json!({"password": "hunter2", "name": "ana"}));
        let field = Field {
            metadata: Some(metadata),
            ..Field::default()
        };
        engine.errorf(field, None, format_args!("login failed for {}", "ana"));

        let record = last_record(&sink);
        assert_eq!(record["level"], "error");
        assert_eq!(record["message"], "login failed for ana");
        assert_eq!(record["metadata"]["user"]["password"], "*******");
        assert_eq!(record["metadata"]["user"]["name"], "ana");
    }

    #[test]
    fn test_no_metadata_key_without_metadata() {
        let (engine, sink) = engine(Config::builder().use_json(true));
        engine.info(Field::default(), None, "plain");
        assert!(last_record(&sink).get("metadata").is_none());
    }

    #[test]
    fn test_level_filter() {
        let (engine, sink) = engine(Config::builder().level(LogLevel::Error));
        engine.warn(Field::default(), None, "dropped");
        assert!(sink.is_empty());
        assert!(!engine.enabled(LogLevel::Info));
        assert!(engine.enabled(LogLevel::Fatal));
    }

    #[test]
    fn test_stack_is_string() {
        let (engine, sink) = engine(
            Config::builder()
                .use_json(true)
                .with_stack(true)
                .stack_level(LogLevel::Warn),
        );
        engine.warn(Field::default(), None, "with stack");
        assert!(last_record(&sink)[STACK_KEY].is_string());

        engine.info(Field::default(), None, "without");
        assert!(last_record(&sink).get(STACK_KEY).is_none());
    }

    #[test]
    fn test_tabbed_console() {
        let (engine, sink) = engine(Config::builder().with_caller(true));
        engine.info(Field::default(), None, "tabbed");

        let line = sink.contents();
        let columns: Vec<&str> = line.trim_end().split('\t').collect();
        assert_eq!(columns[1], "INFO");
        assert!(columns[2].contains("field.rs"));
        assert_eq!(columns[3], "tabbed");
    }

    #[test]
    fn test_fatal_writes_before_exit() {
        use parking_lot::Mutex;

        let sink = BufferSink::new();
        let seen = Arc::new(Mutex::new(None));
        let (probe, record) = (sink.clone(), Arc::clone(&seen));
        let config = Config::builder()
            .use_json(true)
            .console_sink(Arc::new(sink.clone()))
            .exit_handler(Arc::new(move |code: i32| {
                *record.lock() = Some((code, probe.lines()));
            }))
            .build()
            .resolve();
        let engine = FieldEngine::new(config).unwrap();

        engine.fatal(Field::default(), None, "going down");

        let (code, lines) = seen.lock().take().expect("exit handler ran");
        assert_eq!(code, 1);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("going down"));
    }
}
