//! Record encodings
//!
//! - Json: one object per line, the machine readable contract
//! - Console key=value: `<time> <LVL> <caller> > <message> key=value ...`
//! - Console tabbed: `<time>\t<LEVEL>\t<caller>\t<message>\t{fields}`

use super::record::Record;
use super::timestamp::TimestampFormat;
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Keys every encoding owns; a record field using one is renamed
pub const RESERVED_KEYS: [&str; 3] = ["level", "timestamp", "message"];

/// Prefix given to record fields that collide with a reserved key
pub const COLLISION_PREFIX: &str = "fields.";

/// Human readable console layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLayout {
    KeyValue,
    Tabbed,
}

/// Output format for records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Console { layout: ConsoleLayout, color: bool },
}

impl OutputFormat {
    pub fn is_json(&self) -> bool {
        matches!(self, OutputFormat::Json)
    }

    /// Encode `record` as one newline-terminated line
    pub fn encode(&self, record: &Record, timestamp_format: &TimestampFormat) -> String {
        let mut line = match self {
            OutputFormat::Json => self.format_json(record, timestamp_format),
            OutputFormat::Console {
                layout: ConsoleLayout::KeyValue,
                color,
            } => self.format_key_value(record, timestamp_format, *color),
            OutputFormat::Console {
                layout: ConsoleLayout::Tabbed,
                color,
            } => self.format_tabbed(record, timestamp_format, *color),
        };
        line.push('\n');
        line
    }

    fn format_json(&self, record: &Record, timestamp_format: &TimestampFormat) -> String {
        let mut json_obj = Map::new();

        json_obj.insert(
            "level".to_string(),
            Value::String(record.level.as_key().to_string()),
        );
        json_obj.insert(
            "timestamp".to_string(),
            timestamp_format.to_json(&record.timestamp),
        );
        json_obj.insert("message".to_string(), Value::String(record.message.clone()));

        if let Some(ref caller) = record.caller {
            json_obj.insert(caller.key.to_string(), Value::String(caller.location.clone()));
        }

        for (key, value) in &record.fields {
            json_obj.insert(field_key(key, record).into_owned(), value.clone());
        }

        serde_json::to_string(&Value::Object(json_obj)).unwrap_or_default()
    }

    fn format_key_value(
        &self,
        record: &Record,
        timestamp_format: &TimestampFormat,
        color: bool,
    ) -> String {
        let mut parts = vec![
            timestamp_format.format(&record.timestamp),
            paint(record.level.abbrev(), record, color),
        ];

        if let Some(ref caller) = record.caller {
            parts.push(caller.location.clone());
        }
        parts.push(">".to_string());
        parts.push(sanitize_message(&record.message));

        for (key, value) in &record.fields {
            parts.push(format!("{}={}", field_key(key, record), key_value_text(value)));
        }

        parts.join(" ")
    }

    fn format_tabbed(
        &self,
        record: &Record,
        timestamp_format: &TimestampFormat,
        color: bool,
    ) -> String {
        let mut parts = vec![
            timestamp_format.format(&record.timestamp),
            paint(record.level.to_str(), record, color),
        ];

        if let Some(ref caller) = record.caller {
            parts.push(caller.location.clone());
        }
        parts.push(sanitize_message(&record.message));

        if !record.fields.is_empty() {
            let fields: Map<String, Value> = record
                .fields
                .iter()
                .map(|(key, value)| (field_key(key, record).into_owned(), value.clone()))
                .collect();
            parts.push(Value::Object(fields).to_string());
        }

        parts.join("\t")
    }
}

/// Key `key` is written under, moved aside when it would shadow a core key
fn field_key<'a>(key: &'a str, record: &Record) -> Cow<'a, str> {
    let caller_key = record.caller.as_ref().map(|caller| caller.key);
    if RESERVED_KEYS.contains(&key) || caller_key == Some(key) {
        Cow::Owned(format!("{}{}", COLLISION_PREFIX, key))
    } else {
        Cow::Borrowed(key)
    }
}

/// Escape line breaks so one record stays on one console line
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn key_value_text(value: &Value) -> String {
    match value {
        Value::String(s) if s.contains(char::is_whitespace) || s.contains('"') => {
            Value::String(sanitize_message(s)).to_string()
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(feature = "color")]
fn paint(label: &str, record: &Record, color: bool) -> String {
    use colored::Colorize;

    if color {
        label.color(record.level.color_code()).to_string()
    } else {
        label.to_string()
    }
}

#[cfg(not(feature = "color"))]
fn paint(label: &str, _record: &Record, _color: bool) -> String {
    label.to_string()
}
