//! Backend-neutral record handed to an encoder

use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::panic::Location;

/// Source location of the facade call, with the key it is reported under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub key: &'static str,
    pub location: String,
}

impl Caller {
    pub fn new(key: &'static str, location: &Location<'_>) -> Self {
        Self {
            key,
            location: format!("{}:{}", location.file(), location.line()),
        }
    }
}

/// One fully decorated record
///
/// `fields` keeps the order the engine attached them in; static fields come
/// first.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: LogLevel,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub caller: Option<Caller>,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            message,
            caller: None,
            fields: Vec::new(),
        }
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.fields.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}
