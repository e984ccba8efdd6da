//! Engine-neutral payload attached to one log record

use super::context::CallContext;
use serde_json::Value;

/// Metadata map handed to the facade
pub type Kv = serde_json::Map<String, Value>;

/// Record key of the metadata object
pub const KEY_METADATA: &str = "metadata";
/// Record key of the error message
pub const KEY_ERROR: &str = "error";

/// Everything to attach to one log record
///
/// Built fresh for every call and moved into the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Field {
    /// Empty means absent
    pub request_id: String,
    pub source: Option<Value>,
    pub user_info: Option<Value>,
    /// `None` when the caller supplied no metadata or an empty map
    pub metadata: Option<Kv>,
    /// Extra flat pairs, emitted as top-level keys
    pub fields: Vec<(String, Value)>,
}

impl Field {
    /// Add an extra top-level pair
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((key.into(), value.into()));
        self
    }

    pub fn has_metadata(&self) -> bool {
        self.metadata.is_some()
    }
}

/// Assemble a `Field` from the call context and metadata
///
/// Runs on every log statement. Metadata is moved, never copied.
pub fn build_fields(ctx: Option<&CallContext>, metadata: Option<Kv>) -> Field {
    let mut field = Field::default();

    if let Some(ctx) = ctx {
        field.request_id = ctx.request_id().to_owned();
        field.source = ctx.source().cloned();
        field.user_info = ctx.user_info().cloned();
    }

    field.metadata = metadata.filter(|m| !m.is_empty());
    field
}
