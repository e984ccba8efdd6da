//! Call-scoped metadata threaded explicitly through call chains
//!
//! `CallContext` carries three named slots (request id, user info and source)
//! from the edge of a request down to every log statement. Accessors never
//! fail: an absent context or an unset slot maps to a well-defined zero value.

use serde::Serialize;
use serde_json::Value;

/// Record key of the request id slot
pub const KEY_REQUEST_ID: &str = "request_id";
/// Record key of the user info slot
pub const KEY_USER_INFO: &str = "user_info";
/// Record key of the source slot
pub const KEY_SOURCE: &str = "source";

/// Prefix of request ids generated on demand
pub const GENERATED_REQUEST_ID_PREFIX: &str = "gen-";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallContext {
    request_id: String,
    user_info: Option<Value>,
    source: Option<Value>,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `request_id`, generating `gen-<uuid>` when it is empty
    ///
    /// ```
    /// use logfacade::CallContext;
    ///
    /// let ctx = CallContext::new().with_request_id("");
    /// assert!(ctx.request_id().starts_with("gen-"));
    /// ```
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        let request_id = request_id.into();
        self.request_id = if request_id.is_empty() {
            format!("{}{}", GENERATED_REQUEST_ID_PREFIX, uuid::Uuid::new_v4())
        } else {
            request_id
        };
        self
    }

    /// Store user info; `Value::Null` leaves the context unchanged
    #[must_use]
    pub fn with_user_info(mut self, user_info: Value) -> Self {
        if !user_info.is_null() {
            self.user_info = Some(user_info);
        }
        self
    }

    /// Store any serializable user info
    ///
    /// A value that fails to serialize is treated like an absent one.
    #[must_use]
    pub fn with_user_info_of<T: Serialize>(self, user_info: &T) -> Self {
        match serde_json::to_value(user_info) {
            Ok(value) => self.with_user_info(value),
            Err(_) => self,
        }
    }

    /// Store the source tag; `Value::Null` leaves the context unchanged
    #[must_use]
    pub fn with_source(mut self, source: Value) -> Self {
        if !source.is_null() {
            self.source = Some(source);
        }
        self
    }

    /// Store any serializable source tag
    #[must_use]
    pub fn with_source_of<T: Serialize>(self, source: &T) -> Self {
        match serde_json::to_value(source) {
            Ok(value) => self.with_source(value),
            Err(_) => self,
        }
    }

    /// Request id, or `""` when unset
    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn user_info(&self) -> Option<&Value> {
        self.user_info.as_ref()
    }

    pub fn source(&self) -> Option<&Value> {
        self.source.as_ref()
    }
}

/// Store `request_id` on `ctx`, generating one when it is empty
pub fn set_request_id(ctx: CallContext, request_id: &str) -> CallContext {
    ctx.with_request_id(request_id)
}

/// Request id of `ctx`, `""` when the context or the id is absent
pub fn get_request_id(ctx: Option<&CallContext>) -> &str {
    ctx.map(CallContext::request_id).unwrap_or("")
}

pub fn set_user_info(ctx: CallContext, user_info: Value) -> CallContext {
    ctx.with_user_info(user_info)
}

pub fn get_user_info(ctx: Option<&CallContext>) -> Option<&Value> {
    ctx.and_then(CallContext::user_info)
}

pub fn set_source(ctx: CallContext, source: Value) -> CallContext {
    ctx.with_source(source)
}

pub fn get_source(ctx: Option<&CallContext>) -> Option<&Value> {
    ctx.and_then(CallContext::source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_request_id() {
        let ctx = set_request_id(CallContext::new(), "");
        let id = get_request_id(Some(&ctx));
        assert!(id.starts_with("gen-"));
        // prefix + hyphenated uuid
        assert_eq!(id.len(), 4 + 36);
    }

    #[test]
    fn test_explicit_request_id() {
        let ctx = set_request_id(CallContext::new(), "abc");
        assert_eq!(get_request_id(Some(&ctx)), "abc");
    }

    #[test]
    fn test_absent_context() {
        assert_eq!(get_request_id(None), "");
        assert!(get_user_info(None).is_none());
        assert!(get_source(None).is_none());
        assert_eq!(CallContext::new().request_id(), "");
    }

    #[test]
    fn test_null_is_noop() {
        let ctx = set_user_info(CallContext::new(), json!({"id": 7}));
        let ctx = set_user_info(ctx, Value::Null);
        assert_eq!(get_user_info(Some(&ctx)), Some(&json!({"id": 7})));

        let ctx = set_source(ctx, Value::Null);
        assert!(get_source(Some(&ctx)).is_none());
    }

    #[test]
    fn test_serializable_slots() {
        #[derive(Serialize)]
        struct User {
            id: u32,
            name: &'static str,
        }

        let ctx = CallContext::new()
            .with_user_info_of(&User { id: 1, name: "ana" })
            .with_source_of(&"billing");
        assert_eq!(ctx.user_info(), Some(&json!({"id": 1, "name": "ana"})));
        assert_eq!(ctx.source(), Some(&json!("billing")));
    }
}
