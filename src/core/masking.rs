//! Recursive, key-based masking of sensitive metadata values
//!
//! Keys are matched exactly against the configured set at every depth. A
//! nested key is checked on its own, it does not inherit sensitivity from
//! its parent.

use super::field::Kv;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Pluggable masking function
pub type MaskFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Replace every character of `value` with `*`
///
/// ```
/// assert_eq!(logfacade::core::masking::default_mask("secret"), "******");
/// ```
pub fn default_mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

/// Mask every sensitive key of `map` in place
pub fn mask_sensitive(map: &mut Kv, keys: &HashSet<String>, mask: &dyn Fn(&str) -> String) {
    if keys.is_empty() {
        return;
    }
    for (key, value) in map.iter_mut() {
        mask_value(value, keys.contains(key), keys, mask);
    }
}

fn mask_value(
    value: &mut Value,
    sensitive: bool,
    keys: &HashSet<String>,
    mask: &dyn Fn(&str) -> String,
) {
    match value {
        Value::Object(nested) => mask_sensitive(nested, keys, mask),
        // Array elements sit under their parent's key
        Value::Array(items) => {
            for item in items.iter_mut() {
                mask_value(item, sensitive, keys, mask);
            }
        }
        Value::Null => {}
        scalar if sensitive => {
            let masked = match &*scalar {
                Value::String(s) => mask(s),
                other => mask(&other.to_string()),
            };
            *scalar = Value::String(masked);
        }
        _ => {}
    }
}
