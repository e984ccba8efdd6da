//! Logging macros with `format!`-style messages.
//!
//! Each macro takes the call context, an optional error and optional
//! metadata before the message, and logs through the process-wide logger
//! unless a logger is passed to [`log!`] explicitly.
//!
//! ```
//! use logfacade::{info, kv, CallContext};
//!
//! let ctx = CallContext::new().with_request_id("req-1");
//! info!(Some(&ctx), None, Some(kv! { "items" => 3 }), "processed {} items", 3);
//! ```

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

/// Log through an explicit `Logger` at `level`.
///
/// ```
/// use logfacade::{log, Logger, LogLevel};
///
/// let logger = Logger::default();
/// log!(logger, LogLevel::Info, None, None, None, "code {}", 200);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $ctx:expr, $err:expr, $metadata:expr, $($arg:tt)+) => {
        $logger.log($level, $ctx, $err, $metadata, format_args!($($arg)+))
    };
}

/// Log a debug-level message through the process-wide logger.
#[macro_export]
macro_rules! debug {
    ($ctx:expr, $err:expr, $metadata:expr, $($arg:tt)+) => {
        $crate::facade::debugf($ctx, $err, $metadata, format_args!($($arg)+))
    };
}

/// Log an info-level message through the process-wide logger.
#[macro_export]
macro_rules! info {
    ($ctx:expr, $err:expr, $metadata:expr, $($arg:tt)+) => {
        $crate::facade::infof($ctx, $err, $metadata, format_args!($($arg)+))
    };
}

/// Log a warning-level message through the process-wide logger.
#[macro_export]
macro_rules! warn {
    ($ctx:expr, $err:expr, $metadata:expr, $($arg:tt)+) => {
        $crate::facade::warnf($ctx, $err, $metadata, format_args!($($arg)+))
    };
}

/// Log an error-level message through the process-wide logger.
#[macro_export]
macro_rules! error {
    ($ctx:expr, $err:expr, $metadata:expr, $($arg:tt)+) => {
        $crate::facade::errorf($ctx, $err, $metadata, format_args!($($arg)+))
    };
}

/// Log a fatal-level message, then terminate the process.
#[macro_export]
macro_rules! fatal {
    ($ctx:expr, $err:expr, $metadata:expr, $($arg:tt)+) => {
        $crate::facade::fatalf($ctx, $err, $metadata, format_args!($($arg)+))
    };
}

/// Build a metadata map from `key => value` pairs.
///
/// Values go through `serde_json::to_value`; one that fails to serialize
/// becomes `null`.
///
/// ```
/// use logfacade::kv;
///
/// let metadata = kv! { "user" => "ana", "attempts" => 3 };
/// assert_eq!(metadata["attempts"], 3);
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        $crate::core::Kv::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::core::Kv::new();
        $(
            map.insert(
                ::std::string::String::from($key),
                $crate::macros::__private::serde_json::to_value(&$value)
                    .unwrap_or($crate::macros::__private::serde_json::Value::Null),
            );
        )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use crate::core::{CallContext, Config, Kv, LogLevel};
    use crate::facade::Logger;
    use crate::sinks::BufferSink;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn buffered() -> (Logger, BufferSink) {
        let sink = BufferSink::new();
        let config = Config::builder()
            .use_json(true)
            .console_sink(Arc::new(sink.clone()))
            .build();
        (Logger::new(config).unwrap(), sink)
    }

    #[test]
    fn test_log_macro() {
        let (logger, sink) = buffered();
        let ctx = CallContext::new().with_request_id("m-1");
        log!(logger, LogLevel::Warn, Some(&ctx), None, None, "Formatted: {}", 42);

        let record: Value = serde_json::from_str(&sink.lines()[0]).unwrap();
        assert_eq!(record["level"], "warn");
        assert_eq!(record["message"], "Formatted: 42");
        assert_eq!(record["request_id"], "m-1");
    }

    #[test]
    fn test_kv_macro() {
        let empty: Kv = kv!();
        assert!(empty.is_empty());

        let metadata = kv! {
            "name" => "ana",
            "tags" => vec!["a", "b"],
            "nested" => json!({"password": "x"}),
        };
        assert_eq!(metadata["name"], "ana");
        assert_eq!(metadata["tags"], json!(["a", "b"]));
        assert_eq!(metadata["nested"]["password"], "x");
    }

    #[test]
    fn test_global_macros_compile() {
        debug!(None, None, None, "Debug message");
        info!(None, None, Some(kv! { "items" => 100 }), "Items: {}", 100);
        let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        warn!(None, Some(&err), None, "Retry {} of {}", 1, 3);
        error!(None, Some(&err), None, "Code: {}", 500);
    }
}
