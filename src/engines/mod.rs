//! Backend adapters behind the `Engine` trait

pub mod event;
pub mod field;
pub mod output;

pub use event::EventEngine;
pub use field::FieldEngine;
pub use output::{Output, FATAL_EXIT_CODE};

use crate::core::{EngineKind, Engine, ResolvedConfig, Result};
use std::sync::Arc;

/// Construct the engine selected by `kind`
///
/// Fails only when the configured log file cannot be opened.
pub fn new_engine(kind: EngineKind, config: ResolvedConfig) -> Result<Arc<dyn Engine>> {
    let engine: Arc<dyn Engine> = match kind {
        EngineKind::Event => Arc::new(EventEngine::new(config)?),
        EngineKind::Field => Arc::new(FieldEngine::new(config)?),
    };
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::sinks::BufferSink;

    #[test]
    fn test_dispatch_by_kind() {
        let config = Config::builder()
            .console_sink(Arc::new(BufferSink::new()))
            .build()
            .resolve();

        let engine = new_engine(EngineKind::Event, config.clone()).unwrap();
        assert_eq!(engine.name(), EventEngine::NAME);

        let engine = new_engine(EngineKind::Field, config).unwrap();
        assert_eq!(engine.name(), FieldEngine::NAME);
    }

    #[test]
    fn test_unknown_name_builds_event_engine() {
        let config = Config::builder()
            .engine(EngineKind::from("logrus"))
            .console_sink(Arc::new(BufferSink::new()))
            .build();

        let engine = new_engine(config.engine, config.resolve()).unwrap();
        assert_eq!(engine.name(), "event");
    }
}
