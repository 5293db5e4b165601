use crate::engine::{EngineFactory, EngineOptions, LogEngine};
use crate::error::LogError;
use crate::fields::Fields;
use crate::level::Severity;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Forwards records into `tracing` as events.
///
/// Each event carries the logger name as `logger` and the merged fields as
/// JSON text in `fields`, so whatever subscriber is installed decides the
/// final output format.
pub struct TracingEngine {
    options: EngineOptions,
}

impl TracingEngine {
    pub fn new(options: EngineOptions) -> Self {
        Self { options }
    }
}

impl LogEngine for TracingEngine {
    fn emit(&self, severity: Severity, mut fields: Fields, msg: &str) -> Result<(), LogError> {
        self.options.serializers.apply(&mut fields);
        let fields = serde_json::to_string(&Value::Object(fields))?;
        let logger = self.options.name.as_str();

        match severity {
            Severity::Debug => debug!(logger = %logger, fields = %fields, "{}", msg),
            Severity::Info => info!(logger = %logger, fields = %fields, "{}", msg),
            Severity::Warn => warn!(logger = %logger, fields = %fields, "{}", msg),
            Severity::Error => error!(logger = %logger, fields = %fields, "{}", msg),
        }

        Ok(())
    }
}

/// Builds [`TracingEngine`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEngineFactory;

impl EngineFactory for TracingEngineFactory {
    fn build(&self, options: EngineOptions) -> Arc<dyn LogEngine> {
        Arc::new(TracingEngine::new(options))
    }
}
