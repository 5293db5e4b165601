use crate::config::{self, EnvSource};
use crate::context::LogContext;
use crate::engine::LogEngine;
use crate::error::LogError;
use crate::fields::{self, Fields};
use crate::level::Severity;
use crate::logger::ErrorDetails;
use crate::metrics;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{trace, warn};

/// A named logger that stamps the shared context onto every record.
///
/// Built by [`LogFactory::create_logger`](crate::LogFactory::create_logger).
/// Cloning is cheap and the clone writes through the same engine.
#[derive(Clone)]
pub struct Logger {
    name: String,
    defaults: Fields,
    context: LogContext,
    env: Arc<dyn EnvSource>,
    engine: Arc<dyn LogEngine>,
}

impl Logger {
    pub(crate) fn new(
        name: String,
        defaults: Fields,
        context: LogContext,
        env: Arc<dyn EnvSource>,
        engine: Arc<dyn LogEngine>,
    ) -> Self {
        Self {
            name,
            defaults,
            context,
            env,
            engine,
        }
    }

    pub fn debug(&self, msg: &str, params: Fields) -> Result<(), LogError> {
        self.log(Severity::Debug, msg, params)
    }

    pub fn info(&self, msg: &str, params: Fields) -> Result<(), LogError> {
        self.log(Severity::Info, msg, params)
    }

    /// Log at WARN, folding `error` (if any) into the record.
    pub fn warn(
        &self,
        msg: &str,
        params: Fields,
        error: impl Into<Option<ErrorDetails>>,
    ) -> Result<(), LogError> {
        self.log(Severity::Warn, msg, with_error(params, error.into()))
    }

    /// Log at ERROR, folding `error` (if any) into the record.
    pub fn error(
        &self,
        msg: &str,
        params: Fields,
        error: impl Into<Option<ErrorDetails>>,
    ) -> Result<(), LogError> {
        self.log(Severity::Error, msg, with_error(params, error.into()))
    }

    /// Single dispatch point behind every level method.
    ///
    /// Calls below the LOG_LEVEL threshold return `Ok(())` without touching
    /// the engine. Otherwise the record is defaults, then the live context,
    /// then `params`, each layer overriding the one before it.
    pub fn log(&self, severity: Severity, msg: &str, params: Fields) -> Result<(), LogError> {
        if !self.is_enabled(severity) {
            metrics::RECORDS_FILTERED
                .with_label_values(&[severity.as_str()])
                .inc();
            trace!(logger = %self.name, level = %severity, "Log call below threshold");
            return Ok(());
        }

        let context = fields::merge(self.defaults.clone(), self.context.get_context());
        let record = fields::merge(context, params);

        match self.engine.emit(severity, record, msg) {
            Ok(()) => {
                metrics::RECORDS_EMITTED
                    .with_label_values(&[severity.as_str()])
                    .inc();
                Ok(())
            }
            Err(e) => {
                metrics::ENGINE_WRITE_FAILURES.inc();
                warn!(logger = %self.name, error = %e, "Log engine failed to write record");
                Err(e)
            }
        }
    }

    /// Whether a call at `severity` would currently reach the engine.
    ///
    /// LOG_LEVEL is re-read on every call.
    pub fn is_enabled(&self, severity: Severity) -> bool {
        severity >= config::min_severity(self.env.as_ref())
    }

    /// Upsert a key in the shared context; visible to every logger on it.
    pub fn set_context(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.context.set_context(key, value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    /// Environment-derived fields fixed when this logger was created.
    pub fn default_fields(&self) -> &Fields {
        &self.defaults
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

fn with_error(params: Fields, error: Option<ErrorDetails>) -> Fields {
    match error {
        Some(details) => fields::merge(params, details.into_fields()),
        None => params,
    }
}
