use crate::config::{DefaultFields, EnvSource, ProcessEnv};
use crate::context::LogContext;
use crate::engine::{EngineFactory, EngineOptions, JsonLineEngineFactory, Serializers};
use crate::logger::Logger;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Hands out [`Logger`]s that all share one [`LogContext`].
///
/// By default loggers read the process environment and write bunyan-style
/// JSON lines to stdout. Both can be swapped with [`LogFactory::with_env`]
/// and [`LogFactory::with_engine_factory`].
#[derive(Clone)]
pub struct LogFactory {
    context: LogContext,
    env: Arc<dyn EnvSource>,
    engines: Arc<dyn EngineFactory>,
}

impl LogFactory {
    pub fn new(context: LogContext) -> Self {
        Self {
            context,
            env: Arc::new(ProcessEnv),
            engines: Arc::new(JsonLineEngineFactory::stdout()),
        }
    }

    /// Read defaults and LOG_LEVEL from `env` instead of the process.
    pub fn with_env<E: EnvSource + 'static>(mut self, env: E) -> Self {
        self.env = Arc::new(env);
        self
    }

    /// Build engines with `engines` instead of the stdout JSON writer.
    pub fn with_engine_factory<F: EngineFactory + 'static>(mut self, engines: F) -> Self {
        self.engines = Arc::new(engines);
        self
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    /// Create a logger named `log_name`.
    ///
    /// Default fields are read from the environment now and stay fixed for
    /// the logger's lifetime. `custom_serializers` extend or override the
    /// built-in `err`/`req`/`res` set. Every call builds a new engine, even
    /// for a name that was used before.
    pub fn create_logger(&self, log_name: &str, custom_serializers: Option<Serializers>) -> Logger {
        let defaults = DefaultFields::from_env(self.env.as_ref());

        let serializers = match custom_serializers {
            Some(custom) => Serializers::standard().merged_with(custom),
            None => Serializers::standard(),
        };

        debug!(
            logger = %log_name,
            serializers = ?serializers,
            stage = ?defaults.stage,
            "Creating logger"
        );

        let engine = self.engines.build(EngineOptions {
            name: log_name.to_string(),
            serializers,
        });

        Logger::new(
            log_name.to_string(),
            defaults.to_fields(),
            self.context.clone(),
            Arc::clone(&self.env),
            engine,
        )
    }
}

impl Default for LogFactory {
    fn default() -> Self {
        Self::new(LogContext::new())
    }
}

impl fmt::Debug for LogFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogFactory")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
