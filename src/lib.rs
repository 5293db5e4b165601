//! Contextual structured logging.
//!
//! A [`LogFactory`] hands out named [`Logger`]s that share one
//! [`LogContext`]. Every record a logger writes is the environment-derived
//! defaults, overlaid with the current context, overlaid with the call's own
//! fields. LOG_LEVEL filtering happens in the logger; engines only serialize
//! and write.
//!
//! ```
//! use ctxlog::{fields, LogContext, LogFactory, MemoryEngineFactory};
//!
//! let memory = MemoryEngineFactory::new();
//! let factory = LogFactory::new(LogContext::new()).with_engine_factory(memory.clone());
//! let logger = factory.create_logger("orders", None);
//!
//! logger.set_context("reqId", "abc-123");
//! logger.info("order placed", fields! { "orderId" => 42 }).unwrap();
//!
//! let record = &memory.records()[0];
//! assert_eq!(record.fields["reqId"], "abc-123");
//! assert_eq!(record.fields["orderId"], 42);
//! ```

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod fields;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod telemetry;

use lazy_static::lazy_static;

pub use config::{DefaultFields, EnvSource, ProcessEnv};
pub use context::LogContext;
pub use engine::{
    CapturedRecord, EngineFactory, EngineOptions, JsonLineEngineFactory, LogEngine,
    MemoryEngineFactory, Serializers, TracingEngineFactory,
};
pub use error::LogError;
pub use fields::Fields;
pub use level::Severity;
pub use logger::{ErrorDetails, LogFactory, Logger};
pub use serde_json::Value;

lazy_static! {
    /// Process-wide context shared by [`LOG_FACTORY`].
    pub static ref LOG_CONTEXT: LogContext = LogContext::new();

    /// Ready-made factory writing JSON lines to stdout, configured from the
    /// process environment.
    pub static ref LOG_FACTORY: LogFactory = LogFactory::new(LOG_CONTEXT.clone());
}
