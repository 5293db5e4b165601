//! Engines that turn a finished record into output.
//!
//! The wrapper decides *whether* and *what* to log; an engine decides how a
//! record is serialized and where it goes. Each `create_logger` call asks an
//! [`EngineFactory`] for a fresh engine.

pub mod json_line;
pub mod memory;
pub mod serializers;
pub mod trace_bridge;

use crate::error::LogError;
use crate::fields::Fields;
use crate::level::Severity;
use std::sync::Arc;

pub use self::json_line::{JsonLineEngine, JsonLineEngineFactory};
pub use self::memory::{CapturedRecord, MemoryEngine, MemoryEngineFactory};
pub use self::serializers::{Serializer, Serializers};
pub use self::trace_bridge::{TracingEngine, TracingEngineFactory};

/// Settings an engine is built with.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Logger name stamped on every record.
    pub name: String,
    /// Per-field serializers applied before output.
    pub serializers: Serializers,
}

/// Writes one record per call.
///
/// Engines write every record they are given; LOG_LEVEL filtering happens
/// in [`Logger`](crate::Logger) before a record reaches them.
pub trait LogEngine: Send + Sync {
    fn emit(&self, severity: Severity, fields: Fields, msg: &str) -> Result<(), LogError>;
}

/// Builds a new engine for each logger.
pub trait EngineFactory: Send + Sync {
    fn build(&self, options: EngineOptions) -> Arc<dyn LogEngine>;
}
