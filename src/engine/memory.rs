use crate::engine::{EngineFactory, EngineOptions, LogEngine};
use crate::error::LogError;
use crate::fields::Fields;
use crate::level::Severity;
use std::sync::{Arc, Mutex, PoisonError};

/// One record as handed to an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRecord {
    pub logger: String,
    pub severity: Severity,
    pub msg: String,
    pub fields: Fields,
}

type Records = Arc<Mutex<Vec<CapturedRecord>>>;

/// Keeps records in memory instead of writing them anywhere.
///
/// Intended for tests that need to assert on exactly what reached the engine.
/// Serializers are applied, so captured fields match what would be written.
pub struct MemoryEngine {
    options: EngineOptions,
    records: Records,
}

impl LogEngine for MemoryEngine {
    fn emit(&self, severity: Severity, mut fields: Fields, msg: &str) -> Result<(), LogError> {
        self.options.serializers.apply(&mut fields);
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedRecord {
                logger: self.options.name.clone(),
                severity,
                msg: msg.to_string(),
                fields,
            });
        Ok(())
    }
}

/// Builds [`MemoryEngine`]s that append to one shared record list.
#[derive(Clone, Default)]
pub struct MemoryEngineFactory {
    records: Records,
    built: Arc<Mutex<usize>>,
}

impl MemoryEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything captured so far, in emission order.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records captured from loggers named `name`.
    pub fn records_for(&self, name: &str) -> Vec<CapturedRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.logger == name)
            .collect()
    }

    /// Number of engines this factory has built.
    pub fn engines_built(&self) -> usize {
        *self.built.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl EngineFactory for MemoryEngineFactory {
    fn build(&self, options: EngineOptions) -> Arc<dyn LogEngine> {
        *self.built.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Arc::new(MemoryEngine {
            options,
            records: Arc::clone(&self.records),
        })
    }
}
