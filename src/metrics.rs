use crate::error::LogError;
use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();
}

fn create_record_metrics() -> Result<(IntCounterVec, IntCounterVec), LogError> {
    let emitted = IntCounterVec::new(
        Opts::new(
            "ctxlog_records_emitted_total",
            "Total number of log records handed to an engine"
        ),
        &["level"],
    ).map_err(|e| LogError::Config(format!("Failed to create records_emitted metric: {}", e)))?;

    let filtered = IntCounterVec::new(
        Opts::new(
            "ctxlog_records_filtered_total",
            "Total number of log calls dropped by the LOG_LEVEL threshold"
        ),
        &["level"],
    ).map_err(|e| LogError::Config(format!("Failed to create records_filtered metric: {}", e)))?;

    Ok((emitted, filtered))
}

fn create_failure_metrics() -> Result<IntCounter, LogError> {
    IntCounter::new(
        "ctxlog_engine_write_failures_total",
        "Total number of records an engine failed to write"
    ).map_err(|e| LogError::Config(format!("Failed to create engine_write_failures metric: {}", e)))
}

// Fallbacks keep these statics infallible.
lazy_static! {
    pub static ref RECORDS_EMITTED: IntCounterVec = create_record_metrics().ok().map(|m| m.0).unwrap_or_else(|| {
        IntCounterVec::new(Opts::new("fallback_records_emitted", "Fallback metric"), &["level"]).unwrap()
    });
    pub static ref RECORDS_FILTERED: IntCounterVec = create_record_metrics().ok().map(|m| m.1).unwrap_or_else(|| {
        IntCounterVec::new(Opts::new("fallback_records_filtered", "Fallback metric"), &["level"]).unwrap()
    });
    pub static ref ENGINE_WRITE_FAILURES: IntCounter = create_failure_metrics().ok().unwrap_or_else(|| {
        IntCounter::new("fallback_engine_write_failures", "Fallback metric").unwrap()
    });
}

/// Register the logging metrics with the crate registry.
///
/// Counters are updated whether or not this is called; registering only
/// makes them visible through [`gather_metrics`]. Calling it twice returns
/// an error for the duplicate registration.
pub fn init_metrics() -> Result<(), LogError> {
    REGISTRY.register(Box::new(RECORDS_EMITTED.clone()))
        .map_err(|e| LogError::Config(format!("Failed to register records_emitted: {}", e)))?;

    REGISTRY.register(Box::new(RECORDS_FILTERED.clone()))
        .map_err(|e| LogError::Config(format!("Failed to register records_filtered: {}", e)))?;

    REGISTRY.register(Box::new(ENGINE_WRITE_FAILURES.clone()))
        .map_err(|e| LogError::Config(format!("Failed to register engine_write_failures: {}", e)))?;

    Ok(())
}

/// Get the metrics in Prometheus exposition format.
pub fn gather_metrics() -> Result<String, LogError> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];

    encoder.encode(&metric_families, &mut buffer)
        .map_err(|e| LogError::Config(format!("Failed to encode metrics: {}", e)))?;

    String::from_utf8(buffer)
        .map_err(|e| LogError::Config(format!("Failed to convert metrics to UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_counters_show_up_in_exposition() {
        // Other tests may have registered already; only the outcome matters.
        let _ = init_metrics();
        RECORDS_EMITTED.with_label_values(&["INFO"]).inc();

        let text = gather_metrics().unwrap();
        assert!(text.contains("ctxlog_records_emitted_total"));
    }
}
