use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber for the crate's own diagnostics.
///
/// `RUST_LOG` takes precedence; otherwise `log_level` is used as the filter.
/// Records forwarded by [`TracingEngine`](crate::engine::TracingEngine) go
/// through the same subscriber. Returns `false` if a global subscriber was
/// already installed.
pub fn init_telemetry(log_level: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
