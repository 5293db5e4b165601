use anyhow::Context;
use ctxlog::{fields, metrics, telemetry, ErrorDetails, LOG_CONTEXT, LOG_FACTORY};
use std::env;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let log_level = env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "debug".to_string())
        .to_lowercase();
    telemetry::init_telemetry(&log_level);
    metrics::init_metrics()?;

    let logger = LOG_FACTORY.create_logger("ctxlog-demo", None);

    LOG_CONTEXT.set_context("requestId", format!("req-{}", std::process::id()));
    logger.info("Demo starting", fields! { "args" => env::args().count() })?;

    logger.debug("Resolved default fields", logger.default_fields().clone())?;

    let retries = env::var("DEMO_RETRIES").unwrap_or_else(|_| "three".to_string());
    match retries.parse::<u32>().context("parsing DEMO_RETRIES") {
        Ok(count) => logger.info("Retry budget set", fields! { "retries" => count })?,
        Err(e) => logger.warn(
            "Falling back to default retry budget",
            fields! { "raw" => retries.as_str() },
            ErrorDetails::from_anyhow(&e),
        )?,
    }

    logger.set_context("phase", "shutdown");
    logger.error("Demo finished with a simulated failure", fields! {}, None)?;

    debug!(metrics = %metrics::gather_metrics()?, "Logging metrics");
    Ok(())
}
