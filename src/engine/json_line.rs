use crate::engine::{EngineFactory, EngineOptions, LogEngine};
use crate::error::LogError;
use crate::fields::Fields;
use crate::level::Severity;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Destination shared by every engine a factory builds.
pub type SharedSink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Writes bunyan-format JSON, one record per line.
///
/// Keys are written in bunyan order: `name`, `hostname`, `pid`, `level`, the
/// record's fields in insertion order, then `msg`, `time` and `v`. Caller
/// fields may shadow the header keys but never `msg`, `time` or `v`.
pub struct JsonLineEngine {
    options: EngineOptions,
    hostname: String,
    pid: u32,
    sink: SharedSink,
}

impl JsonLineEngine {
    pub fn new(options: EngineOptions, sink: SharedSink) -> Self {
        Self {
            options,
            hostname: local_hostname(),
            pid: std::process::id(),
            sink,
        }
    }

    /// Build the JSON object for one record without writing it.
    pub fn render(&self, severity: Severity, mut fields: Fields, msg: &str) -> Value {
        self.options.serializers.apply(&mut fields);

        let mut record = Fields::new();
        record.insert("name".into(), Value::from(self.options.name.as_str()));
        record.insert("hostname".into(), Value::from(self.hostname.as_str()));
        record.insert("pid".into(), Value::from(self.pid));
        record.insert("level".into(), Value::from(severity.bunyan_level()));
        record.extend(
            fields
                .into_iter()
                .filter(|(key, _)| !matches!(key.as_str(), "msg" | "time" | "v")),
        );
        record.insert("msg".into(), Value::from(msg));
        record.insert(
            "time".into(),
            Value::from(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        record.insert("v".into(), Value::from(0));

        Value::Object(record)
    }
}

impl LogEngine for JsonLineEngine {
    fn emit(&self, severity: Severity, fields: Fields, msg: &str) -> Result<(), LogError> {
        let mut line = serde_json::to_vec(&self.render(severity, fields, msg))?;
        line.push(b'\n');

        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        sink.write_all(&line)?;
        sink.flush()?;
        Ok(())
    }
}

/// Builds [`JsonLineEngine`]s that all write to one sink (stdout by default).
#[derive(Clone)]
pub struct JsonLineEngineFactory {
    sink: SharedSink,
}

impl JsonLineEngineFactory {
    pub fn stdout() -> Self {
        Self::with_writer(io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn sink(&self) -> SharedSink {
        Arc::clone(&self.sink)
    }
}

impl Default for JsonLineEngineFactory {
    fn default() -> Self {
        Self::stdout()
    }
}

impl EngineFactory for JsonLineEngineFactory {
    fn build(&self, options: EngineOptions) -> Arc<dyn LogEngine> {
        Arc::new(JsonLineEngine::new(options, self.sink()))
    }
}

fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string())
}
