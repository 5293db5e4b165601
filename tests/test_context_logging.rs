use ctxlog::{
    fields, EnvSource, ErrorDetails, JsonLineEngineFactory, LogContext, LogFactory,
    MemoryEngineFactory, Severity, Value, LOG_CONTEXT, LOG_FACTORY,
};
use serde_json::json;
use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Writer backed by a shared byte buffer.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn records(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

#[test]
fn request_scoped_context_lands_in_json_output() {
    let out = SharedBuffer::default();
    let factory = LogFactory::new(LogContext::new())
        .with_env(env(&[
            ("AWS_DEFAULT_REGION", "ap-southeast-2"),
            ("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", "1024"),
            ("AWS_LAMBDA_FUNCTION_VERSION", "$LATEST"),
            ("STAGE", "staging"),
            ("LOG_LEVEL", "info"),
        ]))
        .with_engine_factory(JsonLineEngineFactory::with_writer(out.clone()));

    let api = factory.create_logger("api", None);
    let db = factory.create_logger("db", None);

    api.set_context("reqId", "r-1");
    db.debug("connection checkout", fields! {}).unwrap();
    db.info("query", fields! { "table" => "orders", "rows" => 3 }).unwrap();

    let err = io::Error::new(io::ErrorKind::TimedOut, "upstream timed out");
    api.error("request failed", fields! { "status" => 504 }, ErrorDetails::from(&err))
        .unwrap();

    let records = out.records();
    assert_eq!(records.len(), 2);

    let query = &records[0];
    assert_eq!(query["name"], json!("db"));
    assert_eq!(query["level"], json!(30));
    assert_eq!(query["reqId"], json!("r-1"));
    assert_eq!(query["rows"], json!(3));
    assert_eq!(query["awsRegion"], json!("ap-southeast-2"));
    assert_eq!(query["functionMemorySize"], json!("1024"));
    assert_eq!(query["functionVersion"], json!("$LATEST"));
    assert_eq!(query["stage"], json!("staging"));
    assert!(query.get("functionName").is_none());

    let failure = &records[1];
    assert_eq!(failure["name"], json!("api"));
    assert_eq!(failure["level"], json!(50));
    assert_eq!(failure["msg"], json!("request failed"));
    assert_eq!(failure["status"], json!(504));
    assert_eq!(failure["errorMessage"], json!("upstream timed out"));
    assert_eq!(failure["errorName"], json!("Error"));
    assert!(failure["stackTrace"].is_string());
}

#[test]
fn separate_contexts_do_not_leak_into_each_other() {
    let memory = MemoryEngineFactory::new();
    let tenant_a = LogFactory::new(LogContext::new()).with_env(env(&[])).with_engine_factory(memory.clone());
    let tenant_b = LogFactory::new(LogContext::new()).with_env(env(&[])).with_engine_factory(memory.clone());

    tenant_a.context().set_context("tenant", "a");
    tenant_b.create_logger("b", None).info("hello", fields! {}).unwrap();

    let record = &memory.records_for("b")[0];
    assert!(!record.fields.contains_key("tenant"));
}

#[test]
fn custom_env_source_is_consulted() {
    struct FixedLevel;

    impl EnvSource for FixedLevel {
        fn var(&self, key: &str) -> Option<String> {
            (key == "LOG_LEVEL").then(|| "ERROR".to_string())
        }
    }

    let memory = MemoryEngineFactory::new();
    let logger = LogFactory::new(LogContext::new())
        .with_env(FixedLevel)
        .with_engine_factory(memory.clone())
        .create_logger("svc", None);

    assert!(!logger.is_enabled(Severity::Warn));
    assert!(logger.is_enabled(Severity::Error));
    logger.warn("ignored", fields! {}, None).unwrap();
    assert!(memory.records().is_empty());
}

#[test]
fn global_factory_shares_the_global_context() {
    let logger = LOG_FACTORY.create_logger("global", None);
    logger.set_context("globalProbe", true);

    assert_eq!(LOG_CONTEXT.get_context()["globalProbe"], json!(true));
    assert!(LOG_FACTORY.context().shares_state_with(&LOG_CONTEXT));
}
