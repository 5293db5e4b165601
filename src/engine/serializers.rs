use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Rewrites the value of one named field before it is written.
pub type Serializer = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Field name to serializer table applied by an engine to each record.
#[derive(Clone, Default)]
pub struct Serializers {
    by_field: BTreeMap<String, Serializer>,
}

impl Serializers {
    /// An empty table; fields are written untouched.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in `err`, `req` and `res` serializers.
    pub fn standard() -> Self {
        Self::new()
            .with("err", err)
            .with("req", req)
            .with("res", res)
    }

    /// Add or replace the serializer for `field`.
    pub fn with<F>(mut self, field: impl Into<String>, serializer: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self.by_field.insert(field.into(), Arc::new(serializer));
        self
    }

    /// This table overlaid with `custom`; entries in `custom` win.
    pub fn merged_with(mut self, custom: Serializers) -> Self {
        self.by_field.extend(custom.by_field);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Serializer> {
        self.by_field.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.by_field.keys().map(String::as_str)
    }

    /// Run every matching serializer over `fields` in place.
    pub fn apply(&self, fields: &mut Map<String, Value>) {
        for (name, value) in fields.iter_mut() {
            if let Some(serializer) = self.by_field.get(name) {
                *value = serializer(value);
            }
        }
    }
}

impl fmt::Debug for Serializers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.by_field.keys()).finish()
    }
}

/// JavaScript-style truthiness of an optional member.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Copy the listed members of `object` that are present.
fn pick(object: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .filter_map(|key| object.get(*key).map(|v| (key.to_string(), v.clone())))
        .collect()
}

/// Error objects: message, name, stack and the optional code/signal.
///
/// Anything without a `stack` is not treated as an error and passes through.
pub fn err(value: &Value) -> Value {
    match value {
        Value::Object(object) if truthy(object.get("stack")) => {
            Value::Object(pick(object, &["message", "name", "stack", "code", "signal"]))
        }
        other => other.clone(),
    }
}

/// HTTP requests: method, url, headers and the remote peer taken from
/// `connection`.
///
/// Anything without a `connection` passes through.
pub fn req(value: &Value) -> Value {
    match value {
        Value::Object(object) if truthy(object.get("connection")) => {
            let mut out = pick(object, &["method", "url", "headers"]);
            if let Some(Value::Object(connection)) = object.get("connection") {
                out.extend(pick(connection, &["remoteAddress", "remotePort"]));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// HTTP responses: status code and header block.
///
/// Anything without a non-zero `statusCode` passes through.
pub fn res(value: &Value) -> Value {
    match value {
        Value::Object(object) if truthy(object.get("statusCode")) => {
            Value::Object(pick(object, &["statusCode", "header"]))
        }
        other => other.clone(),
    }
}
