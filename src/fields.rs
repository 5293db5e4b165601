use serde_json::{Map, Value};

/// Structured fields attached to a log record.
pub type Fields = Map<String, Value>;

/// Shallow-merge `overlay` onto `base`; keys in `overlay` win.
///
/// Nested objects are replaced wholesale, never merged key by key.
pub fn merge(mut base: Fields, overlay: Fields) -> Fields {
    base.extend(overlay);
    base
}

/// Build a field map from `key => value` pairs.
///
/// ```
/// let fields = ctxlog::fields! { "user" => "y", "attempt" => 2 };
/// assert_eq!(fields["attempt"], 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Fields::new();
        $(
            map.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        map
    }};
}
