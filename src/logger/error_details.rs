use crate::fields::Fields;
use serde_json::Value;
use std::backtrace::BacktraceStatus;
use std::error::Error as StdError;
use std::fmt::Write as _;

/// Normalized view of an error attached to a warn/error call.
///
/// Merged into the record as `errorMessage`, `errorName` and `stackTrace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetails {
    pub name: String,
    pub message: String,
    pub stack: String,
}

impl ErrorDetails {
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: stack.into(),
        }
    }

    /// Details for an `anyhow::Error`, including its captured backtrace.
    ///
    /// The backtrace is only present when `RUST_BACKTRACE` or
    /// `RUST_LIB_BACKTRACE` enabled capture where the error was created.
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let name = "Error".to_string();
        let message = err.to_string();
        let mut stack = format!("{}: {}", name, message);
        for cause in err.chain().skip(1) {
            let _ = write!(stack, "\nCaused by: {}", cause);
        }

        let backtrace = err.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            let _ = write!(stack, "\n{}", backtrace);
        }

        Self {
            name,
            message,
            stack,
        }
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("errorMessage".into(), Value::String(self.message));
        fields.insert("errorName".into(), Value::String(self.name));
        fields.insert("stackTrace".into(), Value::String(self.stack));
        fields
    }
}

impl<E: StdError + ?Sized> From<&E> for ErrorDetails {
    fn from(err: &E) -> Self {
        let name = short_type_name::<E>().to_string();
        let message = err.to_string();
        let mut stack = format!("{}: {}", name, message);

        let mut source = err.source();
        while let Some(cause) = source {
            let _ = write!(stack, "\nCaused by: {}", cause);
            source = cause.source();
        }

        Self {
            name,
            message,
            stack,
        }
    }
}

/// Last path segment of a type name, generics stripped.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct ConnectionRefused {
        source: std::io::Error,
    }

    impl fmt::Display for ConnectionRefused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("database unreachable")
        }
    }

    impl StdError for ConnectionRefused {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.source)
        }
    }

    #[test]
    fn std_error_uses_type_name_and_chain() {
        let err = ConnectionRefused {
            source: std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "port 5432"),
        };

        let details = ErrorDetails::from(&err);
        assert_eq!(details.name, "ConnectionRefused");
        assert_eq!(details.message, "database unreachable");
        assert_eq!(
            details.stack,
            "ConnectionRefused: database unreachable\nCaused by: port 5432"
        );
    }

    #[test]
    fn parse_errors_get_their_own_name() {
        let err = "abc".parse::<u32>().unwrap_err();
        let details = ErrorDetails::from(&err);
        assert_eq!(details.name, "ParseIntError");
        assert!(details.stack.starts_with("ParseIntError: "));
    }

    #[test]
    fn anyhow_chain_is_rendered() {
        let err = anyhow::anyhow!("root cause").context("loading orders");
        let details = ErrorDetails::from_anyhow(&err);

        assert_eq!(details.message, "loading orders");
        assert!(details.stack.starts_with("Error: loading orders\nCaused by: root cause"));
    }

    #[test]
    fn fields_use_camel_case_keys() {
        let fields = ErrorDetails::new("TypeError", "bad", "TypeError: bad").into_fields();
        assert_eq!(fields["errorMessage"], "bad");
        assert_eq!(fields["errorName"], "TypeError");
        assert_eq!(fields["stackTrace"], "TypeError: bad");
        assert_eq!(fields.len(), 3);
    }
}
