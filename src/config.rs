use crate::fields::Fields;
use crate::level::Severity;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::env;

pub const AWS_REGION: &str = "AWS_REGION";
pub const AWS_DEFAULT_REGION: &str = "AWS_DEFAULT_REGION";
pub const FUNCTION_MEMORY_SIZE: &str = "AWS_LAMBDA_FUNCTION_MEMORY_SIZE";
pub const FUNCTION_NAME: &str = "AWS_LAMBDA_FUNCTION_NAME";
pub const FUNCTION_VERSION: &str = "AWS_LAMBDA_FUNCTION_VERSION";
pub const ENVIRONMENT: &str = "ENVIRONMENT";
pub const STAGE: &str = "STAGE";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// Read-only view of environment variables.
///
/// Loggers look values up through this trait instead of calling `std::env`
/// directly, which lets tests hand in a plain map.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Option<String>;

    /// Like `var`, but treats an empty value as unset.
    fn non_empty(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Execution-environment metadata stamped on every record.
///
/// Most of these are supplied by the AWS Lambda runtime. Values the
/// environment does not provide stay `None` and are left out of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_memory_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
}

impl DefaultFields {
    /// Load default fields from the given environment.
    ///
    /// Environment variables:
    /// - AWS_REGION, falling back to AWS_DEFAULT_REGION
    /// - AWS_LAMBDA_FUNCTION_MEMORY_SIZE
    /// - AWS_LAMBDA_FUNCTION_NAME
    /// - AWS_LAMBDA_FUNCTION_VERSION
    /// - ENVIRONMENT, falling back to STAGE
    ///
    /// An empty primary variable defers to its alias. Variables without an
    /// alias keep an empty value as-is.
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let aws_region = env
            .non_empty(AWS_REGION)
            .or_else(|| env.var(AWS_DEFAULT_REGION));

        let stage = env
            .non_empty(ENVIRONMENT)
            .or_else(|| env.var(STAGE));

        Self {
            aws_region,
            function_memory_size: env.var(FUNCTION_MEMORY_SIZE),
            function_name: env.var(FUNCTION_NAME),
            function_version: env.var(FUNCTION_VERSION),
            stage,
        }
    }

    /// Render as a field map, skipping unset values.
    pub fn to_fields(&self) -> Fields {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => fields,
            _ => Fields::new(),
        }
    }
}

/// Minimum enabled severity according to LOG_LEVEL (default: DEBUG).
///
/// Read fresh on every call so a changed environment takes effect without
/// rebuilding loggers.
pub fn min_severity(env: &dyn EnvSource) -> Severity {
    Severity::parse_or_debug(env.var(LOG_LEVEL).as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn primary_variables_win_over_aliases() {
        let env = env_of(&[
            (AWS_REGION, "eu-west-1"),
            (AWS_DEFAULT_REGION, "us-east-1"),
            (ENVIRONMENT, "prod"),
            (STAGE, "dev"),
        ]);

        let defaults = DefaultFields::from_env(&env);
        assert_eq!(defaults.aws_region.as_deref(), Some("eu-west-1"));
        assert_eq!(defaults.stage.as_deref(), Some("prod"));
    }

    #[test]
    fn aliases_fill_in_when_primary_missing_or_empty() {
        let env = env_of(&[
            (AWS_REGION, ""),
            (AWS_DEFAULT_REGION, "us-east-1"),
            (STAGE, "dev"),
        ]);

        let defaults = DefaultFields::from_env(&env);
        assert_eq!(defaults.aws_region.as_deref(), Some("us-east-1"));
        assert_eq!(defaults.stage.as_deref(), Some("dev"));
    }

    #[test]
    fn empty_values_without_alias_are_kept() {
        let env = env_of(&[
            (FUNCTION_NAME, ""),
            (FUNCTION_VERSION, "7"),
            (ENVIRONMENT, ""),
            (STAGE, ""),
        ]);

        let defaults = DefaultFields::from_env(&env);
        assert_eq!(defaults.function_name.as_deref(), Some(""));
        assert_eq!(defaults.stage.as_deref(), Some(""));
        assert_eq!(defaults.aws_region, None);
        assert_eq!(
            Value::Object(defaults.to_fields()),
            json!({ "functionName": "", "functionVersion": "7", "stage": "" })
        );
    }

    #[test]
    fn unset_values_are_left_out_of_fields() {
        let env = env_of(&[
            (FUNCTION_NAME, "orders"),
            (FUNCTION_MEMORY_SIZE, "512"),
        ]);

        let fields = DefaultFields::from_env(&env).to_fields();
        assert_eq!(
            Value::Object(fields),
            json!({ "functionName": "orders", "functionMemorySize": "512" })
        );
    }

    #[test]
    fn log_level_defaults_to_debug() {
        assert_eq!(min_severity(&env_of(&[])), Severity::Debug);
        assert_eq!(min_severity(&env_of(&[(LOG_LEVEL, "nonsense")])), Severity::Debug);
        assert_eq!(min_severity(&env_of(&[(LOG_LEVEL, "WARN")])), Severity::Warn);
    }
}
