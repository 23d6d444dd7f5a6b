//! Error types and exit codes for rewardkit
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (file access, provider errors, missing credentials)
//! - 2: Usage error (bad flags/args, invalid values, missing model settings)
//! - 3: Data error (rubric or dataset record not found, invalid config)

mod macros;

use thiserror::Error;

/// Exit codes for the rewardkit CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing rubric/record, invalid config (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during rewardkit operations
#[derive(Error, Debug)]
pub enum RewardError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    #[error("model_info is missing required setting: {field}")]
    MissingModelSetting { field: String },

    #[error("unsupported {context}: {value} (supported: {supported})")]
    Unsupported {
        context: String,
        value: String,
        supported: String,
    },

    // Data errors (exit code 3)
    #[error("rubric not found: {rubric_id} (in {source_label})")]
    RubricNotFound {
        rubric_id: String,
        source_label: String,
    },

    #[error("invalid rubric config {source_label}: {reason}")]
    InvalidConfig {
        source_label: String,
        reason: String,
    },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("missing API key for provider '{provider}': set {env_var} or configure model_info.api_key")]
    MissingCredential { provider: String, env_var: String },

    #[error("model not found: {detail}")]
    ModelNotFound { detail: String },

    #[error("provider request failed: {detail}")]
    ProviderRequest { detail: String },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperationWithTarget {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl RewardError {
    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        RewardError::FailedOperationWithTarget {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or malformed input
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        RewardError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        RewardError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an unsupported value
    pub fn unsupported(
        context: &str,
        value: impl std::fmt::Display,
        supported: impl std::fmt::Display,
    ) -> Self {
        RewardError::Unsupported {
            context: context.to_string(),
            value: value.to_string(),
            supported: supported.to_string(),
        }
    }

    /// Create an error for a malformed rubric config document
    pub fn invalid_config(source_label: impl Into<String>, reason: impl Into<String>) -> Self {
        RewardError::InvalidConfig {
            source_label: source_label.into(),
            reason: reason.into(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RewardError::UsageError(_)
            | RewardError::InvalidValue { .. }
            | RewardError::MissingModelSetting { .. }
            | RewardError::Unsupported { .. } => ExitCode::Usage,

            RewardError::RubricNotFound { .. }
            | RewardError::InvalidConfig { .. }
            | RewardError::NotFound { .. } => ExitCode::Data,

            RewardError::MissingCredential { .. }
            | RewardError::ModelNotFound { .. }
            | RewardError::ProviderRequest { .. }
            | RewardError::Yaml(_)
            | RewardError::Json(_)
            | RewardError::Toml(_)
            | RewardError::FailedOperationWithTarget { .. }
            | RewardError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            RewardError::UsageError(_) => "usage_error",
            RewardError::InvalidValue { .. } => "invalid_value",
            RewardError::MissingModelSetting { .. } => "missing_model_setting",
            RewardError::Unsupported { .. } => "unsupported",
            RewardError::RubricNotFound { .. } => "rubric_not_found",
            RewardError::InvalidConfig { .. } => "invalid_config",
            RewardError::NotFound { .. } => "not_found",
            RewardError::MissingCredential { .. } => "missing_credential",
            RewardError::ModelNotFound { .. } => "model_not_found",
            RewardError::ProviderRequest { .. } => "provider_request",
            RewardError::Yaml(_) => "yaml_error",
            RewardError::Json(_) => "json_error",
            RewardError::Toml(_) => "toml_error",
            RewardError::FailedOperationWithTarget { .. } => "failed_operation_with_target",
            RewardError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let RewardError::MissingCredential { env_var, .. } = self {
            error_obj["env_var"] = serde_json::json!(env_var);
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for rewardkit operations
pub type Result<T> = std::result::Result<T, RewardError>;
