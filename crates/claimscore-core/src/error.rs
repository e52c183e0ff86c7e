//! Error types and exit codes for claimscore
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (judge, pipeline, extraction, IO)
//! - 2: Usage error (bad flags, invalid configuration)
//! - 3: Data error (malformed ground truth, unknown run)
//! - 130: Run cancelled

mod macros;

use std::path::PathBuf;

use thiserror::Error;

use crate::judge::JudgeOperation;

/// Exit codes for the claimscore CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args/config (2)
    Usage = 2,
    /// Data error - malformed input, unknown run (3)
    Data = 3,
    /// Cancelled by the user (130)
    Cancelled = 130,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur while evaluating a RAG pipeline
#[derive(Error, Debug)]
pub enum EvalError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or yaml)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("malformed input in {path:?}: {reason}")]
    MalformedInput { path: PathBuf, reason: String },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Evaluation failures (exit code 1)
    #[error("claim extraction failed: {reason}")]
    Extraction { reason: String },

    #[error("judge {operation} failed: {reason}")]
    Oracle {
        operation: JudgeOperation,
        reason: String,
    },

    #[error("pipeline failed: {reason}")]
    Pipeline { reason: String },

    #[error("evaluation cancelled")]
    Cancelled,

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

impl EvalError {
    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        EvalError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        EvalError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a failed judge invocation
    pub fn oracle(operation: JudgeOperation, reason: impl std::fmt::Display) -> Self {
        EvalError::Oracle {
            operation,
            reason: reason.to_string(),
        }
    }

    /// Create an error for a failed pipeline invocation
    pub fn pipeline(reason: impl std::fmt::Display) -> Self {
        EvalError::Pipeline {
            reason: reason.to_string(),
        }
    }

    /// Create an error for an input file that could not be parsed
    pub fn malformed(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        EvalError::MalformedInput {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            EvalError::UnknownFormat(_)
            | EvalError::UsageError(_)
            | EvalError::InvalidValue { .. } => ExitCode::Usage,

            EvalError::MalformedInput { .. } | EvalError::NotFound { .. } => ExitCode::Data,

            EvalError::Cancelled => ExitCode::Cancelled,

            EvalError::Extraction { .. }
            | EvalError::Oracle { .. }
            | EvalError::Pipeline { .. }
            | EvalError::Io(_)
            | EvalError::Yaml(_)
            | EvalError::Json(_)
            | EvalError::Toml(_)
            | EvalError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            EvalError::UnknownFormat(_) => "unknown_format",
            EvalError::UsageError(_) => "usage_error",
            EvalError::InvalidValue { .. } => "invalid_value",
            EvalError::MalformedInput { .. } => "malformed_input",
            EvalError::NotFound { .. } => "not_found",
            EvalError::Extraction { .. } => "extraction_error",
            EvalError::Oracle { .. } => "oracle_error",
            EvalError::Pipeline { .. } => "pipeline_error",
            EvalError::Cancelled => "cancelled",
            EvalError::Io(_) => "io_error",
            EvalError::Yaml(_) => "yaml_error",
            EvalError::Json(_) => "json_error",
            EvalError::Toml(_) => "toml_error",
            EvalError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        let mut error_obj = serde_json::json!({
            "code": self.exit_code() as i32,
            "type": self.error_type(),
            "message": self.to_string(),
        });

        if let EvalError::Oracle { operation, .. } = self {
            error_obj["operation"] = serde_json::json!(operation.name());
        }

        serde_json::json!({ "error": error_obj })
    }
}

/// Result type alias for claimscore operations
pub type Result<T> = std::result::Result<T, EvalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            EvalError::malformed("gt.json", "bad").exit_code(),
            ExitCode::Data
        );
        assert_eq!(EvalError::Cancelled.exit_code(), ExitCode::Cancelled);
        assert_eq!(
            EvalError::invalid_value("concurrency", 0).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            EvalError::Extraction {
                reason: "empty".to_string()
            }
            .exit_code(),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_oracle_json_includes_operation() {
        let err = EvalError::oracle(JudgeOperation::CompareClaims, "timeout");
        let json = err.to_json();
        assert_eq!(json["error"]["type"], "oracle_error");
        assert_eq!(json["error"]["operation"], "CompareClaims");
        assert_eq!(json["error"]["code"], 1);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("timeout"));
    }
}
