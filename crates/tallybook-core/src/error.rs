//! Error types for tallybook-core
//!
//! The engine is a pure read/compute path: range misuse fails fast,
//! storage failures are wrapped with enough context for the caller to
//! log and display, and nothing is retried here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Required range parameters missing or inconsistent
    InvalidRange,
    /// Failure reading from the storage collaborator
    UpstreamRead,
    /// Malformed recurrence configuration on a transaction
    RecurrenceConfig,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InvalidRange => write!(f, "INVALID_RANGE"),
            ErrorCode::UpstreamRead => write!(f, "UPSTREAM_READ"),
            ErrorCode::RecurrenceConfig => write!(f, "RECURRENCE_CONFIG"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - application may be unstable
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for tallybook-core
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid range: {message}")]
    InvalidRange { message: String },

    #[error("Upstream read failed in {component} over {context}: {message}")]
    UpstreamRead {
        component: String,
        context: String,
        message: String,
    },

    #[error("Malformed recurrence on transaction {id}: {message}")]
    RecurrenceConfig { id: String, message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl EngineError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            EngineError::InvalidRange { .. } => ErrorCode::InvalidRange,
            EngineError::UpstreamRead { .. } => ErrorCode::UpstreamRead,
            EngineError::RecurrenceConfig { .. } => ErrorCode::RecurrenceConfig,
            EngineError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::InvalidRange { .. } => ErrorSeverity::Warning,
            EngineError::UpstreamRead { .. } => ErrorSeverity::Error,
            EngineError::RecurrenceConfig { .. } => ErrorSeverity::Warning,
            EngineError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Wrap a storage failure with component and range context
    pub fn upstream(
        component: &str,
        context: impl std::fmt::Display,
        cause: impl std::fmt::Display,
    ) -> Self {
        EngineError::UpstreamRead {
            component: component.to_string(),
            context: context.to_string(),
            message: cause.to_string(),
        }
    }
}

/// Result type with EngineError
pub type EngineResult<T> = Result<T, EngineError>;
