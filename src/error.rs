//! Error types for the goal orchestrator.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Goal decomposition errors.
#[derive(Debug, thiserror::Error)]
pub enum DecomposeError {
    /// The model replied, but not with a usable `subtasks` plan.
    #[error("LLM response is not structured correctly: {reason}")]
    Malformed { reason: String },

    #[error("Failed to parse goal: {0}")]
    Llm(#[from] LlmError),
}

/// Automation service (CRM bridge) errors.
#[derive(Debug, thiserror::Error)]
pub enum AutomationError {
    #[error("Automation request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response format from automation service: {0}")]
    InvalidResponse(String),
}

/// Sales aggregation errors.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Sales total is not a finite number ({0})")]
    NonFiniteTotal(f64),
}

/// Errors surfaced by the HTTP handlers.
///
/// Every variant renders as `{"error": "..."}`; only missing or invalid
/// client input maps to 400, the rest to 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Decompose(#[from] DecomposeError),

    #[error(transparent)]
    Automation(#[from] AutomationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
