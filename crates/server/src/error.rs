use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use finecheck::PipelineError;
use serde::{Deserialize, Serialize};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Image too large: max {0}MB allowed")]
    PayloadTooLarge(usize),

    #[error("Not found")]
    NotFound,

    /// The completion provider call failed.
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },

    /// The completion came back but held no usable JSON.
    #[error("{message}")]
    Recovery {
        message: String,
        details: Option<String>,
    },
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ServerError {
    /// Translate a pipeline failure into a 500, attaching the underlying
    /// message only when `expose_details` is set.
    pub fn from_pipeline(err: &PipelineError, message: &str, expose_details: bool) -> Self {
        let details = expose_details.then(|| match err {
            PipelineError::Provider(source) => source.to_string(),
            PipelineError::Recovery { source, .. } => source.to_string(),
        });
        match err {
            PipelineError::Provider(_) => ServerError::Upstream {
                message: message.to_string(),
                details,
            },
            PipelineError::Recovery { .. } => ServerError::Recovery {
                message: message.to_string(),
                details,
            },
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Upstream { .. } | ServerError::Recovery { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::NotFound => "NOT_FOUND",
            ServerError::Upstream { .. } => "UPSTREAM_ERROR",
            ServerError::Recovery { .. } => "RECOVERY_ERROR",
        }
    }

    fn details(&self) -> Option<String> {
        match self {
            ServerError::Upstream { details, .. } | ServerError::Recovery { details, .. } => {
                details.clone()
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            details: self.details(),
        };

        (status, Json(body)).into_response()
    }
}
