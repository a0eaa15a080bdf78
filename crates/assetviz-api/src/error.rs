//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use assetviz_core::ValidationError;
use assetviz_graph::GraphError;

/// API error type.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed identifier; raised before any query runs.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Well-formed identifier or pair with no matching rows.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Store unreachable, namespace selection failed, or query rejected.
    #[error("Query execution failed: {0}")]
    QueryExecution(#[from] GraphError),

    /// Response encoding failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::QueryExecution(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "INVALID_ASSET_ID",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::QueryExecution(_) => "QUERY_FAILED",
            ApiError::Serialization(_) => "SERIALIZATION_FAILED",
        }
    }

    /// The message shown to clients. Internal failures never expose detail.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(_) | ApiError::NotFound(_) => self.to_string(),
            ApiError::QueryExecution(_) => "Failed to query the asset graph".to_string(),
            ApiError::Serialization(_) => "Failed to encode response".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "Request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "Request rejected");
        }

        let body = ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let invalid = ApiError::from(ValidationError::InvalidFormat {
            value: "A1".to_string(),
        });
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound("asset A99999".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(GraphError::Connection("refused".to_string())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Serialization("bad float".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_not_exposed() {
        let err = ApiError::from(GraphError::Query(
            "SyntaxError near 'MATCH (a:Asset'".to_string(),
        ));
        let message = err.public_message();
        assert!(!message.contains("SyntaxError"));
        assert!(!message.contains("MATCH"));
    }

    #[test]
    fn test_validation_message_names_value() {
        let err = ApiError::from(ValidationError::InvalidFormat {
            value: "A1".to_string(),
        });
        assert!(err.public_message().contains("A1"));
    }
}
