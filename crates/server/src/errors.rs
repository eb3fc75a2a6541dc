use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pharmalens::PromptError;
use serde_json::json;
use tracing::error;

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within
/// the server, allowing them to be converted into appropriate HTTP responses.
pub enum AppError {
    /// A malformed or rejected request.
    BadRequest(String),
    /// The requested row does not exist (or is not owned by the caller).
    NotFound(String),
    /// Errors originating from the `pharmalens` library.
    Prompt(PromptError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<PromptError> for AppError {
    fn from(err: PromptError) -> Self {
        AppError::Prompt(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Prompt(err) => {
                // Log the original error for debugging purposes.
                error!("PromptError: {:?}", err);
                match err {
                    PromptError::AiRequest(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Request to AI gateway failed: {e}"),
                    ),
                    PromptError::AiDeserialization(e) => (
                        StatusCode::BAD_GATEWAY,
                        format!("Failed to deserialize AI gateway response: {e}"),
                    ),
                    PromptError::AiApi(e) => {
                        (StatusCode::BAD_GATEWAY, format!("AI gateway error: {e}"))
                    }
                    PromptError::StorageConnection(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Storage connection error: {e}"),
                    ),
                    PromptError::StorageOperationFailed(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Storage operation failed: {e}"),
                    ),
                    PromptError::JsonSerialization(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to serialize result: {e}"),
                    ),
                    PromptError::ReqwestClientBuild(e) => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        format!("Failed to build HTTP client: {e}"),
                    ),
                }
            }
            AppError::Internal(err) => {
                error!("Internal server error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
