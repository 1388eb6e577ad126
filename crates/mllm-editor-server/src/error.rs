use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mllm_editor_core::UpstreamError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("model server error: {0}")]
    ModelServer(String),
    #[error("unexpected model response")]
    UnexpectedResponse,
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { body, .. } => ApiError::ModelServer(body),
            UpstreamError::UnexpectedResponse => ApiError::UnexpectedResponse,
            UpstreamError::Http(e) => ApiError::ServiceUnavailable(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelServer(_) | ApiError::UnexpectedResponse => {
                tracing::error!(error = %self, "model call failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::ServiceUnavailable(_) => {
                tracing::error!(error = %self, "model server unreachable");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let body = axum::Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
