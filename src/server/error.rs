use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use crate::gateway::GatewayError;
use crate::review::ReviewError;

/// Error returned by a route, rendered as `{"detail": ...}`.
#[derive(Debug)]
pub struct ServerError {
    status: StatusCode,
    detail: String,
}

impl ServerError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }

    pub fn analysis(error: ReviewError) -> Self {
        match &error {
            ReviewError::NoFiles => Self::bad_request(error.to_string()),
            ReviewError::Gateway(inner) => Self::internal(format!("Analysis failed: {}", inner)),
        }
    }

    pub fn chat(error: GatewayError) -> Self {
        Self::internal(format!("Chat failed: {}", error))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), detail = %self.detail, "request failed");
        }

        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}
