//! Mapping from [`Error`] to HTTP responses.

use crate::error::{Error, ErrorCode};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let status = StatusCode::from_u16(code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Not-found answers carry no body
        if code == ErrorCode::TodoNotFound {
            return status.into_response();
        }

        if status.is_server_error() {
            error!(code = code.as_str(), error = %self, "request failed");
        }
        (status, Json(self.to_structured_json())).into_response()
    }
}
