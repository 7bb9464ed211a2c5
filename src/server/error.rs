//! `BridgeError` to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::{BridgeError, ErrorCategory};

impl BridgeError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::Csrf | ErrorCategory::Request => StatusCode::BAD_REQUEST,
            ErrorCategory::Token => StatusCode::UNAUTHORIZED,
            ErrorCategory::TokenExchange | ErrorCategory::Api => StatusCode::BAD_GATEWAY,
            ErrorCategory::EmptyResult => StatusCode::NOT_FOUND,
            ErrorCategory::Configuration | ErrorCategory::Storage => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Text safe to show the caller. Internal failures are not spelled out.
    pub fn public_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Storage => {
                "internal error".to_string()
            }
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "request rejected");
        }
        (status, self.public_message()).into_response()
    }
}
