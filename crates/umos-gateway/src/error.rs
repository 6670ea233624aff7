// SPDX-FileCopyrightText: 2026 Umos Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error-to-response mapping.
//!
//! Every `UmosError` class maps to exactly one status family. Response
//! bodies carry a human-readable summary only; internal error sources are
//! never serialized.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use umos_core::UmosError;

/// Wrapper turning domain errors into HTTP responses.
pub struct ApiError(pub UmosError);

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            UmosError::InvalidInput(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            UmosError::ChannelNotFound { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            UmosError::UnsupportedProvider { .. } => {
                (StatusCode::NOT_IMPLEMENTED, self.0.to_string())
            }
            UmosError::Transport { .. } => (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string()),
            UmosError::Configuration { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string())
            }
            // Storage and internal failures keep their details server-side.
            UmosError::Storage { .. }
            | UmosError::Internal(_)
            | UmosError::Config(_)
            | UmosError::DecryptionFailed => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(status = %status, error = %self.0, "request failed");
        }

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<UmosError> for ApiError {
    fn from(err: UmosError) -> Self {
        Self(err)
    }
}
