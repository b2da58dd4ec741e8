//! Error types for the Pulse HTTP layer.
//!
//! [`ApiError`] is converted into a JSON body of the form
//! `{"error": "<message>"}` via its [`IntoResponse`] implementation.
//! Every failure in a handler ends here; nothing propagates further.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::upstream::UpstreamError;

/// Errors that can occur in the Pulse API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A required query parameter was absent or empty.
    #[error("{0} is required")]
    MissingParameter(&'static str),

    /// A query parameter was present but malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Contacting or reading the upstream service failed.
    #[error(transparent)]
    UpstreamFailure(#[from] UpstreamError),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameter(_) | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if let Self::UpstreamFailure(ref e) = self {
            warn!(error = %e, "Upstream request failed");
        }

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}
