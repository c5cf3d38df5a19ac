//! Public API types

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

use crate::graph::GraphError;

// Errors

pub struct ApiError(anyhow::Error);

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Status returned by Graph when the failure came from a remote call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_status: Option<u16>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.downcast_ref::<GraphError>() {
            Some(GraphError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Some(GraphError::Unauthorized { .. }) => StatusCode::UNAUTHORIZED,
            Some(GraphError::Http { .. } | GraphError::BookingFailed { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert `ApiError` into an Axum compatible response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self.0);
        } else {
            tracing::debug!("{}", self.0);
        }

        let remote_status = self
            .0
            .downcast_ref::<GraphError>()
            .and_then(GraphError::status);
        let body = ErrorResponse {
            error: self.0.to_string(),
            remote_status,
        };
        (status, Json(body)).into_response()
    }
}

/// Enables using `?` on functions that return `Result<_,
/// anyhow::Error>` to turn them into `Result<_, ApiError>`
impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

// Re-export public types from each route

pub mod directory {
    pub use crate::api::routes::directory::public::*;
}

pub mod schedule {
    pub use crate::api::routes::schedule::public::*;
}

pub mod session {
    pub use crate::api::routes::session::public::*;
}

pub mod workspace {
    pub use crate::api::routes::workspace::public::*;
}
