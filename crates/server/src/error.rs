//! JSON error responses shared by every API route.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use shoplist_core::errors::{ApplicationError, InterfaceError};
use tracing::{error, warn};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error: String,
    pub messages: Vec<String>,
    pub path: String,
    pub correlation_id: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn from_interface(error: InterfaceError, path: &str) -> Self {
        let status = match error {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            status: status.as_u16(),
            error: error.kind().to_string(),
            messages: vec![error.message().to_string(), error.user_message().to_string()],
            path: path.to_string(),
            correlation_id: error.correlation_id().to_string(),
        };
        Self { status, body }
    }

    /// Maps a service failure to its response under a fresh correlation id.
    pub fn from_application(error: impl Into<ApplicationError>, path: &str) -> Self {
        let interface = error.into().into_interface(Uuid::new_v4().to_string());
        if matches!(interface, InterfaceError::Internal { .. }) {
            error!(
                event_name = "api.request.failed",
                correlation_id = interface.correlation_id(),
                path,
                error_kind = interface.kind(),
                error = interface.message(),
                "api request failed"
            );
        } else {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = interface.correlation_id(),
                path,
                error_kind = interface.kind(),
                error = interface.message(),
                "api request rejected"
            );
        }
        Self::from_interface(interface, path)
    }

    /// Rejection raised before the request reaches a service, such as a
    /// malformed query string or body.
    pub fn bad_request(kind: &'static str, message: String, path: &str) -> Self {
        let interface = InterfaceError::BadRequest {
            kind,
            message,
            correlation_id: Uuid::new_v4().to_string(),
        };
        warn!(
            event_name = "api.request.rejected",
            correlation_id = interface.correlation_id(),
            path,
            error_kind = kind,
            error = interface.message(),
            "api request rejected"
        );
        Self::from_interface(interface, path)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
