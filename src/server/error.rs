//! Translation of store-layer failures into HTTP responses.
//!
//! Every error becomes `{ "error": msg }` with a 4xx/5xx status. Unexpected
//! persistence failures return a generic message; the detail is logged
//! server-side only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::types::errors::{FaviconError, IconError, LinkError, SettingsError};

/// HTTP-facing error: status code plus client-visible message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Unauthorized".to_string(),
        }
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "internal server error");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<LinkError> for ApiError {
    fn from(err: LinkError) -> Self {
        match err {
            LinkError::NotFound(_) | LinkError::ChildNotFound(_) | LinkError::ParentNotFound(_) => {
                Self {
                    status: StatusCode::NOT_FOUND,
                    message: err.to_string(),
                }
            }
            LinkError::MissingField(_) => Self::bad_request(err.to_string()),
            LinkError::DatabaseError(_) => Self::internal(err),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::InvalidKey(_) | SettingsError::InvalidValue(_) => {
                Self::bad_request(err.to_string())
            }
            SettingsError::SerializationError(_) | SettingsError::DatabaseError(_) => {
                Self::internal(err)
            }
        }
    }
}

impl From<IconError> for ApiError {
    fn from(err: IconError) -> Self {
        match err {
            IconError::NotConfigured => Self::bad_request(
                "Icon upload is not available; provide a faviconUrl instead",
            ),
            IconError::NetworkError(_) | IconError::ServiceError(_) => Self::internal(err),
        }
    }
}

impl From<FaviconError> for ApiError {
    fn from(err: FaviconError) -> Self {
        match err {
            FaviconError::InvalidUrl(_) => Self::bad_request(err.to_string()),
            FaviconError::NetworkError(_) => Self::internal(err),
        }
    }
}
