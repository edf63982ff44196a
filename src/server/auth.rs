//! Owner extraction from the auth boundary.
//!
//! The hosted auth layer in front of this server resolves the session and
//! injects the authenticated owner id as the `x-owner-id` header. This
//! server treats the id as an opaque string and never validates or renews
//! sessions itself. Requests without the header get 401.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::error::ApiError;

/// Header carrying the authenticated owner id.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Authenticated owner of the request.
pub struct Owner(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for Owner
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let owner = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        match owner {
            Some(id) => Ok(Owner(id.to_string())),
            None => Err(ApiError::unauthorized()),
        }
    }
}
