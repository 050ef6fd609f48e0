//! Caller identity from gateway headers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authentication happens upstream. The gateway verifies the SSO token and
//! forwards the caller as `x-user-id` / `x-organization-id` (UUIDs). Handlers
//! take an [`Identity`] parameter to require both.
//!
//! These headers are trusted as sent. The server must only be reachable
//! through that gateway, and the gateway must strip any client-supplied copy
//! before setting its own. A caller that can reach the port directly can act
//! as any organization.

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

pub const USER_HEADER: &str = "x-user-id";
pub const ORGANIZATION_HEADER: &str = "x-organization-id";

/// Authenticated caller. Use as a handler parameter to require identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub organization_id: Uuid,
}

fn header_uuid(headers: &HeaderMap, name: &str) -> Option<Uuid> {
    let raw = headers.get(name)?.to_str().ok()?;
    Uuid::parse_str(raw.trim()).ok()
}

impl Identity {
    /// Both headers present and valid UUIDs, or `None`.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            user_id: header_uuid(headers, USER_HEADER)?,
            organization_id: header_uuid(headers, ORGANIZATION_HEADER)?,
        })
    }
}

impl<S> axum::extract::FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_headers(&parts.headers).ok_or_else(|| {
            tracing::debug!(path = %parts.uri.path(), "request without identity headers");
            StatusCode::UNAUTHORIZED
        })
    }
}
