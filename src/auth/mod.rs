//! PSK-based authentication and caller identity.
//!
//! The PSK gate uses constant-time comparison to mitigate timing attacks.
//! Identity comes from a header set by the upstream login and is handed to
//! handlers as an explicit [`CurrentEmployee`] value.

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, AppError, AppErrorWithRevision, ErrorDetails, ErrorResponse};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the authenticated employee's display name.
pub const EMPLOYEE_HEADER: &str = "x-employee-name";

/// PSK authentication layer function that takes the expected PSK as a parameter.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // If no PSK is configured, allow all requests (dev mode)
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    match provided {
        Some(provided_key) => {
            if constant_time_compare(&provided_key, &expected) {
                next.run(request).await
            } else {
                unauthorized_response("Invalid API key")
            }
        }
        None => {
            // Also check Authorization header as bearer token
            let bearer = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.to_string());

            match bearer {
                Some(bearer_key) if constant_time_compare(&bearer_key, &expected) => {
                    next.run(request).await
                }
                _ => unauthorized_response("Missing or invalid API key"),
            }
        }
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// The employee on whose behalf a request is made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentEmployee(pub String);

impl CurrentEmployee {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Read the employee name from request headers.
    ///
    /// Names are accepted as UTF-8 so non-ASCII names pass through unchanged.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(EMPLOYEE_HEADER)?;
        let name = std::str::from_utf8(value.as_bytes()).ok()?.trim();
        if name.is_empty() {
            None
        } else {
            Some(CurrentEmployee(name.to_string()))
        }
    }
}

impl<S> FromRequestParts<S> for CurrentEmployee
where
    S: Send + Sync,
{
    type Rejection = AppErrorWithRevision;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        CurrentEmployee::from_headers(&parts.headers).ok_or_else(|| AppErrorWithRevision {
            error: AppError::Unauthorized(format!("Missing {} header", EMPLOYEE_HEADER)),
            revision_id: 0,
        })
    }
}
