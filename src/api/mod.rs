//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod calendar;
mod matches;
mod requests;
mod revision;

pub use calendar::*;
pub use matches::*;
pub use requests::*;
pub use revision::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::models::parse_date;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Parse a `YYYY-MM-DD` path or body value.
pub(crate) fn parse_date_param(raw: &str) -> Result<NaiveDate, AppError> {
    parse_date(raw).ok_or_else(|| {
        AppError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
    })
}
