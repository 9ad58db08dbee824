//! Swap request API endpoints.
//!
//! Writes always act on the caller's own records: the key is built from the
//! caller identity and the date in the path, never from the body.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{error, parse_date_param, success, ApiResult};
use crate::auth::CurrentEmployee;
use crate::calendar::{ensure_in_month, parse_month};
use crate::errors::AppError;
use crate::models::{record_key, DeleteOutcome, ShiftSwapRequest, UpsertSwapRequest};
use crate::AppState;

/// GET /api/requests - List every swap request.
pub async fn list_requests(State(state): State<AppState>) -> ApiResult<Vec<ShiftSwapRequest>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_requests().await {
        Ok(snapshot) => success(snapshot.requests, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/requests/mine - List the caller's swap requests.
pub async fn list_my_requests(
    State(state): State<AppState>,
    employee: CurrentEmployee,
) -> ApiResult<Vec<ShiftSwapRequest>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match state.repo.list_requests_for(employee.name()).await {
        Ok(requests) => success(requests, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/requests/mine/:date - Get one of the caller's swap requests.
pub async fn get_my_request(
    State(state): State<AppState>,
    employee: CurrentEmployee,
    Path(date): Path<String>,
) -> ApiResult<ShiftSwapRequest> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let date = match parse_date_param(&date) {
        Ok(d) => d,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.get_request(employee.name(), date).await {
        Ok(Some(request)) => success(request, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!(
                "Swap request {} not found",
                record_key(employee.name(), date)
            )),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// Validate the body and store it, returning the stored request.
async fn store_request(
    state: &AppState,
    employee: &CurrentEmployee,
    date: &str,
    body: UpsertSwapRequest,
) -> Result<ShiftSwapRequest, AppError> {
    let date = parse_date_param(date)?;

    if let Some(month) = body.month.as_deref() {
        let (year, month) = parse_month(month)?;
        ensure_in_month(date, year, month)?;
    }

    let request = ShiftSwapRequest::new(employee.name(), date, body.give_away, body.can_take);

    match body.replaces.as_deref() {
        Some(old) => {
            let old_date = parse_date_param(old)?;
            state.repo.replace_request(old_date, &request).await?;
        }
        None => {
            state.repo.upsert_request(&request).await?;
        }
    }

    if request.give_away.is_none() || request.can_take.is_empty() {
        tracing::debug!(key = %request.key(), "Stored request cannot take part in a swap yet");
    }
    tracing::info!(
        key = %request.key(),
        give_away = ?request.give_away,
        can_take = ?request.can_take.accepted(),
        "Stored swap request"
    );
    Ok(request)
}

/// PUT /api/requests/:date - Submit or overwrite the caller's swap request for a date.
pub async fn upsert_request(
    State(state): State<AppState>,
    employee: CurrentEmployee,
    Path(date): Path<String>,
    Json(body): Json<UpsertSwapRequest>,
) -> ApiResult<ShiftSwapRequest> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match store_request(&state, &employee, &date, body).await {
        Ok(request) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(request, new_revision)
        }
        Err(e) => error(e, revision_id),
    }
}

/// DELETE /api/requests/:date - Delete the caller's swap request for a date.
pub async fn delete_request(
    State(state): State<AppState>,
    employee: CurrentEmployee,
    Path(date): Path<String>,
) -> ApiResult<DeleteOutcome> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let date = match parse_date_param(&date) {
        Ok(d) => d,
        Err(e) => return error(e, revision_id),
    };

    match state.repo.delete_request(employee.name(), date).await {
        Ok(deleted) => {
            let new_revision = state.repo.get_revision_id().await.unwrap_or(revision_id);
            success(
                DeleteOutcome {
                    key: record_key(employee.name(), date),
                    deleted,
                },
                new_revision,
            )
        }
        Err(e) => error(e, revision_id),
    }
}
