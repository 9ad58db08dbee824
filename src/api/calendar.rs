//! Calendar API endpoints.

use axum::extract::{Path, State};
use chrono::NaiveDate;

use super::{error, success, ApiResult};
use crate::calendar::month_dates;
use crate::AppState;

/// GET /api/calendar/:year/:month - Dates selectable for a month's swap requests.
pub async fn get_month_dates(
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> ApiResult<Vec<NaiveDate>> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    match month_dates(year, month) {
        Ok(dates) => success(dates, revision_id),
        Err(e) => error(e.into(), revision_id),
    }
}
