//! Swap match API endpoints.

use axum::extract::State;

use super::{error, success, ApiResult};
use crate::auth::CurrentEmployee;
use crate::matching::{find_matches, find_matches_for};
use crate::models::MatchReport;
use crate::AppState;

/// GET /api/matches - All swap matches on the current snapshot.
pub async fn list_matches(State(state): State<AppState>) -> ApiResult<MatchReport> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let snapshot = match state.repo.list_requests().await {
        Ok(snapshot) => snapshot,
        Err(e) => return error(e, revision_id),
    };

    let matches = find_matches(&snapshot.requests);

    success(
        MatchReport {
            employee_name: None,
            matches,
            considered: snapshot.requests.len(),
            skipped: snapshot.skipped,
        },
        revision_id,
    )
}

/// GET /api/matches/mine - Swap matches involving the caller.
pub async fn my_matches(
    State(state): State<AppState>,
    employee: CurrentEmployee,
) -> ApiResult<MatchReport> {
    let revision_id = state.repo.get_revision_id().await.unwrap_or(0);

    let snapshot = match state.repo.list_requests().await {
        Ok(snapshot) => snapshot,
        Err(e) => return error(e, revision_id),
    };

    let matches = find_matches_for(&snapshot.requests, employee.name());
    if matches.is_empty() {
        tracing::info!("No matches found for {}", employee.name());
    } else {
        for m in &matches {
            tracing::debug!("{}", m);
        }
    }

    success(
        MatchReport {
            employee_name: Some(employee.0),
            matches,
            considered: snapshot.requests.len(),
            skipped: snapshot.skipped,
        },
        revision_id,
    )
}
