//! Revision API endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::errors::AppErrorWithRevision;
use crate::models::RevisionInfo;
use crate::AppState;

/// GET /api/revision - Get the current store revision.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let revision_info = state
        .repo
        .get_revision_info()
        .await
        .map_err(|e| AppErrorWithRevision {
            error: e,
            revision_id: 0,
        })?;

    let revision_id = revision_info.revision_id;
    success(revision_info, revision_id)
}
