use axum::extract::State;

use super::caller_id;
use crate::api::dto::NoteSummaryResponse;
use crate::auth::VerifiedIdentity;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/notes/latest - Most recently updated non-expired notes
pub async fn latest_get(
    State(state): State<AppState>,
    identity: VerifiedIdentity,
) -> ApiResult<Vec<NoteSummaryResponse>> {
    let user_id = caller_id(&identity)?;
    let notes = state.notes.find_latest(user_id).await?;
    Ok(ApiResponse::success(notes))
}
