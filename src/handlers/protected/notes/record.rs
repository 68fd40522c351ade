use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use super::caller_id;
use crate::api::dto::{NoteRequest, NoteResponse};
use crate::auth::VerifiedIdentity;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/v1/notes/:id - Read one of the caller's notes
pub async fn note_get(
    State(state): State<AppState>,
    identity: VerifiedIdentity,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<NoteResponse> {
    let user_id = caller_id(&identity)?;
    let Path(id) = id?;

    let note = state.notes.find_by_id(user_id, id).await?;
    Ok(ApiResponse::success(note))
}

/// PUT /api/v1/notes/:id - Replace title, content and expiry
pub async fn note_put(
    State(state): State<AppState>,
    identity: VerifiedIdentity,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<NoteResponse> {
    let user_id = caller_id(&identity)?;
    let Path(id) = id?;
    let Json(request) = payload?;

    let note = state.notes.update(user_id, id, request).await?;
    Ok(ApiResponse::success(note))
}

/// DELETE /api/v1/notes/:id - Remove a note, 204 on success
pub async fn note_delete(
    State(state): State<AppState>,
    identity: VerifiedIdentity,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<()> {
    let user_id = caller_id(&identity)?;
    let Path(id) = id?;

    state.notes.delete(user_id, id).await?;
    Ok(ApiResponse::no_content())
}
