use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;

use super::caller_id;
use crate::api::dto::{NoteRequest, NoteResponse, NoteSummaryResponse, PageDto};
use crate::auth::VerifiedIdentity;
use crate::database::page::{PageRequest, SortDirection, SortField};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_size")]
    pub size: usize,
    #[serde(default = "default_sort")]
    pub sort_by: String,
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_size() -> usize {
    10
}

fn default_sort() -> String {
    "updatedOn".to_string()
}

fn default_direction() -> String {
    "desc".to_string()
}

impl PageQuery {
    fn into_request(self, max_page_size: usize) -> PageRequest {
        PageRequest {
            page: self.page,
            size: self.size.clamp(1, max_page_size.max(1)),
            sort: SortField::from_param(&self.sort_by),
            direction: SortDirection::from_param(&self.direction),
        }
    }
}

/// GET /api/v1/notes - Page through the caller's non-expired notes
pub async fn notes_get(
    State(state): State<AppState>,
    identity: VerifiedIdentity,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> ApiResult<PageDto<NoteSummaryResponse>> {
    let user_id = caller_id(&identity)?;
    let Query(query) = query?;
    let request = query.into_request(state.config.api.max_page_size);

    let page = state.notes.find_all_valid(user_id, request).await?;
    Ok(ApiResponse::success(page))
}

/// POST /api/v1/notes - Create a note owned by the caller
pub async fn notes_post(
    State(state): State<AppState>,
    identity: VerifiedIdentity,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<NoteResponse> {
    let user_id = caller_id(&identity)?;
    let Json(request) = payload?;

    let note = state.notes.create(user_id, request).await?;
    Ok(ApiResponse::success(note))
}
