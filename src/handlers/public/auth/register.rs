use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::dto::{RegisterRequest, UserDto};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/v1/auth/register - Create an account, 201 with the public user fields
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<UserDto> {
    let Json(request) = payload?;
    let user = state.auth.register(request).await?;
    Ok(ApiResponse::created(user))
}
