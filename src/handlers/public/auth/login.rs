use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::api::dto::{AuthRequest, AuthResponse};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/v1/auth/login - Check credentials and return a signed token
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> ApiResult<AuthResponse> {
    let Json(request) = payload?;
    let token = state.auth.login(request).await?;
    Ok(ApiResponse::success(token))
}
