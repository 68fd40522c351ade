use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::VerifiedIdentity;
use crate::error::ApiError;
use crate::state::AppState;

/// Response header reporting tokens left in the caller's bucket
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Rate limit gate. Runs after authentication on the configured path patterns
/// and takes one token from the bucket of the request path.
pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if !state
        .config
        .rate_limit
        .paths
        .iter()
        .any(|pattern| matches_pattern(pattern, &path))
    {
        return next.run(request).await;
    }

    // Unauthenticated requests are not limited here
    let Some(user_id) = request
        .extensions()
        .get::<VerifiedIdentity>()
        .map(VerifiedIdentity::user_uuid)
    else {
        return next.run(request).await;
    };

    let Some(user_id) = user_id else {
        tracing::warn!("Identity on {} does not carry a valid user id", path);
        return ApiError::unauthorized("Invalid Authentication!").into_response();
    };

    let decision = state.rate_limiter.check(user_id, &path).await;
    tracing::debug!(
        "Rate limiter for userId: {} allowed {} remaining {}",
        user_id,
        decision.allowed,
        decision.remaining
    );

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        ApiError::too_many_requests("Rate limit exceeded. Try again later.").into_response()
    };

    response
        .headers_mut()
        .insert(RATE_LIMIT_REMAINING, HeaderValue::from(decision.remaining));
    response
}

/// Path pattern match: `/a/**` covers `/a` and everything below it,
/// `/a/*` one segment below `/a`, anything else must match exactly
pub fn matches_pattern(pattern: &str, path: &str) -> bool {
    if let Some(base) = pattern.strip_suffix("/**") {
        return path == base
            || path
                .strip_prefix(base)
                .is_some_and(|rest| rest.starts_with('/'));
    }
    if let Some(base) = pattern.strip_suffix("/*") {
        return path
            .strip_prefix(base)
            .and_then(|rest| rest.strip_prefix('/'))
            .is_some_and(|segment| !segment.is_empty() && !segment.contains('/'));
    }
    pattern == path
}
