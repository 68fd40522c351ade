use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;
use crate::state::AppState;

/// Authorization scheme marker
pub const BEARER: &str = "Bearer";

/// JWT authentication gate.
///
/// Public path prefixes pass straight through. Everything else needs a bearer
/// token; on success the [`VerifiedIdentity`](crate::auth::VerifiedIdentity)
/// is stored in the request extensions for later stages and handlers.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    if is_public_path(&path, &state.config.security.public_paths) {
        return next.run(request).await;
    }

    tracing::debug!("JWT authentication gate triggered for request: {}", path);

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).trim().to_string())
        .filter(|value| !value.is_empty());

    let Some(header) = header else {
        return ApiError::invalid_token("Authentication required!").into_response();
    };

    match state.codec.verify(parse_token(&header)) {
        Ok(identity) => {
            tracing::debug!("Verified user {} for {}", identity.user_id, path);
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!("Token rejected for {}: {}", path, e);
            ApiError::from(e).into_response()
        }
    }
}

/// True when `path` starts with one of the configured public prefixes
pub fn is_public_path(path: &str, public_paths: &[String]) -> bool {
    public_paths.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

/// Token part of an Authorization header value. Without a `Bearer` scheme
/// the whole value is taken as the token.
fn parse_token(header: &str) -> &str {
    match header.get(..BEARER.len()) {
        Some(scheme) if scheme.eq_ignore_ascii_case(BEARER) => header[BEARER.len()..].trim_start(),
        _ => header,
    }
}
