use axum::{
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, rate_limit_middleware};
use crate::state::AppState;

/// Full router. Requests pass the authentication gate, then the rate limit
/// gate, then reach the handler.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/health", get(public::health_get))
        .route("/v3/api-docs", get(public::api_docs_get))
        .merge(auth_public_routes())
        // Protected
        .merge(note_routes())
        // Top to bottom: the authentication gate sees the request before the rate limiter
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
                .layer(from_fn_with_state(state.clone(), rate_limit_middleware)),
        )
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/v1/auth/register", post(auth::register_post))
        .route("/api/v1/auth/login", post(auth::login_post))
}

fn note_routes() -> Router<AppState> {
    use protected::notes;

    Router::new()
        .route("/api/v1/notes", get(notes::notes_get).post(notes::notes_post))
        .route("/api/v1/notes/latest", get(notes::latest_get))
        .route(
            "/api/v1/notes/:id",
            get(notes::note_get).put(notes::note_put).delete(notes::note_delete),
        )
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
