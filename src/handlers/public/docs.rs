use axum::Json;
use serde_json::{json, Value};

/// GET /v3/api-docs - Static listing of the HTTP surface
pub async fn api_docs_get() -> Json<Value> {
    Json(json!({
        "name": "Noter API",
        "version": env!("CARGO_PKG_VERSION"),
        "security": {
            "scheme": "bearer",
            "format": "JWT",
        },
        "paths": {
            "/api/v1/auth/register": { "post": "Register a user (public)" },
            "/api/v1/auth/login": { "post": "Exchange credentials for a token (public)" },
            "/api/v1/notes": {
                "get": "Page of the caller's non-expired notes (page, size, sortBy, direction)",
                "post": "Create a note",
            },
            "/api/v1/notes/latest": { "get": "Most recently updated notes" },
            "/api/v1/notes/{id}": {
                "get": "Read a note",
                "put": "Replace a note",
                "delete": "Delete a note",
            },
            "/health": { "get": "Liveness probe (public)" },
        },
        "rateLimits": {
            "header": "X-RateLimit-Remaining",
            "plans": {
                "FREE": "/api/v1/notes/latest",
                "BASIC": "/api/v1/notes/**",
            },
        },
    }))
}
