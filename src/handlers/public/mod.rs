// handlers/public/mod.rs - Handlers reachable without a token

pub mod auth; // POST /api/v1/auth/register, /api/v1/auth/login
pub mod docs; // GET /v3/api-docs
pub mod health; // GET /health

pub use docs::api_docs_get;
pub use health::health_get;
