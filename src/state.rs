use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::auth::{TokenCodec, TokenError};
use crate::config::AppConfig;
use crate::database::{MemoryNoteStore, MemoryUserStore};
use crate::ratelimit::{build_rate_limiter, RateLimiter};
use crate::services::{AuthService, NoteService};

/// Shared application state handed to every gate and handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub codec: Arc<TokenCodec>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub auth: AuthService,
    pub notes: NoteService,
}

impl AppState {
    /// Wire the in-memory stores and the configured rate limiter
    pub fn new(config: AppConfig) -> Result<Self, TokenError> {
        let rate_limiter = build_rate_limiter(&config.rate_limit);
        Self::with_rate_limiter(config, rate_limiter)
    }

    pub fn with_rate_limiter(
        config: AppConfig,
        rate_limiter: Arc<dyn RateLimiter>,
    ) -> Result<Self, TokenError> {
        let codec = Arc::new(TokenCodec::new(&config.security)?);
        let auth = AuthService::new(
            Arc::new(MemoryUserStore::new()),
            PasswordHasher::new(),
            codec.clone(),
        );
        let notes = NoteService::new(Arc::new(MemoryNoteStore::new()), config.api.latest_notes_limit);

        Ok(Self {
            config: Arc::new(config),
            codec,
            rate_limiter,
            auth,
            notes,
        })
    }
}
