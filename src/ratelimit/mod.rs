pub mod bucket;
pub mod clock;
pub mod plan;
pub mod registry;
pub mod shared;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{RateLimitBackend, RateLimitConfig};
use registry::BucketRegistry;
use shared::{ProcessLocalStore, SharedStoreRateLimiter};

pub use plan::RateLimitPlan;

/// Admission decision for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u64,
}

/// Admission control consulted by the rate limit gate
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, user_id: Uuid, path: &str) -> RateLimitDecision;
}

/// Token buckets held in this process, keyed by request path
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    registry: Arc<BucketRegistry>,
}

impl InMemoryRateLimiter {
    pub fn new(registry: Arc<BucketRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, user_id: Uuid, path: &str) -> RateLimitDecision {
        tracing::debug!("Checking rate limit for {} on {}", user_id, path);
        let probe = self.registry.try_consume(path);
        RateLimitDecision {
            allowed: probe.consumed,
            remaining: probe.remaining,
        }
    }
}

/// Build the limiter selected by configuration. Called once at startup.
pub fn build_rate_limiter(config: &RateLimitConfig) -> Arc<dyn RateLimiter> {
    let registry = Arc::new(BucketRegistry::new(config.clone()));
    match config.backend {
        RateLimitBackend::Memory => {
            tracing::info!("Using in-memory rate limiter");
            Arc::new(InMemoryRateLimiter::new(registry))
        }
        RateLimitBackend::Shared => {
            tracing::info!("Using shared-store rate limiter (process-local store)");
            Arc::new(SharedStoreRateLimiter::new(ProcessLocalStore::new(registry)))
        }
    }
}
