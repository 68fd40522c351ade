use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::bucket::ConsumptionProbe;
use super::registry::BucketRegistry;
use super::{RateLimitDecision, RateLimiter};

#[derive(Debug, Error)]
pub enum BucketStoreError {
    #[error("bucket store unavailable: {0}")]
    Unavailable(String),
}

/// Bucket state kept outside the process, shared by every instance of the service
#[async_trait]
pub trait BucketStore: Send + Sync {
    async fn try_consume(&self, key: &str) -> Result<ConsumptionProbe, BucketStoreError>;
}

/// Limiter backed by a [`BucketStore`]. Store errors let the request through.
#[derive(Debug)]
pub struct SharedStoreRateLimiter<S> {
    store: S,
}

impl<S: BucketStore> SharedStoreRateLimiter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: BucketStore> RateLimiter for SharedStoreRateLimiter<S> {
    async fn check(&self, user_id: Uuid, path: &str) -> RateLimitDecision {
        match self.store.try_consume(path).await {
            Ok(probe) => RateLimitDecision {
                allowed: probe.consumed,
                remaining: probe.remaining,
            },
            Err(e) => {
                tracing::warn!("Rate limit store error for {} on {}: {}", user_id, path, e);
                RateLimitDecision {
                    allowed: true,
                    remaining: 0,
                }
            }
        }
    }
}

/// Store that keeps buckets in this process. Stands in until an external
/// store is wired; its state is not shared between instances.
#[derive(Debug)]
pub struct ProcessLocalStore {
    registry: Arc<BucketRegistry>,
}

impl ProcessLocalStore {
    pub fn new(registry: Arc<BucketRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl BucketStore for ProcessLocalStore {
    async fn try_consume(&self, key: &str) -> Result<ConsumptionProbe, BucketStoreError> {
        Ok(self.registry.try_consume(key))
    }
}
