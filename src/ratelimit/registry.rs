use dashmap::DashMap;
use std::sync::Arc;

use super::bucket::{ConsumptionProbe, TokenBucket};
use super::clock::{Clock, SystemClock};
use super::plan::RateLimitPlan;
use crate::config::RateLimitConfig;

/// Process-wide map from classification key to token bucket.
///
/// Buckets are created lazily on first use of a key and live as long as the
/// registry. Keys are request paths, so every caller of a path shares one bucket.
pub struct BucketRegistry {
    buckets: DashMap<String, Arc<TokenBucket>>,
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
}

impl BucketRegistry {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
            clock,
        }
    }

    /// Existing bucket for `key`, or a new one sized by the key's plan.
    /// The entry lock makes creation exactly-once under concurrent first access.
    pub fn resolve(&self, key: &str) -> Arc<TokenBucket> {
        if let Some(bucket) = self.buckets.get(key) {
            return Arc::clone(bucket.value());
        }

        let entry = self.buckets.entry(key.to_string()).or_insert_with(|| {
            let plan = RateLimitPlan::resolve_from_path(key);
            tracing::debug!("creating {} bucket for {}", plan.name(), key);
            Arc::new(TokenBucket::new(self.config.limits_for(plan), self.clock.now()))
        });
        Arc::clone(entry.value())
    }

    /// Resolve the bucket for `key` and take one token from it
    pub fn try_consume(&self, key: &str) -> ConsumptionProbe {
        let bucket = self.resolve(key);
        bucket.try_consume(self.clock.now())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl std::fmt::Debug for BucketRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketRegistry")
            .field("buckets", &self.buckets.len())
            .finish_non_exhaustive()
    }
}
