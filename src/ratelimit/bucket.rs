use std::sync::Mutex;
use std::time::Instant;

use crate::config::PlanLimits;

/// Outcome of one consumption attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsumptionProbe {
    pub consumed: bool,
    pub remaining: u64,
}

#[derive(Debug)]
struct BucketState {
    tokens: u64,
    last_refill: Instant,
}

/// Token bucket with interval refill: every whole interval elapsed since the
/// last refill adds `refill_tokens`, capped at capacity. Starts full.
#[derive(Debug)]
pub struct TokenBucket {
    limits: PlanLimits,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    pub fn new(limits: PlanLimits, now: Instant) -> Self {
        Self {
            limits,
            state: Mutex::new(BucketState {
                tokens: limits.capacity,
                last_refill: now,
            }),
        }
    }

    pub fn limits(&self) -> PlanLimits {
        self.limits
    }

    /// Take one token if available. Refill and decrement happen under one lock.
    pub fn try_consume(&self, now: Instant) -> ConsumptionProbe {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.refill(&mut state, now);

        if state.tokens > 0 {
            state.tokens -= 1;
            ConsumptionProbe {
                consumed: true,
                remaining: state.tokens,
            }
        } else {
            ConsumptionProbe {
                consumed: false,
                remaining: 0,
            }
        }
    }

    /// Tokens currently available, after applying any due refill
    pub fn available(&self, now: Instant) -> u64 {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        self.refill(&mut state, now);
        state.tokens
    }

    fn refill(&self, state: &mut BucketState, now: Instant) {
        let interval = self.limits.refill_interval();
        if interval.is_zero() {
            state.tokens = self.limits.capacity;
            state.last_refill = now;
            return;
        }

        let elapsed = now.saturating_duration_since(state.last_refill);
        let periods = (elapsed.as_nanos() / interval.as_nanos()) as u64;
        if periods == 0 {
            return;
        }

        let added = periods.saturating_mul(self.limits.refill_tokens);
        state.tokens = state.tokens.saturating_add(added).min(self.limits.capacity);
        // Keep the interval grid anchored so partial periods are not lost
        state.last_refill += interval * periods.min(u32::MAX as u64) as u32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn limits(capacity: u64, refill_tokens: u64, secs: u64) -> PlanLimits {
        PlanLimits {
            capacity,
            refill_tokens,
            refill_interval_secs: secs,
        }
    }

    #[test]
    fn test_capacity_then_exhaustion() {
        let start = Instant::now();
        let bucket = TokenBucket::new(limits(2, 2, 60), start);

        assert_eq!(bucket.try_consume(start), ConsumptionProbe { consumed: true, remaining: 1 });
        assert_eq!(bucket.try_consume(start), ConsumptionProbe { consumed: true, remaining: 0 });
        assert_eq!(bucket.try_consume(start), ConsumptionProbe { consumed: false, remaining: 0 });
    }

    #[test]
    fn test_partial_interval_adds_nothing() {
        let start = Instant::now();
        let bucket = TokenBucket::new(limits(2, 2, 60), start);
        bucket.try_consume(start);
        bucket.try_consume(start);

        let almost = start + Duration::from_secs(59);
        assert!(!bucket.try_consume(almost).consumed);
    }

    #[test]
    fn test_whole_interval_refills() {
        let start = Instant::now();
        let bucket = TokenBucket::new(limits(5, 2, 60), start);
        for _ in 0..5 {
            assert!(bucket.try_consume(start).consumed);
        }

        let later = start + Duration::from_secs(60);
        assert_eq!(bucket.available(later), 2);

        // 90s later is still inside the second interval
        assert_eq!(bucket.available(start + Duration::from_secs(90)), 2);
        assert_eq!(bucket.available(start + Duration::from_secs(120)), 4);
    }

    #[test]
    fn test_idle_bucket_caps_at_capacity() {
        let start = Instant::now();
        let bucket = TokenBucket::new(limits(3, 3, 10), start);
        bucket.try_consume(start);

        let much_later = start + Duration::from_secs(3600);
        assert_eq!(bucket.available(much_later), 3);
    }

    #[test]
    fn test_concurrent_consumers_never_double_spend() {
        let start = Instant::now();
        let bucket = TokenBucket::new(limits(100, 100, 60), start);

        let consumed: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| (0..50).filter(|_| bucket.try_consume(start).consumed).count())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        assert_eq!(consumed, 100);
        assert_eq!(bucket.available(start), 0);
    }
}
