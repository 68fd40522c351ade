/// Route prefix of the latest-notes endpoint, limited more tightly than the rest
pub const LATEST_NOTES_PREFIX: &str = "/api/v1/notes/latest";

/// Route prefix of the notes resource tree
pub const NOTES_PREFIX: &str = "/api/v1/notes";

/// Named rate limit tiers. Capacity and refill of each tier come from
/// [`RateLimitConfig`](crate::config::RateLimitConfig).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitPlan {
    /// Restrictive tier, also the fallback
    Free,
    /// Generous tier for the general notes endpoints
    Basic,
}

impl RateLimitPlan {
    /// Classify a request path. The latest-notes prefix is tested before the
    /// notes prefix since it lives inside the same tree.
    pub fn resolve_from_path(path: &str) -> Self {
        if path.is_empty() || path.starts_with(LATEST_NOTES_PREFIX) {
            RateLimitPlan::Free
        } else if path.starts_with(NOTES_PREFIX) {
            RateLimitPlan::Basic
        } else {
            RateLimitPlan::Free
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RateLimitPlan::Free => "FREE",
            RateLimitPlan::Basic => "BASIC",
        }
    }
}
