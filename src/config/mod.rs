use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::ratelimit::plan::RateLimitPlan;

/// Signing secret used when running in development without `JWT_SECRET`.
const DEVELOPMENT_JWT_SECRET: &str = "noter-development-secret-do-not-use-in-production";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub latest_notes_limit: usize,
    pub max_page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub claims: ClaimNames,
    /// Path prefixes that skip authentication entirely
    pub public_paths: Vec<String>,
    pub cors_origins: Vec<String>,
}

/// Names of the custom claims carrying the identity fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimNames {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateLimitBackend {
    Memory,
    Shared,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub backend: RateLimitBackend,
    /// Path patterns the rate limit gate applies to; a trailing `/**` matches a subtree
    pub paths: Vec<String>,
    pub free: PlanLimits,
    pub basic: PlanLimits,
}

/// Capacity and interval refill policy of one plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimits {
    pub capacity: u64,
    pub refill_tokens: u64,
    pub refill_interval_secs: u64,
}

impl PlanLimits {
    pub fn refill_interval(&self) -> Duration {
        Duration::from_secs(self.refill_interval_secs)
    }
}

impl RateLimitConfig {
    pub fn limits_for(&self, plan: RateLimitPlan) -> PlanLimits {
        match plan {
            RateLimitPlan::Free => self.free,
            RateLimitPlan::Basic => self.basic,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Some(v) = env::var("NOTER_API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_LATEST_NOTES_LIMIT") {
            self.api.latest_notes_limit = v.parse().unwrap_or(self.api.latest_notes_limit);
        }
        if let Ok(v) = env::var("API_MAX_PAGE_SIZE") {
            self.api.max_page_size = v.parse().unwrap_or(self.api.max_page_size);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRATION_MINUTES") {
            self.security.jwt_expiration_minutes = v.parse().unwrap_or(self.security.jwt_expiration_minutes);
        }
        if let Ok(v) = env::var("JWT_ISSUER") {
            self.security.jwt_issuer = v;
        }
        if let Ok(v) = env::var("JWT_AUDIENCE") {
            self.security.jwt_audience = v;
        }
        if let Ok(v) = env::var("JWT_CLAIM_USER_ID") {
            self.security.claims.user_id = v;
        }
        if let Ok(v) = env::var("JWT_CLAIM_NAME") {
            self.security.claims.name = v;
        }
        if let Ok(v) = env::var("JWT_CLAIM_EMAIL") {
            self.security.claims.email = v;
        }
        if let Ok(v) = env::var("SECURITY_PUBLIC_PATHS") {
            self.security.public_paths = split_list(&v);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }

        // Rate limit overrides
        if let Ok(v) = env::var("RATE_LIMIT_BACKEND") {
            self.rate_limit.backend = match v.to_ascii_lowercase().as_str() {
                "shared" => RateLimitBackend::Shared,
                "memory" => RateLimitBackend::Memory,
                _ => self.rate_limit.backend,
            };
        }
        if let Ok(v) = env::var("RATE_LIMIT_PATHS") {
            self.rate_limit.paths = split_list(&v);
        }
        override_plan(&mut self.rate_limit.free, "FREE");
        override_plan(&mut self.rate_limit.basic, "BASIC");

        self
    }

    fn base(environment: Environment) -> Self {
        Self {
            environment,
            api: ApiConfig {
                port: 8080,
                latest_notes_limit: 10,
                max_page_size: 100,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiration_minutes: 60,
                jwt_issuer: "noter".to_string(),
                jwt_audience: "noter-api".to_string(),
                claims: ClaimNames {
                    user_id: "userId".to_string(),
                    name: "name".to_string(),
                    email: "email".to_string(),
                },
                public_paths: vec![
                    "/api/v1/auth".to_string(),
                    "/health".to_string(),
                    "/swagger-ui".to_string(),
                    "/v3/api-docs".to_string(),
                ],
                cors_origins: Vec::new(),
            },
            rate_limit: RateLimitConfig {
                backend: RateLimitBackend::Memory,
                paths: vec!["/api/v1/notes/**".to_string()],
                free: PlanLimits {
                    capacity: 2,
                    refill_tokens: 2,
                    refill_interval_secs: 60,
                },
                basic: PlanLimits {
                    capacity: 5,
                    refill_tokens: 5,
                    refill_interval_secs: 60,
                },
            },
        }
    }

    pub fn development() -> Self {
        let mut config = Self::base(Environment::Development);
        config.security.jwt_secret = DEVELOPMENT_JWT_SECRET.to_string();
        config.security.cors_origins = vec![
            "http://localhost:3000".to_string(),
            "http://localhost:5173".to_string(),
        ];
        config
    }

    pub fn staging() -> Self {
        let mut config = Self::base(Environment::Staging);
        config.security.jwt_expiration_minutes = 30;
        config.security.cors_origins = vec!["https://staging.example.com".to_string()];
        config
    }

    pub fn production() -> Self {
        let mut config = Self::base(Environment::Production);
        config.security.jwt_expiration_minutes = 15;
        config.security.cors_origins = vec!["https://app.example.com".to_string()];
        // Swagger and api docs are not served publicly in production
        config.security.public_paths = vec!["/api/v1/auth".to_string(), "/health".to_string()];
        config
    }

    pub fn is_development(&self) -> bool {
        matches!(self.environment, Environment::Development)
    }

    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_development() {
            "noter_api=debug,tower_http=info"
        } else {
            "info"
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn override_plan(limits: &mut PlanLimits, name: &str) {
    if let Ok(v) = env::var(format!("RATE_LIMIT_{}_CAPACITY", name)) {
        limits.capacity = v.parse().unwrap_or(limits.capacity);
    }
    if let Ok(v) = env::var(format!("RATE_LIMIT_{}_REFILL_TOKENS", name)) {
        limits.refill_tokens = v.parse().unwrap_or(limits.refill_tokens);
    }
    if let Ok(v) = env::var(format!("RATE_LIMIT_{}_REFILL_SECS", name)) {
        limits.refill_interval_secs = v.parse().unwrap_or(limits.refill_interval_secs);
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.rate_limit.backend, RateLimitBackend::Memory);
        assert_eq!(config.rate_limit.free.capacity, 2);
        assert_eq!(config.rate_limit.basic.capacity, 5);
        assert!(config.security.public_paths.iter().any(|p| p == "/api/v1/auth"));
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.jwt_expiration_minutes, 15);
        assert!(!config.security.public_paths.iter().any(|p| p == "/swagger-ui"));
    }

    #[test]
    fn test_limits_for_plan() {
        let config = AppConfig::development();
        let free = config.rate_limit.limits_for(RateLimitPlan::Free);
        assert_eq!(free.refill_tokens, 2);
        assert_eq!(free.refill_interval(), Duration::from_secs(60));
        assert_eq!(config.rate_limit.limits_for(RateLimitPlan::Basic).capacity, 5);
    }

    #[test]
    fn test_default_log_filter_follows_environment() {
        assert_eq!(AppConfig::development().default_log_filter(), "noter_api=debug,tower_http=info");
        assert_eq!(AppConfig::staging().default_log_filter(), "info");
        assert_eq!(AppConfig::production().default_log_filter(), "info");
    }

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(split_list(" /a , ,/b"), vec!["/a".to_string(), "/b".to_string()]);
    }
}
