pub mod password;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{ClaimNames, SecurityConfig};
use crate::error::ApiError;

const ALGORITHM: Algorithm = Algorithm::HS512;

/// Reasons a token is refused or cannot be produced.
///
/// The first three are verification outcomes; the gate collapses them into
/// a single 401 response and only keeps the distinction for logging.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token verification failed: {0}")]
    InvalidSignature(String),

    #[error("configured audience not present in token")]
    InvalidAudience,

    #[error("user id claim is missing or blank")]
    MissingSubject,

    #[error("JWT secret not configured")]
    MissingSecret,

    #[error("JWT generation error: {0}")]
    Encoding(String),
}

/// Identity fields recovered from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub name: String,
    pub email: String,
}

impl VerifiedIdentity {
    /// Parse the user id claim as a UUID
    pub fn user_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.user_id).ok()
    }
}

/// Reads the identity the authentication gate stored on the request.
/// Requests that reached a handler without one are answered with 401.
#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for VerifiedIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedIdentity>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Invalid Authentication!"))
    }
}

/// Issues and verifies HMAC-signed JWTs carrying the caller's identity
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    ttl: Duration,
    claims: ClaimNames,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(security: &SecurityConfig) -> Result<Self, TokenError> {
        if security.jwt_secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let secret = security.jwt_secret.as_bytes();

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked strictly
        validation.leeway = 0;
        validation.set_issuer(&[security.jwt_issuer.as_str()]);
        validation.set_audience(&[security.jwt_audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            issuer: security.jwt_issuer.clone(),
            audience: security.jwt_audience.clone(),
            ttl: Duration::minutes(security.jwt_expiration_minutes),
            claims: security.claims.clone(),
        })
    }

    /// Token lifetime in seconds, as reported to clients
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Sign a token for the given user, expiring after the configured TTL
    pub fn issue(&self, user_id: &Uuid, name: &str, email: &str) -> Result<String, TokenError> {
        tracing::debug!("generate: JWT for {} userId", user_id);

        let now = Utc::now();
        let mut claims = Map::new();
        claims.insert("iss".to_string(), Value::from(self.issuer.as_str()));
        claims.insert("aud".to_string(), Value::from(self.audience.as_str()));
        claims.insert("iat".to_string(), Value::from(now.timestamp()));
        claims.insert("exp".to_string(), Value::from((now + self.ttl).timestamp()));
        claims.insert(self.claims.user_id.clone(), Value::from(user_id.to_string()));
        claims.insert(self.claims.name.clone(), Value::from(name));
        claims.insert(self.claims.email.clone(), Value::from(email));

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Check signature, expiry, issuer and audience, then extract the identity claims
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, TokenError> {
        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAudience => TokenError::InvalidAudience,
                ErrorKind::MissingRequiredClaim(claim) if claim == "aud" => TokenError::InvalidAudience,
                _ => TokenError::InvalidSignature(e.to_string()),
            })?;

        let claims = data.claims;

        let user_id = claims
            .get(&self.claims.user_id)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(TokenError::MissingSubject)?;

        Ok(VerifiedIdentity {
            user_id: user_id.to_string(),
            name: string_claim(&claims, &self.claims.name),
            email: string_claim(&claims, &self.claims.email),
        })
    }
}

fn string_claim(claims: &Map<String, Value>, name: &str) -> String {
    claims
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
