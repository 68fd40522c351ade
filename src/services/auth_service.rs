use std::sync::Arc;

use crate::api::dto::{AuthRequest, AuthResponse, RegisterRequest, UserDto};
use crate::api::validation::{validate_login, validate_register};
use crate::auth::password::PasswordHasher;
use crate::auth::TokenCodec;
use crate::database::models::User;
use crate::database::{StoreError, UserStore};
use crate::error::ApiError;

const EMAIL_TAKEN: &str = "Email already registered";
const BAD_CREDENTIALS: &str = "Invalid email or password";

/// Registration and login on top of the user store
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    codec: Arc<TokenCodec>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, hasher: PasswordHasher, codec: Arc<TokenCodec>) -> Self {
        Self { users, hasher, codec }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<UserDto, ApiError> {
        validate_register(&request)?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(ApiError::bad_request(EMAIL_TAKEN));
        }

        let password_hash = self.hasher.hash(request.password).await?;
        let user = User::new(request.name.trim().to_string(), request.email, password_hash);

        let saved = match self.users.save(user).await {
            Ok(saved) => saved,
            // Lost a race with a concurrent registration of the same email
            Err(StoreError::Conflict(_)) => return Err(ApiError::bad_request(EMAIL_TAKEN)),
            Err(e) => return Err(e.into()),
        };

        tracing::info!("Registered user {}", saved.id);
        Ok(saved.into())
    }

    pub async fn login(&self, request: AuthRequest) -> Result<AuthResponse, ApiError> {
        validate_login(&request)?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiError::bad_request(BAD_CREDENTIALS))?;

        if !self.hasher.verify(request.password, user.password_hash.clone()).await? {
            tracing::debug!("Password mismatch for user {}", user.id);
            return Err(ApiError::bad_request(BAD_CREDENTIALS));
        }

        let token = self.codec.issue(&user.id, &user.name, &user.email)?;
        Ok(AuthResponse { token })
    }
}
