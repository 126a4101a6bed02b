//! Authentication service - back-office logins and API tokens.
//!
//! Password hashing lives in the domain `Password` value object; this service
//! looks users up through the Unit of Work and signs JWTs for the JSON API.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::config::{Config, MIN_NAME_LENGTH, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{NewUser, Password, SessionUser, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        SessionUser {
            id: claims.sub,
            username: claims.username,
            role: UserRole::from(claims.role.as_str()),
        }
    }
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check a username/password pair and stamp the login time
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<SessionUser>;

    /// Authenticate and issue an API token
    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    async fn create_user(&self, username: &str, password: &str, role: UserRole) -> AppResult<User>;

    async fn change_password(&self, username: &str, password: &str) -> AppResult<()>;
}

fn generate_token(user: &SessionUser, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        username: user.username.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn authenticate(&self, username: &str, password: &str) -> AppResult<SessionUser> {
        let user = self.uow.users().find_by_username(username.trim()).await?;

        // Unknown users still pay for one hash verification.
        let user = match user {
            Some(user) if Password::from_hash(user.password_hash.clone()).verify(password) => user,
            Some(_) => {
                tracing::warn!(username = %username, "Login failed: wrong password");
                return Err(AppError::InvalidCredentials);
            }
            None => {
                Password::verify_dummy(password);
                tracing::warn!(username = %username, "Login failed: unknown user");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !user.is_active {
            tracing::warn!(username = %user.username, "Login refused: account disabled");
            return Err(AppError::InvalidCredentials);
        }

        self.uow.users().record_login(user.id).await?;
        tracing::info!(user_id = user.id, username = %user.username, "User signed in");

        Ok(SessionUser::from(&user))
    }

    async fn login(&self, username: &str, password: &str) -> AppResult<TokenResponse> {
        let user = self.authenticate(username, password).await?;
        generate_token(&user, &self.config)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn create_user(&self, username: &str, password: &str, role: UserRole) -> AppResult<User> {
        let username = username.trim();
        if username.len() < MIN_NAME_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Username must be at least {} characters",
                MIN_NAME_LENGTH
            )));
        }
        if self.uow.users().find_by_username(username).await?.is_some() {
            return Err(AppError::already_exists(format!("User '{}'", username)));
        }

        let password_hash = Password::new(password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                username: username.to_string(),
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    async fn change_password(&self, username: &str, password: &str) -> AppResult<()> {
        let user = self
            .uow
            .users()
            .find_by_username(username.trim())
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{}'", username.trim())))?;

        let password_hash = Password::new(password)?.into_string();
        self.uow.users().update_password(user.id, password_hash).await?;

        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }
}
