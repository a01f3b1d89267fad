//! Bearer token authentication.
//!
//! Access tokens are HS256-signed JWTs carrying the caller's id, username and
//! roles. [`AuthUser`] and [`RequireAdmin`] are extractors, so a request is
//! rejected before the handler body runs.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use digitalsky_core::{AppError, Principal};

use crate::error::ApiError;
use crate::state::AppState;

/// Default token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller's user id.
    pub sub: i64,
    pub username: String,
    pub roles: Vec<String>,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Principal::new(claims.sub, claims.username, claims.roles)
    }
}

/// Signing settings for access tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    pub token_ttl_minutes: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, token_ttl_minutes: i64) -> Result<Self, AppError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(AppError::ConfigError("JWT secret must not be empty".into()));
        }
        if token_ttl_minutes <= 0 {
            return Err(AppError::ConfigError(format!(
                "Token TTL must be positive, got {token_ttl_minutes}"
            )));
        }
        Ok(Self {
            secret,
            token_ttl_minutes,
        })
    }
}

/// Mint an access token for `principal`.
pub fn issue_token(principal: &Principal, config: &JwtConfig) -> Result<String, AppError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: principal.id,
        username: principal.username.clone(),
        roles: principal.roles.clone(),
        iat: now,
        exp: now + config.token_ttl_minutes * 60,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::Generic(format!("Failed to sign token: {e}")))
}

/// Verify signature and expiry, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Any authenticated caller. Rejects with 401 when the token is missing or invalid.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let claims = validate_token(token, &state.jwt).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;

        Ok(AuthUser(claims.into()))
    }
}

/// Caller holding the `ADMIN` role. Rejects with 403 otherwise.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub Principal);

impl FromRequestParts<Arc<AppState>> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;
        if !principal.is_admin() {
            tracing::warn!(user_id = principal.id, "Admin role required");
            return Err(AppError::Forbidden("Admin role required".into()).into());
        }
        Ok(RequireAdmin(principal))
    }
}
