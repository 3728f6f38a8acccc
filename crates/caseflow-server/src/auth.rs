//! Authentication: JWT bearer tokens, argon2 password hashing and the
//! caller extractors.
//!
//! Roles live in the database, so the user row is loaded on every
//! authenticated request; a token outlives neither its user nor a role
//! change.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use caseflow_db::Role;

use crate::config::AppState;
use crate::error::ApiError;

/// JWT claims: `sub` is the username.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Key material and validation settings for bearer tokens.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
    expire_minutes: i64,
}

impl JwtKeys {
    /// Create from a symmetric secret. Unknown algorithm names fall back
    /// to HS256.
    pub fn new(secret: &[u8], algorithm: &str, expire_minutes: i64) -> Self {
        let algorithm = Algorithm::from_str(algorithm).unwrap_or(Algorithm::HS256);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            header: Header::new(algorithm),
            validation: Validation::new(algorithm),
            expire_minutes,
        }
    }

    /// Issue a token for a username.
    pub fn create_access_token(&self, username: &str) -> Result<String, ApiError> {
        let exp = (Utc::now() + Duration::minutes(self.expire_minutes)).timestamp();
        let claims = Claims {
            sub: username.to_string(),
            exp,
        };
        encode(&self.header, &claims, &self.encoding)
            .map_err(|err| ApiError::Internal(format!("failed to sign token: {err}")))
    }

    /// Decode and validate a token. Any failure yields `None`.
    pub fn decode_token(&self, token: &str) -> Option<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .ok()
    }
}

/// Hash a password with argon2 and a fresh salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ApiError::Internal(format!("failed to hash password: {err}")))
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    PasswordHash::new(hashed)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// The authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn credentials_error() -> ApiError {
    ApiError::Unauthorized("Could not validate credentials".to_string())
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = bearer_token(parts).ok_or_else(credentials_error)?;
        let claims = state.jwt.decode_token(token).ok_or_else(credentials_error)?;

        let user = state
            .db
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or_else(credentials_error)?;

        Ok(AuthUser {
            role: user.get_role(),
            username: user.username,
        })
    }
}

/// Like [`AuthUser`], but missing or invalid credentials yield `None`
/// instead of 401. Used by registration to attribute the creator.
pub struct OptionalAuthUser(pub Option<AuthUser>);

#[axum::async_trait]
impl FromRequestParts<AppState> for OptionalAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(AuthUser::from_request_parts(parts, state).await.ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let keys = JwtKeys::new(b"test-secret", "HS256", 60);
        let token = keys.create_access_token("alice").unwrap();
        let claims = keys.decode_token(&token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = JwtKeys::new(b"test-secret", "HS256", -120);
        let token = keys.create_access_token("alice").unwrap();
        assert!(keys.decode_token(&token).is_none());
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let keys = JwtKeys::new(b"test-secret", "HS256", 60);
        let other = JwtKeys::new(b"other-secret", "HS256", 60);
        let token = keys.create_access_token("alice").unwrap();
        assert!(other.decode_token(&token).is_none());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let keys = JwtKeys::new(b"test-secret", "HS256", 60);
        assert!(keys.decode_token("not-a-token").is_none());
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "not-a-hash"));
    }
}
