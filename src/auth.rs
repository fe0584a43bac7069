use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::db::DbPool;
use crate::error::Error;
use crate::models::User;
use crate::repository;

/// ---------------------------------------------------------------------------
/// Token Claims
/// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
  pub username: String,
  /// Expiration time, unix seconds
  pub exp: i64,
}

impl Claims {
  pub fn new(username: &str, config: &AuthConfig) -> Self {
    let exp = Utc::now() + Duration::hours(config.token_ttl_hours);
    Self {
      username: username.to_string(),
      exp: exp.timestamp(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Token Issue / Verify
/// ---------------------------------------------------------------------------

/// Create a signed bearer token for a user
pub fn issue_token(user: &User, config: &AuthConfig) -> Result<String, Error> {
  let claims = Claims::new(&user.username, config);
  let key = EncodingKey::from_secret(config.secret_key.as_bytes());
  encode(&Header::default(), &claims, &key)
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

/// Verify a raw token and return its claims
pub fn decode_token(token: &str, config: &AuthConfig) -> Result<Claims, Error> {
  let key = DecodingKey::from_secret(config.secret_key.as_bytes());
  let data = decode::<Claims>(token, &key, &Validation::default()).map_err(|e| match e.kind() {
    jsonwebtoken::errors::ErrorKind::ExpiredSignature => Error::Expired,
    _ => Error::Invalid,
  })?;
  Ok(data.claims)
}

/// ---------------------------------------------------------------------------
/// Request Authentication
/// ---------------------------------------------------------------------------

/// Authenticate a raw `Authorization` header value and resolve the acting
/// user. Called once at the top of each protected operation; everything
/// after runs on behalf of the returned identity.
pub async fn authenticate(
  pool: &DbPool,
  config: &AuthConfig,
  auth_header: Option<&str>,
) -> Result<User, Error> {
  let header = auth_header.ok_or(Error::Unauthenticated)?;

  // Header shape is "<scheme> <token>"; anything else is unusable
  let mut parts = header.split_whitespace();
  let (_scheme, token) = match (parts.next(), parts.next()) {
    (Some(scheme), Some(token)) => (scheme, token),
    _ => {
      log::warn!("Malformed authorization header");
      return Err(Error::Unauthenticated);
    }
  };

  let claims = decode_token(token, config).inspect_err(|e| {
    log::warn!("Token rejected: {}", e);
  })?;

  repository::user_by_username(pool, &claims.username)
    .await?
    .ok_or_else(|| Error::not_found("User does not exist."))
}

/// ---------------------------------------------------------------------------
/// Password Hashing
/// ---------------------------------------------------------------------------

/// Hash a password with Argon2 into a PHC string
pub fn hash_password(password: &str) -> Result<String, Error> {
  let salt = SaltString::generate(&mut OsRng);
  let hash = Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map_err(|e| Error::Internal(format!("Failed to hash password: {}", e)))?;
  Ok(hash.to_string())
}

/// Verify a password against a stored PHC string.
/// Verification parameters come from the hash itself.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, Error> {
  let parsed = PasswordHash::new(hash)
    .map_err(|e| Error::Internal(format!("Stored hash is unreadable: {}", e)))?;
  Ok(
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .is_ok(),
  )
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
