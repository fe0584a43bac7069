//! Account operations: registration, login, token verification.

use crate::auth;
use crate::db::AppState;
use crate::error::Error;
use crate::models::User;
use crate::repository;

/// A user plus a freshly issued bearer token
#[derive(Debug)]
pub struct AuthenticatedUser {
  pub user: User,
  pub token: String,
}

/// Create an account and log it in
pub async fn register_user(
  state: &AppState,
  username: &str,
  email: &str,
  password: &str,
) -> Result<AuthenticatedUser, Error> {
  if repository::username_taken(&state.db, username).await? {
    return Err(Error::validation("Username already exists"));
  }
  if repository::email_taken(&state.db, email).await? {
    return Err(Error::validation("Email already in use"));
  }

  let hash = auth::hash_password(password)?;
  let user = repository::insert_user(&state.db, username, email, &hash).await?;
  let token = auth::issue_token(&user, &state.auth)?;
  log::info!("Registered user {}", username);

  Ok(AuthenticatedUser { user, token })
}

/// Verify credentials and issue a token. The error does not reveal whether
/// the username or the password was wrong.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<AuthenticatedUser, Error> {
  let user = repository::user_by_username(&state.db, username)
    .await?
    .ok_or_else(|| Error::validation("Invalid credentials"))?;

  if !auth::verify_password(password, &user.password_hash)? {
    log::warn!("Failed login for {}", username);
    return Err(Error::validation("Invalid credentials"));
  }

  let token = auth::issue_token(&user, &state.auth)?;
  Ok(AuthenticatedUser { user, token })
}

/// Resolve an `Authorization` header back to its user
pub async fn verify_token(state: &AppState, auth_header: Option<&str>) -> Result<User, Error> {
  auth::authenticate(&state.db, &state.auth, auth_header).await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
