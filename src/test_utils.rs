//! Test utilities and helpers for integration and unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Seed data factories
//! - Auth fixtures

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::auth;
use crate::config::AuthConfig;
use crate::db::AppState;
use crate::models::{User, Workout};
use crate::repository;

/// Password used for every seeded test user
pub const TEST_PASSWORD: &str = "password123";

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures.
/// Tests must release an acquired connection before issuing pool-level calls.
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Auth settings used throughout the test suite
pub fn test_auth_config() -> AuthConfig {
  AuthConfig {
    secret_key: "test-secret-key".to_string(),
    token_ttl_hours: 24,
  }
}

/// Fresh in-memory state for command-level tests
pub async fn setup_test_state() -> AppState {
  AppState {
    db: setup_test_db().await,
    auth: test_auth_config(),
  }
}

pub async fn teardown_test_state(state: AppState) {
  teardown_test_db(state.db).await;
}

/// ---------------------------------------------------------------------------
/// Seed Factories
/// ---------------------------------------------------------------------------

/// Insert a user with a hashed [`TEST_PASSWORD`]
pub async fn seed_test_user(pool: &SqlitePool, username: &str) -> User {
  let hash = auth::hash_password(TEST_PASSWORD).expect("Failed to hash test password");
  let email = format!("{}@example.com", username);
  repository::insert_user(pool, username, &email, &hash)
    .await
    .expect("Failed to insert test user")
}

/// Insert a workout on a date for a user, creating the sport by name and
/// defaulting the location and category
pub async fn seed_test_workout(
  pool: &SqlitePool,
  user_id: i64,
  date: NaiveDate,
  sport_name: &str,
) -> Workout {
  let mut conn = pool.acquire().await.expect("Failed to acquire connection");

  let sport = repository::get_or_create_sport(&mut conn, sport_name)
    .await
    .expect("Failed to create sport");
  let location = repository::get_or_create_location(&mut conn, "Main Gym")
    .await
    .expect("Failed to create location");
  let category = repository::get_or_create_workout_category(&mut conn, "General")
    .await
    .expect("Failed to create category");

  repository::insert_workout(&mut conn, user_id, date, sport.id, category.id, location.id, Some(60))
    .await
    .expect("Failed to insert test workout")
}

/// ---------------------------------------------------------------------------
/// Auth Fixtures
/// ---------------------------------------------------------------------------

/// A ready-to-send `Authorization` header value for a user
pub fn test_auth_header(user: &User, config: &AuthConfig) -> String {
  let token = auth::issue_token(user, config).expect("Failed to issue test token");
  format!("Bearer {}", token)
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('users', 'sports', 'workouts', 'workout_details')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 4, "Expected 4 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seeded_user_can_log_in_with_test_password() {
    let pool = setup_test_db().await;

    let user = seed_test_user(&pool, "annika").await;
    assert!(auth::verify_password(TEST_PASSWORD, &user.password_hash).unwrap());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seeded_workout_references_named_sport() {
    let pool = setup_test_db().await;
    let user = seed_test_user(&pool, "annika").await;
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    let workout = seed_test_workout(&pool, user.id, date, "CrossFit").await;
    let sport = repository::sport_by_id(&pool, workout.sport_id).await.unwrap();
    assert_eq!(sport.name, "CrossFit");

    teardown_test_db(pool).await;
  }
}
