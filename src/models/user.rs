use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
  pub id: i64,
  pub username: String,
  pub email: String,
  /// Argon2 PHC string, never serialized outward
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at: Option<DateTime<Utc>>,
}
