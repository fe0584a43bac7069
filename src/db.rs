use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::{AppConfig, AuthConfig};
use crate::error::Error;

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool and auth settings
pub struct AppState {
  pub db: DbPool,
  pub auth: AuthConfig,
}

impl AppState {
  /// Connect, migrate, and assemble state from configuration
  pub async fn initialize(config: &AppConfig) -> Result<Self, Error> {
    let pool = initialize_db(&config.database_url).await?;
    Ok(Self {
      db: pool,
      auth: config.auth.clone(),
    })
  }
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(database_url: &str) -> Result<DbPool, Error> {
  log::info!("Initializing database at: {}", database_url);

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(database_url)
    .await?;

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .map_err(|e| Error::Internal(format!("Migration failed: {}", e)))?;

  log::info!("Database initialized successfully");

  Ok(pool)
}
