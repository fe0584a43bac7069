use std::env;

use crate::error::Error;

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Token signing configuration, loaded from the environment
#[derive(Debug, Clone)]
pub struct AuthConfig {
  /// HS256 signing secret for bearer tokens
  pub secret_key: String,
  /// Lifetime of issued tokens, in hours
  pub token_ttl_hours: i64,
}

impl AuthConfig {
  pub fn from_env() -> Result<Self, Error> {
    Ok(Self {
      secret_key: env::var("LOGBOOK_SECRET_KEY")
        .map_err(|_| Error::MissingConfig("LOGBOOK_SECRET_KEY".into()))?,
      token_ttl_hours: match env::var("LOGBOOK_TOKEN_TTL_HOURS") {
        Ok(raw) => raw
          .parse()
          .map_err(|_| Error::validation(format!("Invalid LOGBOOK_TOKEN_TTL_HOURS: {}", raw)))?,
        Err(_) => DEFAULT_TOKEN_TTL_HOURS,
      },
    })
  }
}

/// Full application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
  /// sqlite connection string, e.g. `sqlite://logbook.db?mode=rwc`
  pub database_url: String,
  pub auth: AuthConfig,
}

impl AppConfig {
  /// Load configuration from the environment, reading `.env` if present
  pub fn from_env() -> Result<Self, Error> {
    dotenvy::dotenv().ok();

    Ok(Self {
      database_url: env::var("DATABASE_URL")
        .map_err(|_| Error::MissingConfig("DATABASE_URL".into()))?,
      auth: AuthConfig::from_env()?,
    })
  }
}
