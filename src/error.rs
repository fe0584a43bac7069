use serde::Serialize;

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// Crate-wide error type. Display strings are the user-visible messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// No usable credential in the request (header absent or malformed)
  #[error("Authorization header is missing.")]
  Unauthenticated,

  /// Credential past its validity window
  #[error("Token has expired.")]
  Expired,

  /// Credential fails verification (bad signature, garbage payload)
  #[error("Invalid token.")]
  Invalid,

  /// Valid identity, but the action is not permitted
  #[error("{0}")]
  Unauthorized(String),

  /// A referenced entity does not exist; message names the id or name
  #[error("{0}")]
  NotFound(String),

  /// Malformed input (non-numeric weight, negative duration, ...)
  #[error("{0}")]
  Validation(String),

  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl Serialize for Error {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

impl Error {
  pub fn not_found(what: impl Into<String>) -> Self {
    Error::NotFound(what.into())
  }

  pub fn validation(what: impl Into<String>) -> Self {
    Error::Validation(what.into())
  }
}
