use thiserror::Error;

use super::value_objects::ValueObjectError;

/// Business-rule violation carrying the HTTP status it should surface with
///
/// This is the only error the request pipeline passes through to the client
/// verbatim. Everything else is reported as an internal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct DomainError {
  status: u16,
  message: String,
}

impl DomainError {
  /// Creates a domain error with an explicit status code
  pub fn new(status: u16, message: impl Into<String>) -> Self {
    Self {
      status,
      message: message.into(),
    }
  }

  pub fn unauthorized(message: impl Into<String>) -> Self {
    Self::new(401, message)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(404, message)
  }

  pub fn conflict(message: impl Into<String>) -> Self {
    Self::new(409, message)
  }

  pub fn unavailable(message: impl Into<String>) -> Self {
    Self::new(503, message)
  }

  /// Status code chosen by whoever raised the error
  pub fn status(&self) -> u16 {
    self.status
  }

  /// Human-readable message
  pub fn message(&self) -> &str {
    &self.message
  }
}

/// Main authentication error type
///
/// Use cases, the repository and the datasources all return this type and
/// never catch it; the HTTP layer decides how each variant is reported.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error(transparent)]
  Domain(#[from] DomainError),

  #[error("Repository error: {0}")]
  Repository(#[from] RepositoryError),

  #[error("Hash error: {0}")]
  Hash(#[from] HashError),

  #[error("Token error: {0}")]
  Token(#[from] TokenError),

  #[error("Identity provider error: {0}")]
  IdentityProvider(String),

  #[error("Value object error: {0}")]
  ValueObject(#[from] ValueObjectError),
}

/// Repository-related errors
#[derive(Debug, Error)]
pub enum RepositoryError {
  #[error("Database connection failed: {0}")]
  ConnectionFailed(String),

  #[error("Query execution failed: {0}")]
  QueryFailed(String),

  #[error("Record not found")]
  NotFound,

  #[error("Duplicate key violation: {0}")]
  DuplicateKey(String),

  #[error("Database error: {0}")]
  DatabaseError(String),
}

/// Password hashing and verification errors
#[derive(Debug, Error)]
pub enum HashError {
  #[error("Failed to hash password: {0}")]
  HashingFailed(String),

  #[error("Failed to verify password: {0}")]
  VerificationFailed(String),
}

/// Session token signing and verification errors
#[derive(Debug, Error)]
pub enum TokenError {
  #[error("Failed to sign token: {0}")]
  SigningFailed(String),

  #[error("Failed to verify token: {0}")]
  VerificationFailed(String),

  #[error("Unusable token lifetime: {0} seconds")]
  InvalidLifetime(u64),
}

impl From<sqlx::Error> for RepositoryError {
  fn from(error: sqlx::Error) -> Self {
    match error {
      sqlx::Error::RowNotFound => RepositoryError::NotFound,
      sqlx::Error::Database(db_err) => {
        if db_err.is_unique_violation() {
          RepositoryError::DuplicateKey(db_err.message().to_string())
        } else {
          RepositoryError::DatabaseError(db_err.message().to_string())
        }
      }
      sqlx::Error::PoolTimedOut => RepositoryError::ConnectionFailed("Pool timed out".to_string()),
      sqlx::Error::PoolClosed => RepositoryError::ConnectionFailed("Pool closed".to_string()),
      _ => RepositoryError::QueryFailed(error.to_string()),
    }
  }
}

impl From<sqlx::Error> for AuthError {
  fn from(error: sqlx::Error) -> Self {
    AuthError::Repository(RepositoryError::from(error))
  }
}
