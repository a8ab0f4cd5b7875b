use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::dtos::{ExistsUserDto, IdentifyUserDto, LoginUserDto, RegisterUserDto};
use super::entities::UserEntity;
use super::errors::{AuthError, TokenError};
use super::value_objects::{Email, Password, PasswordHash};

/// Storage-facing operations behind the repository
///
/// Implementations raise [`DomainError`](super::errors::DomainError) for
/// business failures (conflict, bad credentials, unknown user) and any other
/// [`AuthError`] variant for infrastructure failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthDatasource: Send + Sync {
  /// Whether an account with the given email exists
  async fn exists(&self, dto: ExistsUserDto) -> Result<bool, AuthError>;

  /// Checks the credential and returns the matching user
  async fn login(&self, dto: LoginUserDto) -> Result<UserEntity, AuthError>;

  /// Creates a new account
  async fn register(&self, dto: RegisterUserDto) -> Result<UserEntity, AuthError>;

  /// Looks a user up by id
  async fn profile(&self, dto: IdentifyUserDto) -> Result<UserEntity, AuthError>;
}

/// Domain-facing contract used by the use cases
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthRepository: Send + Sync {
  async fn exists(&self, dto: ExistsUserDto) -> Result<bool, AuthError>;

  async fn login(&self, dto: LoginUserDto) -> Result<UserEntity, AuthError>;

  async fn register(&self, dto: RegisterUserDto) -> Result<UserEntity, AuthError>;

  async fn profile(&self, dto: IdentifyUserDto) -> Result<UserEntity, AuthError>;
}

/// Service trait for password hashing operations
#[async_trait]
pub trait PasswordHasher: Send + Sync {
  /// Hashes a plain text password
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError>;

  /// Verifies a plain text password against a hashed password
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError>;
}

/// Payload carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
  /// Id of the user the token was issued to
  pub id: Uuid,
  /// Issued at (seconds since epoch)
  pub iat: i64,
  /// Expires at (seconds since epoch)
  pub exp: i64,
}

/// Issues session tokens for an identity
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenIssuer: Send + Sync {
  async fn issue(&self, user_id: Uuid) -> Result<String, AuthError>;
}

/// Validates session tokens
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
  /// Returns `Ok(None)` for tokens that are malformed, tampered with or
  /// expired; `Err` only when verification itself could not be carried out.
  async fn validate_token(&self, token: &str) -> Result<Option<SessionClaims>, TokenError>;
}

/// Identity asserted by a verified Google ID token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
  /// Google's stable account id (`sub`)
  pub subject: String,
  pub email: Email,
  pub email_verified: bool,
  pub name: Option<String>,
  pub picture: Option<String>,
}

/// Verifies ID tokens issued by Google Sign-In
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GoogleIdentityVerifier: Send + Sync {
  /// Returns `Ok(None)` when Google rejects the token or it was issued for
  /// another client.
  async fn verify(&self, id_token: &str) -> Result<Option<GoogleIdentity>, AuthError>;
}
