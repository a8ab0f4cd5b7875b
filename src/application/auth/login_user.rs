use std::sync::Arc;

use crate::domain::auth::dtos::LoginUserDto;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{AuthRepository, TokenIssuer};

use super::session::AuthSession;

/// Use case for user login with email and password
pub struct LoginUserUseCase {
  repository: Arc<dyn AuthRepository>,
  token_issuer: Arc<dyn TokenIssuer>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(repository: Arc<dyn AuthRepository>, token_issuer: Arc<dyn TokenIssuer>) -> Self {
    Self {
      repository,
      token_issuer,
    }
  }

  /// Executes the login use case
  ///
  /// # Errors
  /// A `DomainError` with status 401 on a credential mismatch, or whatever
  /// the repository or token issuer raise
  pub async fn execute(&self, dto: LoginUserDto) -> Result<AuthSession, AuthError> {
    let user = self.repository.login(dto).await?;
    let token = self.token_issuer.issue(user.id).await?;

    tracing::debug!("User {} logged in", user.id);

    Ok(AuthSession { user, token })
  }
}
