use std::sync::Arc;

use crate::domain::auth::dtos::RegisterUserDto;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{AuthRepository, TokenIssuer};

use super::session::AuthSession;

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  repository: Arc<dyn AuthRepository>,
  token_issuer: Arc<dyn TokenIssuer>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(repository: Arc<dyn AuthRepository>, token_issuer: Arc<dyn TokenIssuer>) -> Self {
    Self {
      repository,
      token_issuer,
    }
  }

  /// Executes the user registration use case
  ///
  /// # Returns
  /// The created user and a session token for immediate use
  ///
  /// # Errors
  /// A `DomainError` with status 409 if the email is already registered,
  /// or whatever the repository or token issuer raise
  pub async fn execute(&self, dto: RegisterUserDto) -> Result<AuthSession, AuthError> {
    let user = self.repository.register(dto).await?;
    let token = self.token_issuer.issue(user.id).await?;

    tracing::info!("Registered user {}", user.id);

    Ok(AuthSession { user, token })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::dtos::ValidatedDto;
  use crate::domain::auth::entities::UserEntity;
  use crate::domain::auth::errors::DomainError;
  use crate::domain::auth::ports::{MockAuthRepository, MockTokenIssuer};
  use serde_json::json;

  fn register_dto() -> RegisterUserDto {
    RegisterUserDto::create(json!({
      "name": "Ada",
      "email": "ada@example.com",
      "password": "analytical-engine"
    }))
    .unwrap()
  }

  #[tokio::test]
  async fn test_register_issues_token_for_new_user() {
    let user = UserEntity::new("Ada".to_string(), "ada@example.com".to_string(), None);
    let user_id = user.id;

    let mut repository = MockAuthRepository::new();
    repository
      .expect_register()
      .withf(|dto| dto.email().as_str() == "ada@example.com")
      .times(1)
      .returning(move |_| Ok(user.clone()));

    let mut issuer = MockTokenIssuer::new();
    issuer
      .expect_issue()
      .withf(move |id| *id == user_id)
      .times(1)
      .returning(|_| Ok("signed-token".to_string()));

    let use_case = RegisterUserUseCase::new(Arc::new(repository), Arc::new(issuer));
    let session = use_case.execute(register_dto()).await.unwrap();

    assert_eq!(session.user.id, user_id);
    assert_eq!(session.token, "signed-token");
  }

  #[tokio::test]
  async fn test_register_propagates_conflict_without_issuing_token() {
    let mut repository = MockAuthRepository::new();
    repository
      .expect_register()
      .returning(|_| Err(DomainError::conflict("User already exists").into()));

    let mut issuer = MockTokenIssuer::new();
    issuer.expect_issue().never();

    let use_case = RegisterUserUseCase::new(Arc::new(repository), Arc::new(issuer));
    let error = use_case.execute(register_dto()).await.unwrap_err();

    match error {
      AuthError::Domain(e) => {
        assert_eq!(e.status(), 409);
        assert_eq!(e.message(), "User already exists");
      }
      other => panic!("unexpected error: {:?}", other),
    }
  }
}
