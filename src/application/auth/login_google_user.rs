use std::sync::Arc;

use crate::domain::auth::dtos::{ExistsUserDto, LoginUserDto, RegisterUserDto, TokenDto};
use crate::domain::auth::errors::{AuthError, DomainError};
use crate::domain::auth::ports::{AuthRepository, GoogleIdentityVerifier, TokenIssuer};

use super::session::AuthSession;

/// Use case exchanging a Google ID token for a local session
///
/// Unknown Google accounts are registered on first sign-in; known ones are
/// logged in with the Google subject as credential.
pub struct LoginGoogleUserUseCase {
  repository: Arc<dyn AuthRepository>,
  token_issuer: Arc<dyn TokenIssuer>,
  google_verifier: Arc<dyn GoogleIdentityVerifier>,
}

impl LoginGoogleUserUseCase {
  pub fn new(
    repository: Arc<dyn AuthRepository>,
    token_issuer: Arc<dyn TokenIssuer>,
    google_verifier: Arc<dyn GoogleIdentityVerifier>,
  ) -> Self {
    Self {
      repository,
      token_issuer,
      google_verifier,
    }
  }

  /// Executes the Google sign-in use case
  ///
  /// # Errors
  /// A 401 `DomainError` if Google rejects the token or the account email is
  /// unverified; otherwise whatever the collaborators raise
  pub async fn execute(&self, dto: TokenDto) -> Result<AuthSession, AuthError> {
    let identity = self
      .google_verifier
      .verify(dto.token())
      .await?
      .ok_or_else(|| DomainError::unauthorized("Invalid Google token"))?;

    if !identity.email_verified {
      return Err(DomainError::unauthorized("Google account email is not verified").into());
    }

    let exists = self
      .repository
      .exists(ExistsUserDto::from_email(identity.email.clone()))
      .await?;

    let user = if exists {
      self
        .repository
        .login(LoginUserDto::from_google_identity(&identity))
        .await?
    } else {
      let user = self
        .repository
        .register(RegisterUserDto::from_google_identity(&identity))
        .await?;
      tracing::info!("Registered user {} through Google sign-in", user.id);
      user
    };

    let token = self.token_issuer.issue(user.id).await?;

    Ok(AuthSession { user, token })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::dtos::{Credential, ValidatedDto};
  use crate::domain::auth::entities::UserEntity;
  use crate::domain::auth::ports::{
    GoogleIdentity, MockAuthRepository, MockGoogleIdentityVerifier, MockTokenIssuer,
  };
  use crate::domain::auth::value_objects::Email;
  use serde_json::json;

  fn token_dto() -> TokenDto {
    TokenDto::create(json!({ "token": "google-id-token" })).unwrap()
  }

  fn identity(email_verified: bool) -> GoogleIdentity {
    GoogleIdentity {
      subject: "108234".to_string(),
      email: Email::new("ada@gmail.com").unwrap(),
      email_verified,
      name: Some("Ada".to_string()),
      picture: None,
    }
  }

  fn issuer() -> MockTokenIssuer {
    let mut issuer = MockTokenIssuer::new();
    issuer
      .expect_issue()
      .returning(|_| Ok("signed-token".to_string()));
    issuer
  }

  #[tokio::test]
  async fn test_existing_account_logs_in_with_google_subject() {
    let mut verifier = MockGoogleIdentityVerifier::new();
    verifier
      .expect_verify()
      .withf(|token| token == "google-id-token")
      .returning(|_| Ok(Some(identity(true))));

    let user = UserEntity::new("Ada".to_string(), "ada@gmail.com".to_string(), None);
    let mut repository = MockAuthRepository::new();
    repository.expect_exists().returning(|_| Ok(true));
    repository
      .expect_login()
      .withf(|dto| {
        dto.credential()
          == &Credential::Google {
            subject: "108234".to_string(),
          }
      })
      .times(1)
      .returning(move |_| Ok(user.clone()));
    repository.expect_register().never();

    let use_case =
      LoginGoogleUserUseCase::new(Arc::new(repository), Arc::new(issuer()), Arc::new(verifier));
    let session = use_case.execute(token_dto()).await.unwrap();

    assert_eq!(session.user.email, "ada@gmail.com");
    assert_eq!(session.token, "signed-token");
  }

  #[tokio::test]
  async fn test_new_account_is_registered() {
    let mut verifier = MockGoogleIdentityVerifier::new();
    verifier
      .expect_verify()
      .returning(|_| Ok(Some(identity(true))));

    let mut repository = MockAuthRepository::new();
    repository.expect_exists().returning(|_| Ok(false));
    repository.expect_login().never();
    repository
      .expect_register()
      .withf(|dto| dto.name() == "Ada")
      .times(1)
      .returning(|dto| {
        Ok(UserEntity::new(
          dto.name().to_string(),
          dto.email().to_string(),
          None,
        ))
      });

    let use_case =
      LoginGoogleUserUseCase::new(Arc::new(repository), Arc::new(issuer()), Arc::new(verifier));
    let session = use_case.execute(token_dto()).await.unwrap();

    assert_eq!(session.user.name, "Ada");
  }

  #[tokio::test]
  async fn test_rejected_google_token_is_unauthorized() {
    let mut verifier = MockGoogleIdentityVerifier::new();
    verifier.expect_verify().returning(|_| Ok(None));

    let mut repository = MockAuthRepository::new();
    repository.expect_exists().never();

    let use_case =
      LoginGoogleUserUseCase::new(Arc::new(repository), Arc::new(issuer()), Arc::new(verifier));
    let error = use_case.execute(token_dto()).await.unwrap_err();

    match error {
      AuthError::Domain(e) => {
        assert_eq!(e.status(), 401);
        assert_eq!(e.message(), "Invalid Google token");
      }
      other => panic!("unexpected error: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_unverified_email_is_rejected() {
    let mut verifier = MockGoogleIdentityVerifier::new();
    verifier
      .expect_verify()
      .returning(|_| Ok(Some(identity(false))));

    let mut repository = MockAuthRepository::new();
    repository.expect_exists().never();

    let use_case =
      LoginGoogleUserUseCase::new(Arc::new(repository), Arc::new(issuer()), Arc::new(verifier));
    let error = use_case.execute(token_dto()).await.unwrap_err();

    assert!(matches!(error, AuthError::Domain(ref e) if e.status() == 401));
  }
}
