use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::dtos::{
  Credential, ExistsUserDto, IdentifyUserDto, LoginUserDto, RegisterUserDto,
};
use crate::domain::auth::entities::UserEntity;
use crate::domain::auth::errors::{AuthError, DomainError};
use crate::domain::auth::ports::{AuthDatasource, PasswordHasher};
use crate::domain::auth::value_objects::PasswordHash;

use super::{INVALID_CREDENTIALS, USER_ALREADY_EXISTS, USER_NOT_FOUND};

#[derive(Clone)]
struct StoredUser {
  user: UserEntity,
  password_hash: Option<PasswordHash>,
  google_subject: Option<String>,
}

/// Process-local datasource
///
/// Used when no database is configured. State is lost on restart.
pub struct InMemoryAuthDatasource {
  users: RwLock<HashMap<Uuid, StoredUser>>,
  password_hasher: Arc<dyn PasswordHasher>,
}

impl InMemoryAuthDatasource {
  pub fn new(password_hasher: Arc<dyn PasswordHasher>) -> Self {
    Self {
      users: RwLock::new(HashMap::new()),
      password_hasher,
    }
  }

  async fn find_by_email(&self, email: &str) -> Option<StoredUser> {
    self
      .users
      .read()
      .await
      .values()
      .find(|stored| stored.user.email == email)
      .cloned()
  }

  /// First Google sign-in for an account created with a password
  ///
  /// The link is re-checked under the write lock; a subject linked by a
  /// concurrent sign-in wins.
  async fn link_google_subject(
    &self,
    user_id: Uuid,
    subject: &str,
  ) -> Result<UserEntity, AuthError> {
    let mut users = self.users.write().await;
    let entry = users
      .get_mut(&user_id)
      .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

    match entry.google_subject.as_deref() {
      Some(linked) if linked == subject => Ok(entry.user.clone()),
      Some(_) => Err(DomainError::unauthorized(INVALID_CREDENTIALS).into()),
      None => {
        entry.google_subject = Some(subject.to_string());
        entry.user.email_verified = true;
        Ok(entry.user.clone())
      }
    }
  }
}

#[async_trait]
impl AuthDatasource for InMemoryAuthDatasource {
  async fn exists(&self, dto: ExistsUserDto) -> Result<bool, AuthError> {
    Ok(self.find_by_email(dto.email().as_str()).await.is_some())
  }

  async fn login(&self, dto: LoginUserDto) -> Result<UserEntity, AuthError> {
    let stored = self
      .find_by_email(dto.email().as_str())
      .await
      .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

    match dto.credential() {
      Credential::Password(password) => {
        let hash = stored
          .password_hash
          .as_ref()
          .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

        if !self.password_hasher.verify(password, hash).await? {
          return Err(DomainError::unauthorized(INVALID_CREDENTIALS).into());
        }

        Ok(stored.user)
      }
      Credential::Google { subject } => match &stored.google_subject {
        Some(linked) if linked == subject => Ok(stored.user),
        Some(_) => Err(DomainError::unauthorized(INVALID_CREDENTIALS).into()),
        None => self.link_google_subject(stored.user.id, subject).await,
      },
    }
  }

  async fn register(&self, dto: RegisterUserDto) -> Result<UserEntity, AuthError> {
    let (password_hash, google_subject) = match dto.credential() {
      Credential::Password(password) => (Some(self.password_hasher.hash(password).await?), None),
      Credential::Google { subject } => (None, Some(subject.clone())),
    };

    let mut user = UserEntity::new(
      dto.name().to_string(),
      dto.email().to_string(),
      dto.image().map(str::to_string),
    );
    user.email_verified = google_subject.is_some();

    let mut users = self.users.write().await;
    if users.values().any(|stored| stored.user.email == user.email) {
      return Err(DomainError::conflict(USER_ALREADY_EXISTS).into());
    }

    users.insert(
      user.id,
      StoredUser {
        user: user.clone(),
        password_hash,
        google_subject,
      },
    );

    Ok(user)
  }

  async fn profile(&self, dto: IdentifyUserDto) -> Result<UserEntity, AuthError> {
    self
      .users
      .read()
      .await
      .get(&dto.id())
      .map(|stored| stored.user.clone())
      .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND).into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::dtos::ValidatedDto;
  use crate::domain::auth::ports::GoogleIdentity;
  use crate::domain::auth::value_objects::Email;
  use crate::infrastructure::security::Argon2PasswordHasher;
  use serde_json::json;

  fn datasource() -> InMemoryAuthDatasource {
    InMemoryAuthDatasource::new(Arc::new(Argon2PasswordHasher::new().unwrap()))
  }

  fn register_dto(email: &str) -> RegisterUserDto {
    RegisterUserDto::create(json!({
      "name": "Ada",
      "email": email,
      "password": "analytical-engine"
    }))
    .unwrap()
  }

  fn google_identity(subject: &str) -> GoogleIdentity {
    GoogleIdentity {
      subject: subject.to_string(),
      email: Email::new("ada@example.com").unwrap(),
      email_verified: true,
      name: Some("Ada".to_string()),
      picture: None,
    }
  }

  fn domain_status(error: AuthError) -> u16 {
    match error {
      AuthError::Domain(e) => e.status(),
      other => panic!("unexpected error: {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_register_and_exists() {
    let datasource = datasource();
    let exists = ExistsUserDto::create(json!({ "email": "ada@example.com" })).unwrap();

    assert!(!datasource.exists(exists.clone()).await.unwrap());
    datasource.register(register_dto("ada@example.com")).await.unwrap();
    assert!(datasource.exists(exists).await.unwrap());
  }

  #[tokio::test]
  async fn test_duplicate_registration_conflicts() {
    let datasource = datasource();
    datasource.register(register_dto("ada@example.com")).await.unwrap();

    let error = datasource
      .register(register_dto("ADA@example.com"))
      .await
      .unwrap_err();
    assert_eq!(domain_status(error), 409);
  }

  #[tokio::test]
  async fn test_login_unknown_email_is_invalid_credentials() {
    let error = datasource()
      .login(
        LoginUserDto::create(json!({
          "email": "ghost@example.com",
          "password": "whatever"
        }))
        .unwrap(),
      )
      .await
      .unwrap_err();
    assert_eq!(domain_status(error), 401);
  }

  #[tokio::test]
  async fn test_profile_unknown_id_is_not_found() {
    let error = datasource()
      .profile(IdentifyUserDto::from_verified_id(Uuid::new_v4()))
      .await
      .unwrap_err();
    assert_eq!(domain_status(error), 404);
  }

  #[tokio::test]
  async fn test_google_sign_in_links_password_account() {
    let datasource = datasource();
    let registered = datasource.register(register_dto("ada@example.com")).await.unwrap();
    assert!(!registered.email_verified);

    let identity = google_identity("g-1");
    let linked = datasource
      .login(LoginUserDto::from_google_identity(&identity))
      .await
      .unwrap();
    assert_eq!(linked.id, registered.id);
    assert!(linked.email_verified);

    let other = google_identity("g-2");
    let error = datasource
      .login(LoginUserDto::from_google_identity(&other))
      .await
      .unwrap_err();
    assert_eq!(domain_status(error), 401);
  }

  #[tokio::test]
  async fn test_stale_read_cannot_replace_linked_subject() {
    let datasource = datasource();
    let registered = datasource.register(register_dto("ada@example.com")).await.unwrap();

    // Both sign-ins observed an unlinked account before either wrote
    let first = datasource
      .link_google_subject(registered.id, "g-1")
      .await
      .unwrap();
    assert!(first.email_verified);

    let error = datasource
      .link_google_subject(registered.id, "g-2")
      .await
      .unwrap_err();
    assert_eq!(domain_status(error), 401);

    // The same subject racing itself is still accepted
    let again = datasource
      .link_google_subject(registered.id, "g-1")
      .await
      .unwrap();
    assert_eq!(again.id, registered.id);

    let linked = datasource
      .login(LoginUserDto::from_google_identity(&google_identity("g-1")))
      .await
      .unwrap();
    assert_eq!(linked.id, registered.id);
  }

  #[tokio::test]
  async fn test_google_account_cannot_use_password_login() {
    let datasource = datasource();
    datasource
      .register(RegisterUserDto::from_google_identity(&google_identity("g-1")))
      .await
      .unwrap();

    let error = datasource
      .login(
        LoginUserDto::create(json!({
          "email": "ada@example.com",
          "password": "analytical-engine"
        }))
        .unwrap(),
      )
      .await
      .unwrap_err();
    assert_eq!(domain_status(error), 401);
  }
}
