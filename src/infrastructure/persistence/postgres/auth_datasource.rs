use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::dtos::{
  Credential, ExistsUserDto, IdentifyUserDto, LoginUserDto, RegisterUserDto,
};
use crate::domain::auth::entities::UserEntity;
use crate::domain::auth::errors::{AuthError, DomainError, RepositoryError};
use crate::domain::auth::ports::{AuthDatasource, PasswordHasher};
use crate::domain::auth::value_objects::PasswordHash;

use super::super::{INVALID_CREDENTIALS, USER_ALREADY_EXISTS, USER_NOT_FOUND};

const USER_COLUMNS: &str =
  "id, name, email, password_hash, google_subject, email_verified, roles, image, created_at";

/// PostgreSQL implementation of the AuthDatasource trait
pub struct PostgresAuthDatasource {
  pool: PgPool,
  password_hasher: Arc<dyn PasswordHasher>,
}

impl PostgresAuthDatasource {
  pub fn new(pool: PgPool, password_hasher: Arc<dyn PasswordHasher>) -> Self {
    Self {
      pool,
      password_hasher,
    }
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<UserRow>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {} FROM users WHERE email = $1",
      USER_COLUMNS
    ))
    .bind(email)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find user by email: {}", e);
      e
    })?;

    Ok(row)
  }

  async fn link_google_subject(&self, user_id: Uuid, subject: &str) -> Result<UserRow, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            UPDATE users
            SET google_subject = $2, email_verified = TRUE, updated_at = NOW()
            WHERE id = $1 AND google_subject IS NULL
            RETURNING {}
            "#,
      USER_COLUMNS
    ))
    .bind(user_id)
    .bind(subject)
    .fetch_optional(&self.pool)
    .await?;

    // Another subject was linked concurrently
    row.ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS).into())
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  name: String,
  email: String,
  password_hash: Option<String>,
  google_subject: Option<String>,
  email_verified: bool,
  roles: Vec<String>,
  image: Option<String>,
  created_at: DateTime<Utc>,
}

impl From<UserRow> for UserEntity {
  fn from(row: UserRow) -> Self {
    UserEntity {
      id: row.id,
      name: row.name,
      email: row.email,
      email_verified: row.email_verified,
      roles: row.roles,
      image: row.image,
      created_at: row.created_at,
    }
  }
}

#[async_trait]
impl AuthDatasource for PostgresAuthDatasource {
  async fn exists(&self, dto: ExistsUserDto) -> Result<bool, AuthError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
      .bind(dto.email().as_str())
      .fetch_one(&self.pool)
      .await?;

    Ok(exists)
  }

  async fn login(&self, dto: LoginUserDto) -> Result<UserEntity, AuthError> {
    let row = self
      .find_by_email(dto.email().as_str())
      .await?
      .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;

    match dto.credential() {
      Credential::Password(password) => {
        let stored = row
          .password_hash
          .as_deref()
          .ok_or_else(|| DomainError::unauthorized(INVALID_CREDENTIALS))?;
        let hash = PasswordHash::from_hash(stored)?;

        if !self.password_hasher.verify(password, &hash).await? {
          return Err(DomainError::unauthorized(INVALID_CREDENTIALS).into());
        }

        Ok(row.into())
      }
      Credential::Google { subject } => match row.google_subject.as_deref() {
        Some(linked) if linked == subject => Ok(row.into()),
        Some(_) => Err(DomainError::unauthorized(INVALID_CREDENTIALS).into()),
        None => Ok(self.link_google_subject(row.id, subject).await?.into()),
      },
    }
  }

  async fn register(&self, dto: RegisterUserDto) -> Result<UserEntity, AuthError> {
    let (password_hash, google_subject) = match dto.credential() {
      Credential::Password(password) => (
        Some(self.password_hasher.hash(password).await?.into_inner()),
        None,
      ),
      Credential::Google { subject } => (None, Some(subject.clone())),
    };

    let mut user = UserEntity::new(
      dto.name().to_string(),
      dto.email().to_string(),
      dto.image().map(str::to_string),
    );
    user.email_verified = google_subject.is_some();

    let result = sqlx::query_as::<_, UserRow>(&format!(
      r#"
            INSERT INTO users (
                id, name, email, password_hash, google_subject,
                email_verified, roles, image, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {}
            "#,
      USER_COLUMNS
    ))
    .bind(user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(password_hash)
    .bind(google_subject)
    .bind(user.email_verified)
    .bind(&user.roles)
    .bind(&user.image)
    .bind(user.created_at)
    .fetch_one(&self.pool)
    .await;

    match result.map_err(RepositoryError::from) {
      Ok(row) => Ok(row.into()),
      Err(RepositoryError::DuplicateKey(_)) => {
        Err(DomainError::conflict(USER_ALREADY_EXISTS).into())
      }
      Err(e) => {
        tracing::error!("Failed to create user: {}", e);
        Err(e.into())
      }
    }
  }

  async fn profile(&self, dto: IdentifyUserDto) -> Result<UserEntity, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
      "SELECT {} FROM users WHERE id = $1",
      USER_COLUMNS
    ))
    .bind(dto.id())
    .fetch_optional(&self.pool)
    .await?;

    row
      .map(UserEntity::from)
      .ok_or_else(|| DomainError::not_found(USER_NOT_FOUND).into())
  }
}
