use std::sync::Arc;

use crate::domain::auth::dtos::ExistsUserDto;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::AuthRepository;

/// Use case checking whether an account exists for an email
///
/// A missing account is a successful `false`, not an error.
pub struct ExistsUserUseCase {
  repository: Arc<dyn AuthRepository>,
}

impl ExistsUserUseCase {
  pub fn new(repository: Arc<dyn AuthRepository>) -> Self {
    Self { repository }
  }

  pub async fn execute(&self, dto: ExistsUserDto) -> Result<bool, AuthError> {
    self.repository.exists(dto).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::dtos::ValidatedDto;
  use crate::domain::auth::ports::MockAuthRepository;
  use serde_json::json;

  #[tokio::test]
  async fn test_missing_user_is_false_not_error() {
    let mut repository = MockAuthRepository::new();
    repository
      .expect_exists()
      .withf(|dto| dto.email().as_str() == "nobody@example.com")
      .returning(|_| Ok(false));

    let dto = ExistsUserDto::create(json!({ "email": "nobody@example.com" })).unwrap();
    let exists = ExistsUserUseCase::new(Arc::new(repository))
      .execute(dto)
      .await
      .unwrap();

    assert!(!exists);
  }
}
