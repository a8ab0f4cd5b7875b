use std::sync::Arc;

use crate::domain::auth::dtos::IdentifyUserDto;
use crate::domain::auth::entities::UserEntity;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::AuthRepository;

/// Use case returning the profile of an identified user
pub struct ProfileUserUseCase {
  repository: Arc<dyn AuthRepository>,
}

impl ProfileUserUseCase {
  pub fn new(repository: Arc<dyn AuthRepository>) -> Self {
    Self { repository }
  }

  /// # Errors
  /// A 404 `DomainError` raised by the datasource for unknown ids
  pub async fn execute(&self, dto: IdentifyUserDto) -> Result<UserEntity, AuthError> {
    self.repository.profile(dto).await
  }
}
