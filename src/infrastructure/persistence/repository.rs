use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::auth::dtos::{ExistsUserDto, IdentifyUserDto, LoginUserDto, RegisterUserDto};
use crate::domain::auth::entities::UserEntity;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::{AuthDatasource, AuthRepository};

/// Repository forwarding every call unchanged to a datasource
///
/// Kept as the seam for swapping datasource implementations.
pub struct AuthRepositoryImpl {
  datasource: Arc<dyn AuthDatasource>,
}

impl AuthRepositoryImpl {
  pub fn new(datasource: Arc<dyn AuthDatasource>) -> Self {
    Self { datasource }
  }
}

#[async_trait]
impl AuthRepository for AuthRepositoryImpl {
  async fn exists(&self, dto: ExistsUserDto) -> Result<bool, AuthError> {
    self.datasource.exists(dto).await
  }

  async fn login(&self, dto: LoginUserDto) -> Result<UserEntity, AuthError> {
    self.datasource.login(dto).await
  }

  async fn register(&self, dto: RegisterUserDto) -> Result<UserEntity, AuthError> {
    self.datasource.register(dto).await
  }

  async fn profile(&self, dto: IdentifyUserDto) -> Result<UserEntity, AuthError> {
    self.datasource.profile(dto).await
  }
}
