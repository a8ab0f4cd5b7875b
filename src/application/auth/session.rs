use serde::Serialize;

use crate::domain::auth::entities::UserEntity;

/// Authenticated user together with a freshly issued session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSession {
  pub user: UserEntity,
  pub token: String,
}

/// Result of a token refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshedToken {
  pub token: String,
}
