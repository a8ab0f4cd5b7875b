use std::sync::Arc;

use crate::domain::auth::dtos::IdentifyUserDto;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::ports::TokenIssuer;

use super::session::RefreshedToken;

/// Use case issuing a new session token for an already verified identity
///
/// Works purely on the verified claim; the repository is never consulted.
pub struct RefreshUserUseCase {
  token_issuer: Arc<dyn TokenIssuer>,
}

impl RefreshUserUseCase {
  pub fn new(token_issuer: Arc<dyn TokenIssuer>) -> Self {
    Self { token_issuer }
  }

  pub async fn execute(&self, dto: IdentifyUserDto) -> Result<RefreshedToken, AuthError> {
    let token = self.token_issuer.issue(dto.id()).await?;
    Ok(RefreshedToken { token })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::auth::ports::MockTokenIssuer;
  use uuid::Uuid;

  #[tokio::test]
  async fn test_refresh_issues_token_for_identity() {
    let user_id = Uuid::new_v4();

    let mut issuer = MockTokenIssuer::new();
    issuer
      .expect_issue()
      .withf(move |id| *id == user_id)
      .times(1)
      .returning(|_| Ok("fresh-token".to_string()));

    let refreshed = RefreshUserUseCase::new(Arc::new(issuer))
      .execute(IdentifyUserDto::from_verified_id(user_id))
      .await
      .unwrap();

    assert_eq!(refreshed.token, "fresh-token");
  }
}
