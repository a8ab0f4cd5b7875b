use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::auth::errors::{AuthError, DomainError};
use crate::domain::auth::ports::{GoogleIdentity, GoogleIdentityVerifier};
use crate::domain::auth::value_objects::Email;

/// Google's public token introspection endpoint
pub const DEFAULT_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Claims returned by the tokeninfo endpoint
///
/// Google encodes booleans in this response as strings.
#[derive(Debug, Deserialize)]
struct TokenInfo {
  aud: String,
  sub: String,
  email: Option<String>,
  email_verified: Option<String>,
  name: Option<String>,
  picture: Option<String>,
}

impl TokenInfo {
  /// Converts to an identity if the token was issued for `client_id`
  fn into_identity(self, client_id: &str) -> Option<GoogleIdentity> {
    if self.aud != client_id {
      tracing::warn!("Google token issued for another client: {}", self.aud);
      return None;
    }

    let email = Email::new(self.email?).ok()?;

    Some(GoogleIdentity {
      subject: self.sub,
      email,
      email_verified: self.email_verified.as_deref() == Some("true"),
      name: self.name,
      picture: self.picture,
    })
  }
}

/// Verifies Google ID tokens through the tokeninfo endpoint
pub struct GoogleTokenInfoVerifier {
  client: reqwest::Client,
  tokeninfo_url: String,
  client_id: String,
}

impl GoogleTokenInfoVerifier {
  pub fn new(
    client_id: String,
    tokeninfo_url: String,
    request_timeout: Duration,
  ) -> Result<Self, AuthError> {
    let client = reqwest::Client::builder()
      .timeout(request_timeout)
      .build()
      .map_err(|e| AuthError::IdentityProvider(e.to_string()))?;

    Ok(Self {
      client,
      tokeninfo_url,
      client_id,
    })
  }
}

#[async_trait]
impl GoogleIdentityVerifier for GoogleTokenInfoVerifier {
  async fn verify(&self, id_token: &str) -> Result<Option<GoogleIdentity>, AuthError> {
    let response = self
      .client
      .get(&self.tokeninfo_url)
      .query(&[("id_token", id_token)])
      .send()
      .await
      .map_err(|e| AuthError::IdentityProvider(format!("tokeninfo request failed: {}", e)))?;

    // Invalid or expired tokens are answered with 400
    if response.status() == reqwest::StatusCode::BAD_REQUEST {
      return Ok(None);
    }

    let info: TokenInfo = response
      .error_for_status()
      .map_err(|e| AuthError::IdentityProvider(e.to_string()))?
      .json()
      .await
      .map_err(|e| AuthError::IdentityProvider(format!("invalid tokeninfo response: {}", e)))?;

    Ok(info.into_identity(&self.client_id))
  }
}

/// Stand-in used when no Google client is configured
pub struct UnconfiguredGoogleVerifier;

#[async_trait]
impl GoogleIdentityVerifier for UnconfiguredGoogleVerifier {
  async fn verify(&self, _id_token: &str) -> Result<Option<GoogleIdentity>, AuthError> {
    Err(DomainError::unavailable("Google sign-in is not configured").into())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn token_info(aud: &str, email: Option<&str>) -> TokenInfo {
    serde_json::from_value(json!({
      "aud": aud,
      "sub": "110169484474386276334",
      "email": email,
      "email_verified": "true",
      "name": "Ada Lovelace",
      "picture": "https://lh3.googleusercontent.com/a/ada",
      "exp": "1700000000"
    }))
    .unwrap()
  }

  #[test]
  fn test_identity_for_matching_audience() {
    let identity = token_info("client-1", Some("Ada@Gmail.com"))
      .into_identity("client-1")
      .unwrap();

    assert_eq!(identity.subject, "110169484474386276334");
    assert_eq!(identity.email.as_str(), "ada@gmail.com");
    assert!(identity.email_verified);
    assert_eq!(identity.name.as_deref(), Some("Ada Lovelace"));
  }

  #[test]
  fn test_audience_mismatch_yields_no_identity() {
    assert!(
      token_info("client-2", Some("ada@gmail.com"))
        .into_identity("client-1")
        .is_none()
    );
  }

  #[test]
  fn test_missing_email_yields_no_identity() {
    assert!(token_info("client-1", None).into_identity("client-1").is_none());
  }

  #[test]
  fn test_unverified_email_flag() {
    let mut info = token_info("client-1", Some("ada@gmail.com"));
    info.email_verified = Some("false".to_string());

    assert!(!info.into_identity("client-1").unwrap().email_verified);
  }

  #[tokio::test]
  async fn test_unconfigured_verifier_is_unavailable() {
    let error = UnconfiguredGoogleVerifier.verify("token").await.unwrap_err();

    assert!(matches!(error, AuthError::Domain(ref e) if e.status() == 503));
  }
}
