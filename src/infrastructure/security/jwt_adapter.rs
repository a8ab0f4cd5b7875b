use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::domain::auth::errors::{AuthError, TokenError};
use crate::domain::auth::ports::{SessionClaims, TokenIssuer, TokenVerifier};

/// Longest session a token may grant: one year
pub const MAX_TOKEN_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// HS256 session tokens carrying the user id
#[derive(Clone)]
pub struct JwtAdapter {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  validation: Validation,
  ttl: Duration,
}

impl JwtAdapter {
  /// Creates an adapter signing with `secret`; tokens live `ttl_seconds`
  ///
  /// The lifetime must lie within `1..=MAX_TOKEN_TTL_SECONDS`.
  pub fn new(secret: &str, ttl_seconds: u64) -> Result<Self, TokenError> {
    let ttl = Some(ttl_seconds)
      .filter(|secs| (1..=MAX_TOKEN_TTL_SECONDS).contains(secs))
      .and_then(|secs| i64::try_from(secs).ok())
      .and_then(Duration::try_seconds)
      .ok_or(TokenError::InvalidLifetime(ttl_seconds))?;

    Ok(Self {
      encoding_key: EncodingKey::from_secret(secret.as_bytes()),
      decoding_key: DecodingKey::from_secret(secret.as_bytes()),
      validation: Validation::new(Algorithm::HS256),
      ttl,
    })
  }

  /// Signs a token for the given user
  pub fn sign(&self, user_id: Uuid) -> Result<String, TokenError> {
    let now = Utc::now();
    let expires_at = now
      .checked_add_signed(self.ttl)
      .ok_or_else(|| TokenError::SigningFailed("Token expiry out of range".to_string()))?;
    let claims = SessionClaims {
      id: user_id,
      iat: now.timestamp(),
      exp: expires_at.timestamp(),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(|e| TokenError::SigningFailed(e.to_string()))
  }

  /// Decodes a token, treating any token-level defect as "no claim"
  pub fn decode(&self, token: &str) -> Result<Option<SessionClaims>, TokenError> {
    match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
      Ok(data) => Ok(Some(data.claims)),
      Err(e) => match e.kind() {
        ErrorKind::InvalidToken
        | ErrorKind::InvalidSignature
        | ErrorKind::ExpiredSignature
        | ErrorKind::ImmatureSignature
        | ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::InvalidSubject
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::Base64(_)
        | ErrorKind::Json(_)
        | ErrorKind::Utf8(_) => {
          tracing::debug!("Rejected session token: {}", e);
          Ok(None)
        }
        _ => Err(TokenError::VerificationFailed(e.to_string())),
      },
    }
  }
}

#[async_trait]
impl TokenIssuer for JwtAdapter {
  async fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
    Ok(self.sign(user_id)?)
  }
}

#[async_trait]
impl TokenVerifier for JwtAdapter {
  async fn validate_token(&self, token: &str) -> Result<Option<SessionClaims>, TokenError> {
    self.decode(token)
  }
}
