use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use std::fmt;

use crate::domain::auth::errors::{AuthError, DomainError};

use super::dtos::ErrorResponse;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// API error type that maps failures to HTTP responses
#[derive(Debug)]
pub enum ApiError {
  /// Request body rejected before any use case ran (400 Bad Request)
  Validation(String),

  /// Session token missing, invalid or expired (401 Unauthorized)
  Unauthorized(String),

  /// Business-rule violation, reported with its own status and message
  Domain(DomainError),

  /// Anything else (500 Internal Server Error)
  Internal(String),
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
      ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
      ApiError::Domain(err) => write!(f, "Domain error ({}): {}", err.status(), err),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::Domain(err) => {
        StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
      }
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let message = match self {
      ApiError::Validation(msg) | ApiError::Unauthorized(msg) => msg.clone(),
      ApiError::Domain(err) => err.message().to_string(),
      ApiError::Internal(msg) => {
        // Details stay in the logs
        tracing::error!("Internal error: {}", msg);
        INTERNAL_ERROR_MESSAGE.to_string()
      }
    };

    HttpResponse::build(self.status_code())
      .content_type(ContentType::json())
      .json(ErrorResponse { error: message })
  }
}

/// Convert AuthError to ApiError
impl From<AuthError> for ApiError {
  fn from(error: AuthError) -> Self {
    match error {
      AuthError::Domain(err) => ApiError::Domain(err),
      other => ApiError::Internal(other.to_string()),
    }
  }
}
