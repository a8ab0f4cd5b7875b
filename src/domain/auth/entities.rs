use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role every newly registered user receives
pub const DEFAULT_ROLE: &str = "USER_ROLE";

/// Canonical representation of an authenticated user
///
/// Owned by the datasource. Use cases and the repository only pass it along;
/// credentials never live on the entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEntity {
  /// Unique identifier for the user
  pub id: Uuid,
  /// Display name
  pub name: String,
  /// User's email address (unique, lower-cased)
  pub email: String,
  /// Whether the email has been confirmed (always true for Google accounts)
  pub email_verified: bool,
  /// Granted roles
  pub roles: Vec<String>,
  /// Avatar URL, if any
  #[serde(skip_serializing_if = "Option::is_none")]
  pub image: Option<String>,
  /// Timestamp when the user was created
  pub created_at: DateTime<Utc>,
}

impl UserEntity {
  /// Creates a new user with default role and no verified email
  pub fn new(name: String, email: String, image: Option<String>) -> Self {
    Self {
      id: Uuid::new_v4(),
      name,
      email,
      email_verified: false,
      roles: vec![DEFAULT_ROLE.to_string()],
      image,
      created_at: Utc::now(),
    }
  }
}
