//! Validated request objects
//!
//! Every DTO is built through [`ValidatedDto::create`] from an untyped JSON
//! record, or from an identity that has already been verified. Once built, a
//! DTO is structurally valid for its action and is never re-validated.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use super::ports::GoogleIdentity;
use super::value_objects::{Email, Password};

/// Construction contract shared by all DTOs
pub trait ValidatedDto: Sized {
  /// Either a valid DTO or a message describing the first problems found
  fn create(raw: Value) -> Result<Self, String>;
}

/// How the caller proves who they are
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
  Password(Password),
  Google { subject: String },
}

/// Flattens validator errors into one message, ordered by field name
pub fn validation_message(errors: &ValidationErrors) -> String {
  let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
  fields.sort_by(|a, b| a.0.cmp(&b.0));

  fields
    .into_iter()
    .filter_map(|(field, errors)| {
      errors.first().map(|error| {
        error
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| format!("Invalid field: {}", field))
      })
    })
    .collect::<Vec<_>>()
    .join(", ")
}

fn parse_payload<P>(raw: Value) -> Result<P, String>
where
  P: DeserializeOwned + Validate,
{
  // Derived Deserialize would otherwise fill fields from an array by position
  if !raw.is_object() {
    return Err("Invalid request body: expected a JSON object".to_string());
  }

  let payload: P =
    serde_json::from_value(raw).map_err(|e| format!("Invalid request body: {}", e))?;
  payload.validate().map_err(|e| validation_message(&e))?;
  Ok(payload)
}

fn required(value: Option<String>, message: &str) -> Result<String, String> {
  value.ok_or_else(|| message.to_string())
}

fn parse_email(value: Option<String>) -> Result<Email, String> {
  let email = required(value, "Missing email")?;
  Email::new(email).map_err(|_| "Email is not valid".to_string())
}

// ============================================================================
// Register
// ============================================================================

#[derive(Deserialize, Validate)]
struct RegisterPayload {
  #[validate(required(message = "Missing name"), length(min = 1, message = "Missing name"))]
  name: Option<String>,

  #[validate(
    required(message = "Missing email"),
    email(message = "Email is not valid")
  )]
  email: Option<String>,

  #[validate(required(message = "Missing password"))]
  password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserDto {
  name: String,
  email: Email,
  credential: Credential,
  image: Option<String>,
}

impl RegisterUserDto {
  /// Registration for a Google account that has no local password
  pub fn from_google_identity(identity: &GoogleIdentity) -> Self {
    let name = identity
      .name
      .clone()
      .filter(|n| !n.trim().is_empty())
      .unwrap_or_else(|| identity.email.local_part().to_string());

    Self {
      name,
      email: identity.email.clone(),
      credential: Credential::Google {
        subject: identity.subject.clone(),
      },
      image: identity.picture.clone(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn email(&self) -> &Email {
    &self.email
  }

  pub fn credential(&self) -> &Credential {
    &self.credential
  }

  pub fn image(&self) -> Option<&str> {
    self.image.as_deref()
  }
}

impl ValidatedDto for RegisterUserDto {
  fn create(raw: Value) -> Result<Self, String> {
    let payload: RegisterPayload = parse_payload(raw)?;

    let name = required(payload.name, "Missing name")?.trim().to_string();
    if name.is_empty() {
      return Err("Missing name".to_string());
    }

    let email = parse_email(payload.email)?;
    let password =
      Password::new(required(payload.password, "Missing password")?).map_err(|e| e.to_string())?;

    Ok(Self {
      name,
      email,
      credential: Credential::Password(password),
      image: None,
    })
  }
}

// ============================================================================
// Login
// ============================================================================

#[derive(Deserialize, Validate)]
struct LoginPayload {
  #[validate(
    required(message = "Missing email"),
    email(message = "Email is not valid")
  )]
  email: Option<String>,

  #[validate(
    required(message = "Missing password"),
    length(min = 1, message = "Missing password")
  )]
  password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginUserDto {
  email: Email,
  credential: Credential,
}

impl LoginUserDto {
  /// Login for an existing account through a verified Google identity
  pub fn from_google_identity(identity: &GoogleIdentity) -> Self {
    Self {
      email: identity.email.clone(),
      credential: Credential::Google {
        subject: identity.subject.clone(),
      },
    }
  }

  pub fn email(&self) -> &Email {
    &self.email
  }

  pub fn credential(&self) -> &Credential {
    &self.credential
  }
}

impl ValidatedDto for LoginUserDto {
  fn create(raw: Value) -> Result<Self, String> {
    let payload: LoginPayload = parse_payload(raw)?;

    let email = parse_email(payload.email)?;
    let password = Password::for_verification(required(payload.password, "Missing password")?);

    Ok(Self {
      email,
      credential: Credential::Password(password),
    })
  }
}

// ============================================================================
// Exists
// ============================================================================

#[derive(Deserialize, Validate)]
struct ExistsPayload {
  #[validate(
    required(message = "Missing email"),
    email(message = "Email is not valid")
  )]
  email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistsUserDto {
  email: Email,
}

impl ExistsUserDto {
  pub fn from_email(email: Email) -> Self {
    Self { email }
  }

  pub fn email(&self) -> &Email {
    &self.email
  }
}

impl ValidatedDto for ExistsUserDto {
  fn create(raw: Value) -> Result<Self, String> {
    let payload: ExistsPayload = parse_payload(raw)?;
    Ok(Self {
      email: parse_email(payload.email)?,
    })
  }
}

// ============================================================================
// Identify
// ============================================================================

#[derive(Deserialize, Validate)]
struct IdentifyPayload {
  #[validate(required(message = "Missing id"))]
  id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifyUserDto {
  id: Uuid,
}

impl IdentifyUserDto {
  /// Identity taken from a token that has already been verified
  pub fn from_verified_id(id: Uuid) -> Self {
    Self { id }
  }

  pub fn id(&self) -> Uuid {
    self.id
  }
}

impl ValidatedDto for IdentifyUserDto {
  fn create(raw: Value) -> Result<Self, String> {
    let payload: IdentifyPayload = parse_payload(raw)?;
    let id = required(payload.id, "Missing id")?;
    let id = Uuid::parse_str(id.trim()).map_err(|_| "Invalid id".to_string())?;
    Ok(Self { id })
  }
}

// ============================================================================
// Token
// ============================================================================

#[derive(Deserialize, Validate)]
struct TokenPayload {
  #[validate(
    required(message = "Missing token"),
    length(min = 1, message = "Missing token")
  )]
  token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenDto {
  token: String,
}

impl TokenDto {
  pub fn token(&self) -> &str {
    &self.token
  }
}

impl ValidatedDto for TokenDto {
  fn create(raw: Value) -> Result<Self, String> {
    let payload: TokenPayload = parse_payload(raw)?;
    let token = required(payload.token, "Missing token")?.trim().to_string();
    if token.is_empty() {
      return Err("Missing token".to_string());
    }
    Ok(Self { token })
  }
}
