use actix_web::{HttpResponse, web};
use serde_json::Value;

use crate::adapters::http::{errors::ApiError, routes::AuthDependencies};
use crate::application::auth::{
  ExistsUserUseCase, LoginGoogleUserUseCase, LoginUserUseCase, ProfileUserUseCase,
  RefreshUserUseCase, RegisterUserUseCase,
};
use crate::domain::auth::dtos::{
  ExistsUserDto, IdentifyUserDto, LoginUserDto, RegisterUserDto, TokenDto, ValidatedDto,
};

const INVALID_TOKEN: &str = "Invalid token";

/// Build the DTO for an action from the raw JSON body
fn validate<D: ValidatedDto>(body: web::Json<Value>) -> Result<D, ApiError> {
  D::create(body.into_inner()).map_err(ApiError::Validation)
}

/// Handler for user registration
///
/// POST /api/auth/register
/// Body: {name, email, password}
/// Response: {user, token}
pub async fn register_handler(
  body: web::Json<Value>,
  deps: web::Data<AuthDependencies>,
) -> Result<HttpResponse, ApiError> {
  let dto: RegisterUserDto = validate(body)?;

  let session = RegisterUserUseCase::new(deps.repository.clone(), deps.token_issuer.clone())
    .execute(dto)
    .await?;

  Ok(HttpResponse::Ok().json(session))
}

/// Handler for user login
///
/// POST /api/auth/login
/// Body: {email, password}
/// Response: {user, token}
pub async fn login_handler(
  body: web::Json<Value>,
  deps: web::Data<AuthDependencies>,
) -> Result<HttpResponse, ApiError> {
  let dto: LoginUserDto = validate(body)?;

  let session = LoginUserUseCase::new(deps.repository.clone(), deps.token_issuer.clone())
    .execute(dto)
    .await?;

  Ok(HttpResponse::Ok().json(session))
}

/// Handler for Google sign-in
///
/// POST /api/auth/login/google
/// Body: {token} (Google ID token)
/// Response: {user, token}
pub async fn login_google_handler(
  body: web::Json<Value>,
  deps: web::Data<AuthDependencies>,
) -> Result<HttpResponse, ApiError> {
  let dto: TokenDto = validate(body)?;

  let session = LoginGoogleUserUseCase::new(
    deps.repository.clone(),
    deps.token_issuer.clone(),
    deps.google_verifier.clone(),
  )
  .execute(dto)
  .await?;

  Ok(HttpResponse::Ok().json(session))
}

/// POST /api/auth/exists
pub async fn exists_handler(
  body: web::Json<Value>,
  deps: web::Data<AuthDependencies>,
) -> Result<HttpResponse, ApiError> {
  let dto: ExistsUserDto = validate(body)?;

  let exists = ExistsUserUseCase::new(deps.repository.clone())
    .execute(dto)
    .await?;

  Ok(HttpResponse::Ok().json(exists))
}

/// POST /api/auth/profile
pub async fn profile_handler(
  body: web::Json<Value>,
  deps: web::Data<AuthDependencies>,
) -> Result<HttpResponse, ApiError> {
  let dto: IdentifyUserDto = validate(body)?;

  let user = ProfileUserUseCase::new(deps.repository.clone())
    .execute(dto)
    .await?;

  Ok(HttpResponse::Ok().json(user))
}

/// Handler for session token refresh
///
/// POST /api/auth/refresh
/// Body: {token} (session token)
/// Response: {token}
///
/// The token is verified before the use case is built; a rejected token
/// answers 401 without touching anything else.
pub async fn refresh_handler(
  body: web::Json<Value>,
  deps: web::Data<AuthDependencies>,
) -> Result<HttpResponse, ApiError> {
  let dto: TokenDto = validate(body)?;

  let claims = deps
    .token_verifier
    .validate_token(dto.token())
    .await
    .map_err(|e| ApiError::Unauthorized(e.to_string()))?
    .ok_or_else(|| ApiError::Unauthorized(INVALID_TOKEN.to_string()))?;

  let refreshed = RefreshUserUseCase::new(deps.token_issuer.clone())
    .execute(IdentifyUserDto::from_verified_id(claims.id))
    .await?;

  Ok(HttpResponse::Ok().json(refreshed))
}
