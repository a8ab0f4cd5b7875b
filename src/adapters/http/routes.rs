use actix_web::web;
use std::sync::Arc;

use crate::domain::auth::ports::{
  AuthRepository, GoogleIdentityVerifier, TokenIssuer, TokenVerifier,
};

use super::errors::ApiError;
use super::handlers::auth::{
  exists_handler, login_google_handler, login_handler, profile_handler, refresh_handler,
  register_handler,
};

/// Collaborators the auth handlers build their use cases from
#[derive(Clone)]
pub struct AuthDependencies {
  pub repository: Arc<dyn AuthRepository>,
  pub token_issuer: Arc<dyn TokenIssuer>,
  pub token_verifier: Arc<dyn TokenVerifier>,
  pub google_verifier: Arc<dyn GoogleIdentityVerifier>,
}

/// Configure authentication API routes
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig, deps: AuthDependencies) {
  cfg
    .app_data(web::Data::new(deps))
    // Bodies that are not JSON at all never reach a handler
    .app_data(web::JsonConfig::default().error_handler(|err, _req| {
      ApiError::Validation(format!("Invalid request body: {}", err)).into()
    }))
    .route("/register", web::post().to(register_handler))
    .route("/login", web::post().to(login_handler))
    .route("/login/google", web::post().to(login_google_handler))
    .route("/exists", web::post().to(exists_handler))
    .route("/profile", web::post().to(profile_handler))
    .route("/refresh", web::post().to(refresh_handler));
}
