pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;

// Re-export commonly used types
pub use dtos::ErrorResponse;
pub use errors::ApiError;
pub use handlers::auth::{
  exists_handler, login_google_handler, login_handler, profile_handler, refresh_handler,
  register_handler,
};
pub use middleware::{RequestId, RequestIdMiddleware};
pub use routes::{AuthDependencies, configure_auth_routes};
