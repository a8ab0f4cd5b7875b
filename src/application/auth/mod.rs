//! Authentication use cases
//!
//! Each use case wraps a single repository call (or, for refresh, a single
//! token issuance) and lets every error propagate unchanged.

mod exists_user;
mod login_google_user;
mod login_user;
mod profile_user;
mod refresh_user;
mod register_user;
mod session;

pub use exists_user::ExistsUserUseCase;
pub use login_google_user::LoginGoogleUserUseCase;
pub use login_user::LoginUserUseCase;
pub use profile_user::ProfileUserUseCase;
pub use refresh_user::RefreshUserUseCase;
pub use register_user::RegisterUserUseCase;
pub use session::{AuthSession, RefreshedToken};
