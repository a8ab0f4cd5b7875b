pub mod dtos;
pub mod entities;
pub mod errors;
pub mod ports;
pub mod value_objects;

// Re-export commonly used types
pub use dtos::{
  Credential, ExistsUserDto, IdentifyUserDto, LoginUserDto, RegisterUserDto, TokenDto,
  ValidatedDto,
};
pub use entities::UserEntity;
pub use errors::{AuthError, DomainError, HashError, RepositoryError, TokenError};
pub use ports::{
  AuthDatasource, AuthRepository, GoogleIdentity, GoogleIdentityVerifier, PasswordHasher,
  SessionClaims, TokenIssuer, TokenVerifier,
};
pub use value_objects::{Email, Password, PasswordHash};
