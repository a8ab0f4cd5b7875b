mod argon2_hasher;
mod google_verifier;
mod jwt_adapter;

pub use argon2_hasher::{
  Argon2PasswordHasher, DEFAULT_ITERATIONS, DEFAULT_MEMORY_KIB, DEFAULT_PARALLELISM, HashCost,
};
pub use google_verifier::{
  DEFAULT_TOKENINFO_URL, GoogleTokenInfoVerifier, UnconfiguredGoogleVerifier,
};
pub use jwt_adapter::{JwtAdapter, MAX_TOKEN_TTL_SECONDS};
