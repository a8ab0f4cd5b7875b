use argon2::password_hash::SaltString;
use argon2::{
  Algorithm, Argon2, Params, Version,
  password_hash::{
    PasswordHash as Argon2PasswordHash, PasswordHasher as Argon2PasswordHasherTrait,
    PasswordVerifier,
  },
};
use async_trait::async_trait;

use crate::domain::auth::errors::{AuthError, HashError};
use crate::domain::auth::ports::PasswordHasher;
use crate::domain::auth::value_objects::{Password, PasswordHash};

pub const DEFAULT_MEMORY_KIB: u32 = 19456;
pub const DEFAULT_ITERATIONS: u32 = 2;
pub const DEFAULT_PARALLELISM: u32 = 1;

const OUTPUT_LEN: usize = 32;

/// Argon2id cost parameters applied to newly hashed passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
  pub memory_kib: u32,
  pub iterations: u32,
  pub parallelism: u32,
}

impl Default for HashCost {
  fn default() -> Self {
    Self {
      memory_kib: DEFAULT_MEMORY_KIB,
      iterations: DEFAULT_ITERATIONS,
      parallelism: DEFAULT_PARALLELISM,
    }
  }
}

/// Argon2id password hasher
///
/// Hashing and verification are CPU bound and run on the blocking pool.
/// Stored hashes carry their own parameters, so raising the cost does not
/// lock out accounts hashed under the previous one.
#[derive(Clone)]
pub struct Argon2PasswordHasher {
  argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
  pub fn new() -> Result<Self, AuthError> {
    Self::with_cost(HashCost::default())
  }

  pub fn with_cost(cost: HashCost) -> Result<Self, AuthError> {
    let params = Params::new(
      cost.memory_kib,
      cost.iterations,
      cost.parallelism,
      Some(OUTPUT_LEN),
    )
    .map_err(|e| HashError::HashingFailed(format!("Invalid Argon2 parameters: {}", e)))?;

    Ok(Self {
      argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
    })
  }

  async fn run_blocking<T, F>(&self, job: F) -> Result<T, AuthError>
  where
    F: FnOnce(Argon2<'static>) -> Result<T, AuthError> + Send + 'static,
    T: Send + 'static,
  {
    let argon2 = self.argon2.clone();
    tokio::task::spawn_blocking(move || job(argon2))
      .await
      .map_err(|e| HashError::HashingFailed(format!("Hashing task failed: {}", e)))?
  }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
  async fn hash(&self, password: &Password) -> Result<PasswordHash, AuthError> {
    let password = password.clone();

    self
      .run_blocking(move |argon2| {
        let salt = SaltString::generate(&mut rand::rngs::OsRng);
        let hash = argon2
          .hash_password(password.as_str().as_bytes(), &salt)
          .map_err(|e| HashError::HashingFailed(e.to_string()))?;

        Ok(PasswordHash::from_hash(hash.to_string())?)
      })
      .await
  }

  /// Verification runs in constant time inside `verify_password`
  async fn verify(
    &self,
    password: &Password,
    hashed_password: &PasswordHash,
  ) -> Result<bool, AuthError> {
    let password = password.clone();
    let stored = hashed_password.as_str().to_string();

    self
      .run_blocking(move |argon2| {
        let parsed = Argon2PasswordHash::new(&stored)
          .map_err(|e| HashError::VerificationFailed(e.to_string()))?;

        match argon2.verify_password(password.as_str().as_bytes(), &parsed) {
          Ok(()) => Ok(true),
          Err(argon2::password_hash::Error::Password) => Ok(false),
          Err(e) => Err(HashError::VerificationFailed(e.to_string()).into()),
        }
      })
      .await
  }
}
