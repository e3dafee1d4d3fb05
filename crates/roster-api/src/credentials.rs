//! Password hashing and verification.
//!
//! Hashes are argon2id PHC strings with a per-password random salt. Callers
//! treat them as opaque.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
  #[error("password hashing failed: {0}")]
  Hash(String),

  #[error("hashing task failed: {0}")]
  Task(#[from] tokio::task::JoinError),
}

/// Hash `plaintext` into a PHC string.
pub fn hash(plaintext: &str) -> Result<String, CredentialError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plaintext.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// `true` iff `plaintext` matches `hash`. An unparsable hash never matches.
pub fn verify(plaintext: &str, hash: &str) -> bool {
  let parsed = match PasswordHash::new(hash) {
    Ok(parsed) => parsed,
    Err(e) => {
      tracing::warn!("stored password hash is unparsable: {e}");
      return false;
    }
  };

  Argon2::default()
    .verify_password(plaintext.as_bytes(), &parsed)
    .is_ok()
}

/// [`hash`] on the blocking pool; argon2 is deliberately slow.
pub async fn hash_blocking(plaintext: String) -> Result<String, CredentialError> {
  tokio::task::spawn_blocking(move || hash(&plaintext)).await?
}

/// [`verify`] on the blocking pool.
pub async fn verify_blocking(plaintext: String, hash: String) -> Result<bool, CredentialError> {
  Ok(tokio::task::spawn_blocking(move || verify(&plaintext, &hash)).await?)
}
