//! Password hashing and one-time verification tokens.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::{self, SaltString},
};
use rand_core::{OsRng, RngCore as _};

const TOKEN_BYTES: usize = 32;

/// argon2 PHC string for `password`.
pub fn hash(password: &str) -> Result<String, password_hash::Error> {
  let salt = SaltString::generate(&mut OsRng);
  Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

/// False for a wrong password and for a stored hash that does not parse.
pub fn verify(password: &str, stored: &str) -> bool {
  PasswordHash::new(stored)
    .is_ok_and(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Hex-encoded random token for activation and reset links.
pub fn verification_token() -> String {
  let mut bytes = [0u8; TOKEN_BYTES];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// Run argon2 off the async executor.
pub async fn hash_blocking(password: String) -> Option<String> {
  tokio::task::spawn_blocking(move || hash(&password)).await.ok()?.ok()
}

pub async fn verify_blocking(password: String, stored: String) -> bool {
  tokio::task::spawn_blocking(move || verify(&password, &stored))
    .await
    .unwrap_or(false)
}
