//! Password hashing with Argon2

use std::sync::LazyLock;

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Stand-in hash checked when no account matches, so both paths cost one verification
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no-such-account").ok());

/// Hash a plaintext password into a PHC string
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a plaintext password against a stored PHC string
///
/// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
pub fn verify_password(password_hash: &str, password: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// [`hash_password`] on the blocking thread pool
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password)).await?
}

/// [`verify_password`] on the blocking thread pool
pub async fn verify_password_blocking(password_hash: String, password: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password_hash, &password)).await?
}

/// Run a full verification against a stand-in hash; never matches
pub async fn verify_dummy_password_blocking(password: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || {
        let hash = DUMMY_HASH
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Failed to prepare dummy password hash"))?;
        verify_password(hash, &password).map(|_| false)
    })
    .await?
}
