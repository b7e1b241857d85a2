use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("could not hash password")]
    Hash(#[source] password_hash::Error),

    /// The stored value is not a PHC string argon2 can read.
    #[error("stored password hash is unreadable")]
    StoredHash(#[source] password_hash::Error),

    #[error("could not verify password")]
    Verify(#[source] password_hash::Error),
}

/// Salted argon2id digest in PHC string form, safe to store as-is.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|digest| digest.to_string())
        .map_err(PasswordError::Hash)
}

/// `Ok(false)` only for a wrong password; anything else wrong with the stored hash is an error.
pub fn password_matches(plain: &str, stored: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(stored).map_err(PasswordError::StoredHash)?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verify(e)),
    }
}
