//! Shared site password, stored as an Argon2id PHC string.
//!
//! Passwords are compared case-insensitively: both hashing and verification
//! lowercase the input first.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("invalid password hash: {0}")]
    InvalidHash(String),
    #[error("failed to hash password: {0}")]
    Hash(String),
}

/// The stored hash every login is checked against.
#[derive(Debug)]
pub struct StoredPassword(SecretString);

impl StoredPassword {
    /// Wrap an existing PHC string after checking that it parses.
    ///
    /// # Errors
    /// Returns [`PasswordError::InvalidHash`] if the string is not a PHC hash.
    pub fn from_phc(phc: &str) -> Result<Self, PasswordError> {
        let phc = phc.trim();
        PasswordHash::new(phc).map_err(|err| PasswordError::InvalidHash(err.to_string()))?;
        Ok(Self(SecretString::from(phc.to_string())))
    }

    /// Read the hash written by `eventsite hash-password`.
    ///
    /// # Errors
    /// Returns an error if the file can not be read or does not hold a PHC hash.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read password file: {}", path.display()))?;
        Self::from_phc(&contents)
            .with_context(|| format!("Invalid password file: {}", path.display()))
    }

    /// Check a submitted password. Slow on purpose; call from a blocking thread.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(self.0.expose_secret()) else {
            return false;
        };
        Argon2::default()
            .verify_password(normalize(candidate).as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hash a password with the default Argon2id cost.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    hash_password_with(password, Params::default())
}

/// Hash a password with explicit Argon2id cost parameters.
///
/// # Errors
/// Returns an error if hashing fails.
pub fn hash_password_with(password: &str, params: Params) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let hash = argon2
        .hash_password(normalize(password).as_bytes(), &salt)
        .map_err(|err| PasswordError::Hash(err.to_string()))?;
    Ok(hash.to_string())
}

fn normalize(password: &str) -> String {
    password.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> Params {
        Params::new(8, 1, 1, None).unwrap()
    }

    #[test]
    fn verify_accepts_matching_password_in_any_case() {
        let hash = hash_password_with("Correct123", cheap()).unwrap();
        assert!(hash.starts_with("$argon2id$"));

        let stored = StoredPassword::from_phc(&hash).unwrap();
        assert!(stored.verify("correct123"));
        assert!(stored.verify("CORRECT123"));
        assert!(!stored.verify("wrong"));
        assert!(!stored.verify(""));
    }

    #[test]
    fn from_phc_rejects_garbage() {
        assert!(StoredPassword::from_phc("not a hash").is_err());
    }

    #[test]
    fn load_reads_trailing_newline_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("password");
        let hash = hash_password_with("correct123", cheap()).unwrap();
        std::fs::write(&path, format!("{hash}\n")).unwrap();

        let stored = StoredPassword::load(&path).unwrap();
        assert!(stored.verify("correct123"));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoredPassword::load(&dir.path().join("password")).unwrap_err();
        assert!(err.to_string().contains("Failed to read password file"));
    }
}
