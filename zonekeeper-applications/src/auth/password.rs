//! Password hashing using Argon2
//!
//! Credentials are stored as one-way hashes and verified by the hash, never
//! compared in plaintext.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use zonekeeper_core::{ZonekeeperError, ZonekeeperResult};

const COMPONENT: &str = "password";

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> ZonekeeperResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ZonekeeperError::internal(format!("Failed to hash password: {}", e), COMPONENT))
}

/// Verify a password against a stored hash.
///
/// A malformed stored hash verifies as false rather than erroring; the login
/// path must not reveal which check failed.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("hunter2-hunter2").unwrap();
        assert!(verify_password("hunter2-hunter2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
