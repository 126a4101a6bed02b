//! Password value object for back-office accounts.
//!
//! Argon2 hashing lives here and nowhere else.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use subtle::ConstantTimeEq;

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Hash verified against when the username is unknown, so a miss costs
/// about as much as a wrong password.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$2uDnIu6F1Bx4jTgrS3kdjUAhFJ2+6dfiaT2hvMmwTgU";

/// Hashed password of a back-office user.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a new plain text password.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than
    /// [`MIN_PASSWORD_LENGTH`] characters.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;

        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap a hash loaded from the `users` table.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Check a login attempt against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        verify_hash(plain_text, &self.hash)
    }

    /// Burn the same verification cost as a real check. Always false.
    pub fn verify_dummy(plain_text: &str) -> bool {
        let _ = verify_hash(plain_text, DUMMY_HASH);
        false
    }
}

fn verify_hash(plain_text: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Compare a submitted secret with a configured plain-text one.
///
/// Runs in time that depends only on the length of `expected`.
pub fn secret_matches(given: &str, expected: &str) -> bool {
    let given = given.as_bytes();
    let expected = expected.as_bytes();

    let mut same = (given.len() as u64).ct_eq(&(expected.len() as u64));
    for (i, byte) in expected.iter().enumerate() {
        let other = given.get(i).copied().unwrap_or(0);
        same &= other.ct_eq(byte);
    }
    bool::from(same)
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let plain = "Diamonds4Ever!";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("diamonds4ever!"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "GoldRing2024";
        let stored = Password::new(plain).unwrap().into_string();

        let restored = Password::from_hash(stored);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "SamePassword123";
        let first = Password::new(plain).unwrap();
        let second = Password::new(plain).unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify(plain));
        assert!(second.verify(plain));
    }

    #[test]
    fn test_secret_matches() {
        assert!(secret_matches("open-sesame", "open-sesame"));
        assert!(!secret_matches("open-sesamE", "open-sesame"));
        assert!(!secret_matches("open-sesame!", "open-sesame"));
        assert!(!secret_matches("open", "open-sesame"));
        assert!(!secret_matches("", "open-sesame"));
        assert!(secret_matches("", ""));
    }

    #[test]
    fn test_password_too_short() {
        assert!(Password::new("short").is_err());
        assert!(Password::new("12345678").is_ok());
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        let password = Password::from_hash("not-a-hash".to_string());
        assert!(!password.verify("anything"));
        assert!(!Password::verify_dummy("anything"));
    }
}
