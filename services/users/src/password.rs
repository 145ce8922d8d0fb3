//! How submitted passwords are turned into stored values
//!
//! Passwords are stored as provided unless hashing is explicitly enabled
//! with `USERS_PASSWORD_STORAGE=argon2`.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use serde::Deserialize;

/// Password storage mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStorage {
    /// Store the password exactly as submitted
    #[default]
    Plain,
    /// Store an Argon2 PHC string
    Argon2,
}

impl PasswordStorage {
    /// Produce the value to persist for `password`
    pub fn encode(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        match self {
            PasswordStorage::Plain => Ok(password.to_string()),
            PasswordStorage::Argon2 => {
                let salt = SaltString::generate(&mut rand::thread_rng());
                let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
                Ok(hash.to_string())
            }
        }
    }

    /// Check `candidate` against a value produced by [`Self::encode`]
    pub fn matches(&self, stored: &str, candidate: &str) -> bool {
        match self {
            PasswordStorage::Plain => stored == candidate,
            PasswordStorage::Argon2 => match PasswordHash::new(stored) {
                Ok(parsed) => Argon2::default()
                    .verify_password(candidate.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            },
        }
    }
}
