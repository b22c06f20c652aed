use argon2::password_hash::{PasswordHash, PasswordVerifier};
use argon2::Argon2;

/// Opaque `compare(plaintext, hash)` capability used by the login flow.
pub trait PasswordComparer: Send + Sync {
    fn compare(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2 PHC-string comparison (`$argon2id$v=19$...`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Comparer;

impl PasswordComparer for Argon2Comparer {
    fn compare(&self, plaintext: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(err) => {
                tracing::warn!(error = %err, "stored password hash is not a valid PHC string");
                return false;
            }
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}
