/// Password hashing and verification using Argon2id
use crate::error::{AppError, AppResult};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password using Argon2id with a random per-password salt
///
/// Returns a PHC-formatted hash string safe for database storage.
pub fn hash_password(password: &str) -> AppResult<String> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            AppError::Internal
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its hash (constant-time comparison)
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| {
        tracing::error!(error = %e, "stored password hash is not valid PHC");
        AppError::Internal
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => {
            tracing::error!(error = %e, "password verification failed");
            Err(AppError::Internal)
        }
    }
}

/// Spend one argon2 verification on an account that does not exist, so an
/// unknown phone takes as long to reject as a wrong password. Always false
/// in practice.
pub fn verify_against_dummy(password: &str) -> bool {
    match dummy_hash() {
        Some(hash) => verify_password(password, hash).unwrap_or(false),
        None => false,
    }
}

fn dummy_hash() -> Option<&'static str> {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();
    DUMMY_HASH
        .get_or_init(|| {
            let salt = SaltString::generate(&mut OsRng);
            Argon2::default()
                .hash_password(b"no account has this password", &salt)
                .map(|hash| hash.to_string())
                .ok()
        })
        .as_deref()
}

/// Minimum length check, counted in characters
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
