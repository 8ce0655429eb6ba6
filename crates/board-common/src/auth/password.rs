//! Password hashing and verification utilities
//!
//! Uses Argon2id for password hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Special characters a password may (and must) contain
pub const PASSWORD_SPECIAL_CHARS: &str = "@$!%*#?&";

const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 30;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if the stored hash is malformed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Password service for dependency injection
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a password
    ///
    /// # Errors
    /// Returns an error if hashing fails
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password)
    }

    /// Verify a password and return an error if invalid
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

/// Validate password strength
///
/// A password must be 8 to 30 characters drawn from ASCII letters, digits and
/// [`PASSWORD_SPECIAL_CHARS`], with at least one of each of: lowercase,
/// uppercase, digit, special.
///
/// # Errors
/// Returns a validation error describing the first rule broken
pub fn validate_password_strength(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(AppError::Validation(format!(
            "Password must be {PASSWORD_MIN_LEN} to {PASSWORD_MAX_LEN} characters long"
        )));
    }

    let is_special = |c: char| PASSWORD_SPECIAL_CHARS.contains(c);

    if let Some(c) = password
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !is_special(*c))
    {
        return Err(AppError::Validation(format!(
            "Password contains a disallowed character: {c:?}"
        )));
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one lowercase letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "Password must contain at least one uppercase letter".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "Password must contain at least one digit".to_string(),
        ));
    }

    if !password.chars().any(is_special) {
        return Err(AppError::Validation(format!(
            "Password must contain at least one of {PASSWORD_SPECIAL_CHARS}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_message(password: &str) -> String {
        match validate_password_strength(password) {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let password = "Secure#Pass123";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2"));
        assert_ne!(hash, hash_password(password).unwrap());
        assert!(verify_password(password, &hash).unwrap());
        assert!(!verify_password("Wrong#Pass123", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-hash"),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn test_verify_or_error() {
        let service = PasswordService::new();
        let hash = service.hash("Secure#Pass123").unwrap();

        assert!(service.verify_or_error("Secure#Pass123", &hash).is_ok());
        assert!(matches!(
            service.verify_or_error("wrong", &hash),
            Err(AppError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_validate_password_strength_valid() {
        assert!(validate_password_strength("Abcdefg1!").is_ok());
        assert!(validate_password_strength("MyP@ssw0rd").is_ok());
    }

    #[test]
    fn test_validate_password_strength_length() {
        assert!(validation_message("Ab1!").contains("8 to 30"));
        assert!(validation_message(&format!("Ab1!{}", "a".repeat(27))).contains("8 to 30"));
    }

    #[test]
    fn test_validate_password_strength_missing_classes() {
        assert!(validation_message("ABCDEFG1!").contains("lowercase"));
        assert!(validation_message("abcdefg1!").contains("uppercase"));
        assert!(validation_message("Abcdefgh!").contains("digit"));
        assert!(validation_message("Abcdefg12").contains("@$!%*#?&"));
    }

    #[test]
    fn test_validate_password_strength_disallowed_char() {
        assert!(validation_message("Abcdefg1! ").contains("disallowed"));
    }
}
