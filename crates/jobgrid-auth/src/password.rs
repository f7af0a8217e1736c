//! Credential codec: Argon2id hashing/verification, the password
//! strength policy, and email normalization.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher, PasswordVerifier};

use crate::error::AuthError;

/// Symbols accepted by the strength policy.
const PASSWORD_SYMBOLS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Minimum password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Argon2id with a fixed work factor (m = 19 MiB, t = 2, p = 1).
fn hasher() -> Result<Argon2<'static>, AuthError> {
    let params = argon2::Params::new(19_456, 2, 1, None)
        .map_err(|e| AuthError::Crypto(format!("argon2 params: {e}")))?;
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        params,
    ))
}

/// Hash a plaintext password into a PHC-format Argon2id digest.
///
/// The salt is randomly generated per call. Hashing failures propagate
/// as [`AuthError::Crypto`].
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Crypto(format!("password hash: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored digest.
///
/// Never errors: a malformed digest yields `false`. The underlying
/// verification compares digests in constant time, so the outcome
/// timing does not depend on where a mismatch occurs.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = argon2::PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Check a password against the strength policy.
///
/// Requires at least 8 characters, with an uppercase letter, a
/// lowercase letter, a digit, and a symbol from [`PASSWORD_SYMBOLS`].
/// The failure reason names what is missing as a whole; there is no
/// partial success.
pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(
            "password must be at least 8 characters".into(),
        ));
    }

    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if !has_upper || !has_lower || !has_digit || !has_symbol {
        return Err(AuthError::WeakPassword(
            "password must contain uppercase and lowercase letters, \
             a digit, and a special character"
                .into(),
        ));
    }

    Ok(())
}

/// Normalize an email address before any lookup, hash, or storage.
///
/// Trims whitespace and lowercases, so uniqueness is case-insensitive
/// across both account kinds.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verify_roundtrip() {
        let hash = hash_password("Str0ng!Pass").unwrap();
        assert!(verify_password("Str0ng!Pass", &hash));
    }

    #[test]
    fn wrong_password_does_not_match() {
        let hash = hash_password("Str0ng!Pass").unwrap();
        assert!(!verify_password("Wr0ng!Pass", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Per-hash random salt.
        assert_ne!(
            hash_password("Str0ng!Pass").unwrap(),
            hash_password("Str0ng!Pass").unwrap()
        );
    }

    #[test]
    fn malformed_digest_is_no_match_not_error() {
        assert!(!verify_password("Str0ng!Pass", "not-a-phc-hash"));
        assert!(!verify_password("Str0ng!Pass", ""));
    }

    #[test]
    fn strength_rejects_short_passwords() {
        let err = validate_password_strength("Ab1!").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn strength_requires_all_character_classes() {
        assert!(validate_password_strength("alllower1!").is_err());
        assert!(validate_password_strength("ALLUPPER1!").is_err());
        assert!(validate_password_strength("NoDigits!").is_err());
        assert!(validate_password_strength("NoSymbol1").is_err());
        assert!(validate_password_strength("G00d!Pass").is_ok());
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  Alice@Example.COM  "), "alice@example.com");
        assert_eq!(normalize_email("alice@example.com"), "alice@example.com");
    }
}
