//! Authentication configuration.

use crate::error::AuthError;

/// Minimum signing-secret length in bytes. Deployment-time invariant,
/// checked before any request is served.
pub const MIN_SECRET_LEN: usize = 32;

/// Issuer tag stamped into session tokens.
pub const SESSION_ISSUER: &str = "jobgrid-api";

/// Issuer tag stamped into password-reset tokens. Distinct from the
/// session tag so the two token families are mutually unusable.
pub const RESET_ISSUER: &str = "jobgrid-api-reset";

/// Immutable configuration for token issuance and validation.
///
/// Constructed once at process start and shared by reference; there is
/// no late or concurrent re-initialization.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing secret. At least [`MIN_SECRET_LEN`] bytes.
    secret: String,
    /// Session token lifetime in seconds (default: 86_400 = 24 hours).
    pub session_token_lifetime_secs: u64,
    /// Reset token lifetime in seconds (default: 900 = 15 minutes).
    pub reset_token_lifetime_secs: u64,
    /// Session issuer (`iss` claim).
    pub session_issuer: String,
    /// Reset issuer (`iss` claim).
    pub reset_issuer: String,
}

impl AuthConfig {
    /// Build a configuration around the signing secret.
    ///
    /// Fails if the secret is shorter than [`MIN_SECRET_LEN`] bytes;
    /// callers are expected to treat that as fatal at startup.
    pub fn from_secret(secret: impl Into<String>) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::SecretTooShort { min: MIN_SECRET_LEN });
        }
        Ok(Self {
            secret,
            session_token_lifetime_secs: 86_400,
            reset_token_lifetime_secs: 900,
            session_issuer: SESSION_ISSUER.into(),
            reset_issuer: RESET_ISSUER.into(),
        })
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}
