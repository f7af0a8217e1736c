//! Authentication error types.

use jobgrid_core::error::JobgridError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("signing secret must be at least {min} bytes")]
    SecretTooShort { min: usize },

    #[error("token has expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("{0}")]
    WeakPassword(String),

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for JobgridError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => JobgridError::AuthenticationFailed {
                reason: "invalid credentials".into(),
            },
            // Which validation step rejected the token is intentionally
            // not visible past this boundary.
            AuthError::TokenExpired | AuthError::TokenInvalid(_) => {
                JobgridError::AuthenticationFailed {
                    reason: "invalid or expired token".into(),
                }
            }
            AuthError::SecretTooShort { min } => JobgridError::Configuration(format!(
                "signing secret must be at least {min} bytes"
            )),
            AuthError::WeakPassword(message) => JobgridError::Validation { message },
            AuthError::Crypto(msg) => JobgridError::Crypto(msg),
        }
    }
}
