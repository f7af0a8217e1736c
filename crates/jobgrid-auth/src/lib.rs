//! Jobgrid Auth — credential codec, session JWT issuance/validation,
//! and the password-reset token lifecycle.

pub mod config;
pub mod error;
pub mod password;
pub mod reset;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use reset::{IssuedReset, PasswordResetService, ResetClaims};
pub use service::{AuthOutput, AuthService, RegisterCandidateInput, RegisterCompanyInput};
pub use token::SessionClaims;
