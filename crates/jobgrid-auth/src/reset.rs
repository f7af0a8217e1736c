//! Password-reset token lifecycle: token generation/validation and the
//! reset orchestration service.
//!
//! Two artifacts exist per reset: the *delivered* token (random bytes
//! handed to the account holder out of band) and the *signed* token
//! (the JWT that round-trips through validation). Only a SHA-256
//! digest of the delivered token ever reaches the store.

use chrono::{DateTime, Duration, Utc};
use jobgrid_core::error::{JobgridError, JobgridResult};
use jobgrid_core::models::password_reset::CreatePasswordReset;
use jobgrid_core::models::subject::SubjectKind;
use jobgrid_core::repository::{CandidateRepository, CompanyRepository, PasswordResetRepository};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password::{hash_password, normalize_email, validate_password_strength};
use crate::token;

/// Claims embedded in every reset token. Flat JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetClaims {
    /// Normalized email of the account being reset.
    pub email: String,
    /// Account kind.
    pub kind: SubjectKind,
    /// SHA-256 hex of the delivered token; the store lookup key.
    pub token_hash: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
    pub iss: String,
}

/// Artifacts of a successful reset issuance.
#[derive(Debug)]
pub struct IssuedReset {
    /// The JWT that comes back through [`validate_reset_token`].
    pub signed_token: String,
    /// Goes to the account holder out of band; never persisted.
    pub delivered_token: String,
    /// SHA-256 hex of `delivered_token`.
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

/// SHA-256 hash of a delivered reset token, hex-encoded.
///
/// This is the value stored as `password_reset.token_hash`.
pub fn hash_delivered_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate the reset token pair for an account.
///
/// The delivered token is 32 cryptographically random bytes, hex
/// encoded. The signed token embeds the normalized email, the kind,
/// and the delivered token's hash, under the reset issuer tag with the
/// configured (15-minute) expiry.
pub fn generate_reset_token(
    email: &str,
    kind: SubjectKind,
    config: &AuthConfig,
) -> Result<IssuedReset, AuthError> {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rand::Rng::random(&mut rng);
    let delivered_token = hex::encode(bytes);
    let token_hash = hash_delivered_token(&delivered_token);

    let now = Utc::now();
    let expires_at = now + Duration::seconds(config.reset_token_lifetime_secs as i64);
    let claims = ResetClaims {
        email: normalize_email(email),
        kind,
        token_hash: token_hash.clone(),
        iat: now.timestamp(),
        nbf: now.timestamp(),
        exp: expires_at.timestamp(),
        iss: config.reset_issuer.clone(),
    };

    let signed_token = token::sign(&claims, config)?;
    Ok(IssuedReset {
        signed_token,
        delivered_token,
        token_hash,
        expires_at,
    })
}

/// Decode and verify a reset token.
///
/// Same size and algorithm checks as session validation, but the
/// issuer must be the reset tag — a session token presented here
/// fails, and a reset token presented to the session validator fails
/// the same way. Expiry is re-checked explicitly on top of standard
/// claim validation.
pub fn validate_reset_token(token: &str, config: &AuthConfig) -> Result<ResetClaims, AuthError> {
    let claims: ResetClaims = token::decode_claims(token, &config.reset_issuer, config)?;

    if claims.exp <= Utc::now().timestamp() {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

/// Password-reset orchestration.
///
/// Generic over repository implementations so that the reset flow has
/// no dependency on the database crate.
pub struct PasswordResetService<C, A, R>
where
    C: CompanyRepository,
    A: CandidateRepository,
    R: PasswordResetRepository,
{
    company_repo: C,
    candidate_repo: A,
    reset_repo: R,
    config: AuthConfig,
}

impl<C, A, R> PasswordResetService<C, A, R>
where
    C: CompanyRepository,
    A: CandidateRepository,
    R: PasswordResetRepository,
{
    pub fn new(company_repo: C, candidate_repo: A, reset_repo: R, config: AuthConfig) -> Self {
        Self {
            company_repo,
            candidate_repo,
            reset_repo,
            config,
        }
    }

    /// Request a password reset for an account.
    ///
    /// The outcome shape is identical whether or not the account
    /// exists: `Ok(None)`, and callers must present the same response
    /// either way. `Ok(Some(..))` carries the artifacts for
    /// out-of-band delivery. Failures during issuance are logged and
    /// swallowed so they are indistinguishable from the
    /// account-missing case.
    pub async fn request_reset(
        &self,
        email: &str,
        kind: SubjectKind,
    ) -> JobgridResult<Option<IssuedReset>> {
        let email = normalize_email(email);

        let exists = match kind {
            SubjectKind::Company => self.company_repo.get_by_email(&email).await.is_ok(),
            SubjectKind::Candidate => self.candidate_repo.get_by_email(&email).await.is_ok(),
        };
        if !exists {
            return Ok(None);
        }

        let issued = match generate_reset_token(&email, kind, &self.config) {
            Ok(issued) => issued,
            Err(e) => {
                warn!(error = %e, "reset token generation failed");
                return Ok(None);
            }
        };

        let record = CreatePasswordReset {
            email,
            kind,
            token: issued.signed_token.clone(),
            token_hash: issued.token_hash.clone(),
            expires_at: issued.expires_at,
        };
        if let Err(e) = self.reset_repo.create(record).await {
            warn!(error = %e, "failed to persist reset record");
            return Ok(None);
        }

        Ok(Some(issued))
    }

    /// Complete a reset: change the password and consume the record.
    ///
    /// The record is consumed through a conditional update at the
    /// store, independent of the signed token's own expiry, so a
    /// second redemption of the same token fails even while the JWT is
    /// still valid. Every other outstanding unused record for the
    /// identity is invalidated afterwards.
    pub async fn complete_reset(
        &self,
        signed_token: &str,
        new_password: &str,
    ) -> JobgridResult<()> {
        validate_password_strength(new_password)?;

        let claims = validate_reset_token(signed_token, &self.config)?;

        // Storage-level re-check: the record must still be unused and
        // unexpired regardless of what the claims say.
        let record = self
            .reset_repo
            .consume(&claims.token_hash)
            .await
            .map_err(|e| match e {
                JobgridError::NotFound { .. } => JobgridError::AuthenticationFailed {
                    reason: "invalid or expired token".into(),
                },
                other => other,
            })?;

        let password_hash = hash_password(new_password)?;

        match claims.kind {
            SubjectKind::Company => {
                let company = self.company_repo.get_by_email(&claims.email).await?;
                self.company_repo
                    .update_password(&company.id, &password_hash)
                    .await?;
            }
            SubjectKind::Candidate => {
                let candidate = self.candidate_repo.get_by_email(&claims.email).await?;
                self.candidate_repo
                    .update_password(&candidate.id, &password_hash)
                    .await?;
            }
        }

        self.reset_repo
            .invalidate_all_for_subject(&record.email, record.kind)
            .await?;

        Ok(())
    }

    /// Remove expired reset records. Returns how many were deleted.
    pub async fn purge_expired(&self) -> JobgridResult<u64> {
        self.reset_repo.delete_expired().await
    }
}
