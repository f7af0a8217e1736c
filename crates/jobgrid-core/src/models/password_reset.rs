//! Password-reset record domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;
use crate::models::subject::SubjectKind;

/// A persisted password-reset record.
///
/// Correlates a reset token's lookup hash to its used/expiry status.
/// Marked used at most once — on successful completion or when a newer
/// reset supersedes it — and removed only by expiry-based cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordReset {
    pub id: ObjectId,
    /// Normalized email of the account being reset.
    pub email: String,
    pub kind: SubjectKind,
    /// The signed reset token.
    pub token: String,
    /// SHA-256 hex of the delivered token; the lookup/invalidation key.
    /// The plaintext delivered token is never stored.
    pub token_hash: String,
    pub used: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePasswordReset {
    pub email: String,
    pub kind: SubjectKind,
    pub token: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}
