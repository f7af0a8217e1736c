//! Candidate account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: ObjectId,
    pub name: String,
    /// Normalized (trimmed, lowercased) before storage.
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub location: String,
    pub resume: Option<String>,
    pub skills: Vec<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCandidate {
    pub name: String,
    pub email: String,
    /// Already hashed by the credential codec; never the raw password.
    pub password_hash: String,
    pub phone: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCandidate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub resume: Option<String>,
    pub skills: Option<Vec<String>>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
}
