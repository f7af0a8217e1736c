//! Company account domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: ObjectId,
    pub name: String,
    pub legal_name: String,
    pub tax_id: String,
    /// Normalized (trimmed, lowercased) before storage.
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub website: Option<String>,
    pub location: String,
    pub sector: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompany {
    pub name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub email: String,
    /// Already hashed by the credential codec; never the raw password.
    pub password_hash: String,
    pub phone: String,
    pub website: Option<String>,
    pub location: String,
    pub sector: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCompany {
    pub name: Option<String>,
    pub legal_name: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub sector: Option<String>,
}
