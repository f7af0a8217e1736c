//! SurrealDB implementation of [`PasswordResetRepository`].

use chrono::{DateTime, Utc};
use jobgrid_core::error::JobgridResult;
use jobgrid_core::id::ObjectId;
use jobgrid_core::models::password_reset::{CreatePasswordReset, PasswordReset};
use jobgrid_core::models::subject::SubjectKind;
use jobgrid_core::repository::PasswordResetRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// DB-side row struct for queries where the record id is already known.
#[derive(Debug, SurrealValue)]
struct ResetRow {
    email: String,
    kind: String,
    token: String,
    token_hash: String,
    used: bool,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct ResetRowWithId {
    record_id: String,
    email: String,
    kind: String,
    token: String,
    token_hash: String,
    used: bool,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    used_at: Option<DateTime<Utc>>,
}

fn parse_kind(s: &str) -> Result<SubjectKind, DbError> {
    match s {
        "company" => Ok(SubjectKind::Company),
        "candidate" => Ok(SubjectKind::Candidate),
        other => Err(DbError::Decode(format!("unknown subject kind: {other}"))),
    }
}

impl ResetRow {
    fn into_reset(self, id: ObjectId) -> Result<PasswordReset, DbError> {
        Ok(PasswordReset {
            id,
            email: self.email,
            kind: parse_kind(&self.kind)?,
            token: self.token,
            token_hash: self.token_hash,
            used: self.used,
            created_at: self.created_at,
            expires_at: self.expires_at,
            used_at: self.used_at,
        })
    }
}

impl ResetRowWithId {
    fn try_into_reset(self) -> Result<PasswordReset, DbError> {
        let id = ObjectId::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid reset id: {e}")))?;
        Ok(PasswordReset {
            id,
            email: self.email,
            kind: parse_kind(&self.kind)?,
            token: self.token,
            token_hash: self.token_hash,
            used: self.used,
            created_at: self.created_at,
            expires_at: self.expires_at,
            used_at: self.used_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the password-reset repository.
#[derive(Clone)]
pub struct SurrealPasswordResetRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPasswordResetRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PasswordResetRepository for SurrealPasswordResetRepository<C> {
    async fn create(&self, input: CreatePasswordReset) -> JobgridResult<PasswordReset> {
        let id = ObjectId::new();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('password_reset', $id) SET \
                 email = $email, \
                 kind = $kind, \
                 token = $token, \
                 token_hash = $token_hash, \
                 used = false, \
                 expires_at = $expires_at, \
                 used_at = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("email", input.email))
            .bind(("kind", input.kind.as_str().to_string()))
            .bind(("token", input.token))
            .bind(("token_hash", input.token_hash))
            .bind(("expires_at", input.expires_at))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<ResetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password_reset".into(),
            id: id_str,
        })?;

        Ok(row.into_reset(id)?)
    }

    async fn get_active_by_token_hash(&self, token_hash: &str) -> JobgridResult<PasswordReset> {
        let token_hash_owned = token_hash.to_string();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM password_reset \
                 WHERE token_hash = $token_hash AND used = false \
                 AND expires_at > time::now()",
            )
            .bind(("token_hash", token_hash_owned.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResetRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password_reset".into(),
            id: format!("token_hash={token_hash_owned}"),
        })?;

        Ok(row.try_into_reset()?)
    }

    async fn consume(&self, token_hash: &str) -> JobgridResult<PasswordReset> {
        let active = self.get_active_by_token_hash(token_hash).await?;
        let id_str = active.id.to_string();

        // The `used = false` condition is re-checked by the store at
        // update time, so a concurrent redemption that got here first
        // leaves nothing to update and this attempt fails.
        let mut result = self
            .db
            .query(
                "UPDATE type::record('password_reset', $id) SET \
                 used = true, used_at = time::now() \
                 WHERE used = false AND expires_at > time::now()",
            )
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<ResetRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "password_reset".into(),
            id: id_str,
        })?;

        Ok(row.into_reset(active.id)?)
    }

    async fn invalidate_all_for_subject(
        &self,
        email: &str,
        kind: SubjectKind,
    ) -> JobgridResult<u64> {
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM password_reset \
                 WHERE email = $email AND kind = $kind AND used = false \
                 GROUP ALL",
            )
            .bind(("email", email.to_string()))
            .bind(("kind", kind.as_str().to_string()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query(
                "UPDATE password_reset SET used = true, used_at = time::now() \
                 WHERE email = $email AND kind = $kind AND used = false",
            )
            .bind(("email", email.to_string()))
            .bind(("kind", kind.as_str().to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }

    async fn delete_expired(&self) -> JobgridResult<u64> {
        // Count expired records first, then delete.
        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM password_reset \
                 WHERE expires_at < time::now() GROUP ALL",
            )
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE password_reset WHERE expires_at < time::now()")
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
