//! SurrealDB implementation of [`CandidateRepository`].

use chrono::{DateTime, Utc};
use jobgrid_core::error::JobgridResult;
use jobgrid_core::id::ObjectId;
use jobgrid_core::models::candidate::{Candidate, CreateCandidate, UpdateCandidate};
use jobgrid_core::repository::CandidateRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// DB-side row struct for queries where the record id is already known.
#[derive(Debug, SurrealValue)]
struct CandidateRow {
    name: String,
    email: String,
    password_hash: String,
    phone: String,
    location: String,
    resume: Option<String>,
    skills: Vec<String>,
    linkedin: Option<String>,
    github: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CandidateRowWithId {
    record_id: String,
    name: String,
    email: String,
    password_hash: String,
    phone: String,
    location: String,
    resume: Option<String>,
    skills: Vec<String>,
    linkedin: Option<String>,
    github: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CandidateRow {
    fn into_candidate(self, id: ObjectId) -> Candidate {
        Candidate {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            location: self.location,
            resume: self.resume,
            skills: self.skills,
            linkedin: self.linkedin,
            github: self.github,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl CandidateRowWithId {
    fn try_into_candidate(self) -> Result<Candidate, DbError> {
        let id = ObjectId::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid candidate id: {e}")))?;
        Ok(Candidate {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            location: self.location,
            resume: self.resume,
            skills: self.skills,
            linkedin: self.linkedin,
            github: self.github,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Candidate repository.
#[derive(Clone)]
pub struct SurrealCandidateRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCandidateRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CandidateRepository for SurrealCandidateRepository<C> {
    async fn create(&self, input: CreateCandidate) -> JobgridResult<Candidate> {
        let id = ObjectId::new();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('candidate', $id) SET \
                 name = $name, \
                 email = $email, \
                 password_hash = $password_hash, \
                 phone = $phone, \
                 location = $location, \
                 resume = NONE, \
                 skills = [], \
                 linkedin = NONE, \
                 github = NONE",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .bind(("phone", input.phone))
            .bind(("location", input.location))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<CandidateRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "candidate".into(),
            id: id_str,
        })?;

        Ok(row.into_candidate(id))
    }

    async fn get_by_id(&self, id: &ObjectId) -> JobgridResult<Candidate> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('candidate', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CandidateRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "candidate".into(),
            id: id_str,
        })?;

        Ok(row.into_candidate(id.clone()))
    }

    async fn get_by_email(&self, email: &str) -> JobgridResult<Candidate> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM candidate \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CandidateRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "candidate".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_candidate()?)
    }

    async fn count_by_email(&self, email: &str) -> JobgridResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM candidate \
                 WHERE email = $email GROUP ALL",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn update(&self, id: &ObjectId, input: UpdateCandidate) -> JobgridResult<Candidate> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.resume.is_some() {
            sets.push("resume = $resume");
        }
        if input.skills.is_some() {
            sets.push("skills = $skills");
        }
        if input.linkedin.is_some() {
            sets.push("linkedin = $linkedin");
        }
        if input.github.is_some() {
            sets.push("github = $github");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('candidate', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(resume) = input.resume {
            builder = builder.bind(("resume", resume));
        }
        if let Some(skills) = input.skills {
            builder = builder.bind(("skills", skills));
        }
        if let Some(linkedin) = input.linkedin {
            builder = builder.bind(("linkedin", linkedin));
        }
        if let Some(github) = input.github {
            builder = builder.bind(("github", github));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<CandidateRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "candidate".into(),
            id: id_str,
        })?;

        Ok(row.into_candidate(id.clone()))
    }

    async fn update_password(&self, id: &ObjectId, password_hash: &str) -> JobgridResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('candidate', $id) SET \
                 password_hash = $password_hash, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("password_hash", password_hash.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CandidateRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "candidate".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> JobgridResult<()> {
        self.db
            .query("DELETE type::record('candidate', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
