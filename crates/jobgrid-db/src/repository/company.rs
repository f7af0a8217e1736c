//! SurrealDB implementation of [`CompanyRepository`].

use chrono::{DateTime, Utc};
use jobgrid_core::error::JobgridResult;
use jobgrid_core::id::ObjectId;
use jobgrid_core::models::company::{Company, CreateCompany, UpdateCompany};
use jobgrid_core::repository::CompanyRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;

use crate::error::DbError;

/// DB-side row struct for queries where the record id is already known.
#[derive(Debug, SurrealValue)]
struct CompanyRow {
    name: String,
    legal_name: String,
    tax_id: String,
    email: String,
    password_hash: String,
    phone: String,
    website: Option<String>,
    location: String,
    sector: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CompanyRowWithId {
    record_id: String,
    name: String,
    legal_name: String,
    tax_id: String,
    email: String,
    password_hash: String,
    phone: String,
    website: Option<String>,
    location: String,
    sector: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompanyRow {
    fn into_company(self, id: ObjectId) -> Company {
        Company {
            id,
            name: self.name,
            legal_name: self.legal_name,
            tax_id: self.tax_id,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            website: self.website,
            location: self.location,
            sector: self.sector,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl CompanyRowWithId {
    fn try_into_company(self) -> Result<Company, DbError> {
        let id = ObjectId::parse_str(&self.record_id)
            .map_err(|e| DbError::Decode(format!("invalid company id: {e}")))?;
        Ok(Company {
            id,
            name: self.name,
            legal_name: self.legal_name,
            tax_id: self.tax_id,
            email: self.email,
            password_hash: self.password_hash,
            phone: self.phone,
            website: self.website,
            location: self.location,
            sector: self.sector,
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

/// SurrealDB implementation of the Company repository.
#[derive(Clone)]
pub struct SurrealCompanyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealCompanyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> CompanyRepository for SurrealCompanyRepository<C> {
    async fn create(&self, input: CreateCompany) -> JobgridResult<Company> {
        let id = ObjectId::new();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('company', $id) SET \
                 name = $name, \
                 legal_name = $legal_name, \
                 tax_id = $tax_id, \
                 email = $email, \
                 password_hash = $password_hash, \
                 phone = $phone, \
                 website = $website, \
                 location = $location, \
                 sector = $sector",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("legal_name", input.legal_name))
            .bind(("tax_id", input.tax_id))
            .bind(("email", input.email))
            .bind(("password_hash", input.password_hash))
            .bind(("phone", input.phone))
            .bind(("website", input.website))
            .bind(("location", input.location))
            .bind(("sector", input.sector))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            id: id_str,
        })?;

        Ok(row.into_company(id))
    }

    async fn get_by_id(&self, id: &ObjectId) -> JobgridResult<Company> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('company', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            id: id_str,
        })?;

        Ok(row.into_company(id.clone()))
    }

    async fn get_by_email(&self, email: &str) -> JobgridResult<Company> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM company \
                 WHERE email = $email",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            id: format!("email={email}"),
        })?;

        Ok(row.try_into_company()?)
    }

    async fn count_by_email(&self, email: &str) -> JobgridResult<u64> {
        let mut result = self
            .db
            .query(
                "SELECT count() AS total FROM company \
                 WHERE email = $email GROUP ALL",
            )
            .bind(("email", email.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(rows.first().map(|r| r.total).unwrap_or(0))
    }

    async fn update(&self, id: &ObjectId, input: UpdateCompany) -> JobgridResult<Company> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.name.is_some() {
            sets.push("name = $name");
        }
        if input.legal_name.is_some() {
            sets.push("legal_name = $legal_name");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        if input.website.is_some() {
            sets.push("website = $website");
        }
        if input.location.is_some() {
            sets.push("location = $location");
        }
        if input.sector.is_some() {
            sets.push("sector = $sector");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('company', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(name) = input.name {
            builder = builder.bind(("name", name));
        }
        if let Some(legal_name) = input.legal_name {
            builder = builder.bind(("legal_name", legal_name));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }
        if let Some(website) = input.website {
            builder = builder.bind(("website", website));
        }
        if let Some(location) = input.location {
            builder = builder.bind(("location", location));
        }
        if let Some(sector) = input.sector {
            builder = builder.bind(("sector", sector));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Decode(e.to_string()))?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "company".into(),
            id: id_str,
        })?;

        Ok(row.into_company(id.clone()))
    }

    async fn update_password(&self, id: &ObjectId, password_hash: &str) -> JobgridResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query(
                "UPDATE type::record('company', $id) SET \
                 password_hash = $password_hash, updated_at = time::now()",
            )
            .bind(("id", id_str.clone()))
            .bind(("password_hash", password_hash.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CompanyRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "company".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn delete(&self, id: &ObjectId) -> JobgridResult<()> {
        self.db
            .query("DELETE type::record('company', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
