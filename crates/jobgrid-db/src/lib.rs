//! Jobgrid Database — SurrealDB connection management, schema
//! migrations, and repository implementations for the three record
//! kinds the auth core consumes (companies, candidates, and
//! password-reset records).

mod connection;
mod error;
mod schema;

pub mod repository;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
