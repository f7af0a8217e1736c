//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! Record keys are 24-character hex object ids stored as strings.
//! Enums are stored as strings with ASSERT constraints.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Companies
-- =======================================================================
DEFINE TABLE company SCHEMAFULL;
DEFINE FIELD name ON TABLE company TYPE string;
DEFINE FIELD legal_name ON TABLE company TYPE string;
DEFINE FIELD tax_id ON TABLE company TYPE string;
DEFINE FIELD email ON TABLE company TYPE string;
DEFINE FIELD password_hash ON TABLE company TYPE string;
DEFINE FIELD phone ON TABLE company TYPE string;
DEFINE FIELD website ON TABLE company TYPE option<string>;
DEFINE FIELD location ON TABLE company TYPE string;
DEFINE FIELD sector ON TABLE company TYPE option<string>;
DEFINE FIELD created_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE company TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_company_email ON TABLE company COLUMNS email UNIQUE;
DEFINE INDEX idx_company_tax_id ON TABLE company COLUMNS tax_id UNIQUE;

-- =======================================================================
-- Candidates
-- =======================================================================
DEFINE TABLE candidate SCHEMAFULL;
DEFINE FIELD name ON TABLE candidate TYPE string;
DEFINE FIELD email ON TABLE candidate TYPE string;
DEFINE FIELD password_hash ON TABLE candidate TYPE string;
DEFINE FIELD phone ON TABLE candidate TYPE string;
DEFINE FIELD location ON TABLE candidate TYPE string;
DEFINE FIELD resume ON TABLE candidate TYPE option<string>;
DEFINE FIELD skills ON TABLE candidate TYPE array<string> DEFAULT [];
DEFINE FIELD linkedin ON TABLE candidate TYPE option<string>;
DEFINE FIELD github ON TABLE candidate TYPE option<string>;
DEFINE FIELD created_at ON TABLE candidate TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE candidate TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_candidate_email ON TABLE candidate COLUMNS email UNIQUE;

-- =======================================================================
-- Password-reset records
-- =======================================================================
DEFINE TABLE password_reset SCHEMAFULL;
DEFINE FIELD email ON TABLE password_reset TYPE string;
DEFINE FIELD kind ON TABLE password_reset TYPE string \
    ASSERT $value IN ['company', 'candidate'];
DEFINE FIELD token ON TABLE password_reset TYPE string;
DEFINE FIELD token_hash ON TABLE password_reset TYPE string;
DEFINE FIELD used ON TABLE password_reset TYPE bool DEFAULT false;
DEFINE FIELD created_at ON TABLE password_reset TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD expires_at ON TABLE password_reset TYPE datetime;
DEFINE FIELD used_at ON TABLE password_reset TYPE option<datetime>;
DEFINE INDEX idx_password_reset_token_hash ON TABLE password_reset \
    COLUMNS token_hash;
DEFINE INDEX idx_password_reset_subject ON TABLE password_reset \
    COLUMNS email, kind;
";

/// Apply all pending migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
///
/// Exposed for testing with in-memory SurrealDB instances that
/// bypass the migration runner.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
