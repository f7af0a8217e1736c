//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    jobgrid_db::run_migrations(&db).await.unwrap();

    // Verify that the tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("company"), "missing company table");
    assert!(info_str.contains("candidate"), "missing candidate table");
    assert!(
        info_str.contains("password_reset"),
        "missing password_reset table"
    );
}

#[tokio::test]
async fn rerunning_migrations_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    jobgrid_db::run_migrations(&db).await.unwrap();
    jobgrid_db::run_migrations(&db).await.unwrap();

    // Exactly one migration record per version.
    let mut result = db.query("SELECT count() AS total FROM _migration GROUP ALL").await.unwrap();
    let rows: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn schema_v1_defines_all_tables() {
    let ddl = jobgrid_db::schema_v1();
    assert!(ddl.contains("DEFINE TABLE company"));
    assert!(ddl.contains("DEFINE TABLE candidate"));
    assert!(ddl.contains("DEFINE TABLE password_reset"));
}
