//! Embedded schema migrations.
//!
//! Migrations are compiled into the binary from `migrations/` and applied over
//! a synchronous `PgConnection` on the blocking thread pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::EntityStoreError;

/// Migrations bundled from the crate's `migrations/` directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to `database_url`, returning the names of
/// the migrations that ran.
///
/// # Errors
///
/// `StorageUnavailable` when the database cannot be reached, `Query` when a
/// migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<Vec<String>, EntityStoreError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| EntityStoreError::storage_unavailable(err.to_string()))?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| EntityStoreError::query(format!("migration failed: {err}")))?;

    let names: Vec<String> = applied.iter().map(ToString::to_string).collect();
    info!(count = names.len(), migrations = ?names, "schema migrations applied");
    Ok(names)
}

/// Async wrapper over [`run_pending_migrations`] for callers on a Tokio
/// runtime.
///
/// # Errors
///
/// As [`run_pending_migrations`]; a panicked migration task surfaces as
/// `Query`.
pub async fn migrate(database_url: impl Into<String>) -> Result<Vec<String>, EntityStoreError> {
    let database_url = database_url.into();
    tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(|err| EntityStoreError::query(format!("migration task failed: {err}")))?
}
