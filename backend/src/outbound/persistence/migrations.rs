//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::domain::ports::UserPersistenceError;

/// Migrations compiled in from `backend/migrations`.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// Uses a synchronous connection; call it from a blocking context such as
/// `tokio::task::spawn_blocking`.
///
/// # Errors
///
/// Returns a connection error when the database is unreachable and a query
/// error when a migration fails.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, UserPersistenceError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| UserPersistenceError::connection(err.to_string()))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| UserPersistenceError::query(format!("migration: {err}")))?;
    Ok(applied.len())
}
