//! Embedded schema migrations.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use super::pool::PoolError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration over a fresh synchronous connection.
///
/// Blocks the calling thread; run it before the server starts or inside
/// `spawn_blocking`.
///
/// # Errors
///
/// `PoolError::Build` when the connection cannot be opened or a migration
/// fails.
pub fn run_pending_migrations(database_url: &str) -> Result<usize, PoolError> {
    let mut conn = PgConnection::establish(database_url)
        .map_err(|err| PoolError::build(format!("connect for migrations: {err}")))?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| PoolError::build(format!("apply migrations: {err}")))?;
    for version in &applied {
        info!(%version, "migration applied");
    }
    Ok(applied.len())
}
