use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("../migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[derive(Debug, thiserror::Error)]
pub enum DbSetupError {
    #[error("failed to create database pool: {0}")]
    Pool(#[from] r2d2::PoolError),

    #[error("failed to run database migrations: {0}")]
    Migrations(String),
}

pub fn create_pool(database_url: &str) -> Result<DbPool, DbSetupError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().build(manager)?;

    // Run pending migrations on startup
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbSetupError::Migrations(e.to_string()))?;

    Ok(pool)
}

/// Check out a pooled connection or return a 500 from the enclosing handler.
#[macro_export]
macro_rules! get_conn {
    ($pool:expr) => {
        match $pool.get() {
            Ok(c) => c,
            Err(e) => {
                tracing::error!("Failed to get DB connection: {}", e);
                return $crate::api::error_response(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Database connection failed",
                );
            }
        }
    };
}

/// Filter expression matching recipes that are not soft-deleted by any of
/// the three markers.
#[macro_export]
macro_rules! recipe_is_active {
    () => {
        $crate::schema::recipes::is_deleted
            .eq(false)
            .and($crate::schema::recipes::status.ne("deleted"))
            .and($crate::schema::recipes::deleted_at.is_null())
    };
}
