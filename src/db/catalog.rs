//! System catalog existence checks.
//!
//! Queries the server's system catalog to determine whether the target
//! database already exists. The lookup uses a bound parameter; the database
//! name is never interpolated into the query text.

use crate::db::pool::DbPool;
use crate::error::{InstallError, InstallResult};
use tracing::debug;

mod queries {
    pub mod postgres {
        pub const DATABASE_EXISTS: &str = "SELECT 1 FROM pg_database WHERE datname = $1";
    }

    pub mod mysql {
        pub const DATABASE_EXISTS: &str =
            "SELECT 1 FROM information_schema.SCHEMATA WHERE SCHEMA_NAME = ?";
    }
}

/// Check whether a database with the given name exists on the server.
///
/// Connection and query failures are returned as errors, not conflated with
/// "does not exist".
pub async fn database_exists(pool: &DbPool, name: &str) -> InstallResult<bool> {
    debug!(database = name, "querying system catalog");

    match pool {
        DbPool::Postgres(p) => {
            let row = sqlx::query_scalar::<_, i32>(queries::postgres::DATABASE_EXISTS)
                .bind(name)
                .fetch_optional(p)
                .await?;
            Ok(row.is_some())
        }
        DbPool::MySql(p) => {
            let row = sqlx::query_scalar::<_, i64>(queries::mysql::DATABASE_EXISTS)
                .bind(name)
                .fetch_optional(p)
                .await?;
            Ok(row.is_some())
        }
        DbPool::SQLite(_) => Err(InstallError::internal(
            "SQLite databases are file-based; existence is checked on the filesystem",
        )),
    }
}
