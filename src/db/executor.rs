//! Sequential statement execution.
//!
//! Executes schema script statements one at a time over a single connection,
//! stopping at the first failure. Statements are sent as raw SQL rather than
//! prepared statements - DDL such as `CREATE DATABASE` or `CREATE PROCEDURE`
//! frequently does not support preparation. Earlier statements are not rolled
//! back when a later one fails; partial application is possible.

use crate::db::pool::DbPool;
use crate::error::{InstallError, InstallResult};
use sqlx::Executor;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error};

/// Executes script statements sequentially with a per-statement timeout.
pub struct ScriptExecutor {
    statement_timeout: Duration,
}

impl ScriptExecutor {
    /// Create a new executor with the given per-statement timeout.
    pub fn new(statement_timeout: Duration) -> Self {
        Self { statement_timeout }
    }

    /// Execute every non-blank statement in order, stopping on the first error.
    ///
    /// Returns the number of statements executed.
    pub async fn execute_batches(
        &self,
        pool: &DbPool,
        statements: &[String],
    ) -> InstallResult<usize> {
        let total = statements.len();
        let mut executed = 0usize;

        for (index, statement) in statements.iter().enumerate() {
            let sql = statement.trim();
            if sql.is_empty() {
                continue;
            }

            debug!(statement = index + 1, total, "Executing statement");

            match timeout(self.statement_timeout, raw_execute(pool, sql)).await {
                Ok(Ok(rows_affected)) => {
                    debug!(statement = index + 1, rows_affected, "Statement complete");
                    executed += 1;
                }
                Ok(Err(e)) => {
                    error!(
                        statement = index + 1,
                        total,
                        error = %e,
                        "Statement failed; aborting script"
                    );
                    return Err(e);
                }
                Err(_) => {
                    return Err(InstallError::timeout(
                        format!("statement {}", index + 1),
                        self.statement_timeout.as_secs() as u32,
                    ));
                }
            }
        }

        Ok(executed)
    }
}

async fn raw_execute(pool: &DbPool, sql: &str) -> InstallResult<u64> {
    let result = match pool {
        DbPool::MySql(p) => p.execute(sql).await.map(|r| r.rows_affected()),
        DbPool::Postgres(p) => p.execute(sql).await.map(|r| r.rows_affected()),
        DbPool::SQLite(p) => p.execute(sql).await.map(|r| r.rows_affected()),
    };
    result.map_err(InstallError::from)
}
