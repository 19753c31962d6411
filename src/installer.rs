//! Installation orchestrator.
//!
//! Sequences the phases of a run: existence check, login provisioning, schema
//! script application. Each phase opens its own connection, uses it serially,
//! and closes it before the next phase begins. There are no retries; the first
//! failure aborts the remainder of the run.

use crate::config::{DatabaseType, InstallPlan, LoginType};
use crate::db::catalog;
use crate::db::login::build_login_sql;
use crate::db::{DbPool, ScriptExecutor};
use crate::error::{InstallError, InstallResult};
use crate::script::SchemaScript;
use std::path::Path;
use tracing::{debug, info, warn};

/// Terminal outcome of an installation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The target database already existed; nothing was changed.
    AlreadyInstalled,
    /// The database was created and the schema script applied.
    Installed,
}

impl std::fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyInstalled => write!(f, "already-installed"),
            Self::Installed => write!(f, "installed"),
        }
    }
}

/// Run the installation described by `plan`.
pub async fn run(plan: &InstallPlan) -> InstallResult<InstallOutcome> {
    info!(
        database = %plan.database,
        db_type = %plan.db_type,
        "Checking whether the target database exists"
    );

    if is_installed(plan).await? {
        info!(database = %plan.database, "Database is already installed");
        return Ok(InstallOutcome::AlreadyInstalled);
    }

    info!(database = %plan.database, "Database does not exist; installation starting");

    provision_login(plan).await?;
    apply_schema(plan).await?;

    info!(database = %plan.database, "Installation succeeded");
    Ok(InstallOutcome::Installed)
}

/// Check whether the target database already exists.
///
/// SQLite databases are files; for server databases this connects at server
/// level and consults the system catalog. Errors are propagated, never
/// collapsed into "not installed".
async fn is_installed(plan: &InstallPlan) -> InstallResult<bool> {
    if plan.db_type == DatabaseType::SQLite {
        return Ok(Path::new(&plan.database).exists());
    }

    let pool = DbPool::connect(
        plan.db_type,
        &plan.server_url,
        plan.connect_timeout,
        false,
    )
    .await?;

    if let Some(version) = pool.server_version().await {
        debug!(version = %version, "Connected at server level");
    }

    let exists = catalog::database_exists(&pool, &plan.database).await;
    pool.close().await;
    exists
}

/// Create the requested login, if any.
async fn provision_login(plan: &InstallPlan) -> InstallResult<()> {
    if plan.login_type == LoginType::None {
        debug!("No login provisioning requested");
        return Ok(());
    }

    let login_name = plan
        .login_name
        .as_deref()
        .ok_or_else(|| InstallError::config("login provisioning requires a login_name"))?;

    if plan.db_type == DatabaseType::SQLite {
        warn!(
            login = login_name,
            "SQLite has no server logins; skipping login provisioning"
        );
        return Ok(());
    }

    let Some(sql) = build_login_sql(
        plan.db_type,
        plan.login_type,
        login_name,
        plan.password.as_deref(),
    )?
    else {
        return Ok(());
    };

    info!(login = login_name, login_type = %plan.login_type, "Creating login");

    let pool = DbPool::connect(
        plan.db_type,
        &plan.server_url,
        plan.connect_timeout,
        false,
    )
    .await?;
    let executor = ScriptExecutor::new(plan.statement_timeout);
    let result = executor
        .execute_batches(&pool, std::slice::from_ref(&sql))
        .await;
    pool.close().await;

    result.map(|_| ())
}

/// Load, substitute, split, and execute the schema script.
async fn apply_schema(plan: &InstallPlan) -> InstallResult<()> {
    info!(path = %plan.schema_path.display(), "Applying schema script");

    let script = SchemaScript::from_file(&plan.schema_path)?.substitute(&plan.tokens);
    let statements = script.batches(&plan.batch_separator);

    if statements.is_empty() {
        warn!(
            path = %plan.schema_path.display(),
            "Schema script contains no statements"
        );
        return Ok(());
    }

    let pool = DbPool::connect(plan.db_type, &plan.server_url, plan.connect_timeout, true).await?;
    let executor = ScriptExecutor::new(plan.statement_timeout);
    let result = executor.execute_batches(&pool, &statements).await;
    pool.close().await;

    let executed = result?;
    info!(statements = executed, "Schema script applied");
    Ok(())
}
