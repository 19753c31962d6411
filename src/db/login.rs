//! Login provisioning statement construction.
//!
//! `CREATE ROLE` / `CREATE USER` are DDL and cannot take bound parameters, so
//! inputs are validated against strict identifier rules and quoted per dialect
//! before they appear in statement text. Passwords are escaped as proper
//! single-quoted SQL literals.

use crate::config::{DatabaseType, LoginType};
use crate::error::{InstallError, InstallResult};

/// Maximum identifier length accepted for login names (PostgreSQL's limit).
const MAX_LOGIN_NAME_LEN: usize = 63;

/// Validate a login name against strict identifier rules.
///
/// Accepted: ASCII letters, digits, and underscores; must not start with a
/// digit; bounded length. Everything else is rejected rather than quoted
/// around, which keeps the generated DDL trivially auditable.
pub fn validate_login_name(name: &str) -> InstallResult<()> {
    if name.is_empty() {
        return Err(InstallError::invalid_identifier(name, "must not be empty"));
    }
    if name.len() > MAX_LOGIN_NAME_LEN {
        return Err(InstallError::invalid_identifier(
            name,
            format!("longer than {} characters", MAX_LOGIN_NAME_LEN),
        ));
    }
    let mut chars = name.chars();
    let first = chars.next().unwrap_or('_');
    if !first.is_ascii_alphabetic() && first != '_' {
        return Err(InstallError::invalid_identifier(
            name,
            "must start with a letter or underscore",
        ));
    }
    if let Some(bad) = name.chars().find(|c| !c.is_ascii_alphanumeric() && *c != '_') {
        return Err(InstallError::invalid_identifier(
            name,
            format!("contains disallowed character '{}'", bad),
        ));
    }
    Ok(())
}

/// Escape a value as the body of a single-quoted SQL string literal.
///
/// Embedded quotes are doubled; MySQL additionally treats backslash as an
/// escape character, so it is doubled there too. Control characters are
/// rejected outright.
pub fn escape_literal(db_type: DatabaseType, value: &str) -> InstallResult<String> {
    if value.chars().any(|c| c.is_control()) {
        return Err(InstallError::config(
            "password must not contain control characters",
        ));
    }
    let escaped = match db_type {
        DatabaseType::MySQL => value.replace('\\', "\\\\").replace('\'', "''"),
        _ => value.replace('\'', "''"),
    };
    Ok(escaped)
}

/// Build the login provisioning statement for the given dialect.
///
/// Returns `Ok(None)` when no statement is needed: login provisioning was not
/// requested, or the backend has no login concept (SQLite).
pub fn build_login_sql(
    db_type: DatabaseType,
    login_type: LoginType,
    login_name: &str,
    password: Option<&str>,
) -> InstallResult<Option<String>> {
    if login_type == LoginType::None || db_type == DatabaseType::SQLite {
        return Ok(None);
    }

    validate_login_name(login_name)?;

    let sql = match (db_type, login_type) {
        (DatabaseType::PostgreSQL, LoginType::OsIntegrated) => {
            // Authentication is delegated to the host (peer/ident auth).
            format!("CREATE ROLE \"{}\" LOGIN", login_name)
        }
        (DatabaseType::PostgreSQL, LoginType::Password) => {
            let password = require_password(password)?;
            format!(
                "CREATE ROLE \"{}\" LOGIN PASSWORD '{}'",
                login_name,
                escape_literal(db_type, password)?
            )
        }
        (DatabaseType::MySQL, LoginType::OsIntegrated) => {
            format!("CREATE USER '{}'@'%' IDENTIFIED WITH auth_socket", login_name)
        }
        (DatabaseType::MySQL, LoginType::Password) => {
            let password = require_password(password)?;
            format!(
                "CREATE USER '{}'@'%' IDENTIFIED BY '{}'",
                login_name,
                escape_literal(db_type, password)?
            )
        }
        // LoginType::None and SQLite returned above.
        _ => return Ok(None),
    };

    Ok(Some(sql))
}

fn require_password(password: Option<&str>) -> InstallResult<&str> {
    password.ok_or_else(|| InstallError::config("login_type 'password' requires a password"))
}
