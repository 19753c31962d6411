//! Database access layer.
//!
//! This module provides the database-facing half of the installer:
//! - Connection handling (one serially-used connection per phase)
//! - System catalog existence checks
//! - Login provisioning statement construction
//! - Sequential script execution

pub mod catalog;
pub mod executor;
pub mod login;
pub mod pool;

pub use executor::ScriptExecutor;
pub use pool::DbPool;
