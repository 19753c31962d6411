//! Database Bootstrap Installer Library
//!
//! This library checks whether a target database exists and, if not, creates a
//! login, creates the database, and applies a schema script with placeholder
//! token substitution (SQLite, PostgreSQL, MySQL).

pub mod config;
pub mod db;
pub mod error;
pub mod installer;
pub mod script;

pub use config::{Config, InstallPlan};
pub use error::InstallError;
pub use installer::InstallOutcome;
