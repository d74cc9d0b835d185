//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the store and
//! handlers. Request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_DATABASE_PATH;
use crate::{RecordError, RecordResult};
use std::path::{Path, PathBuf};

/// Where the SQLite database lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// A database file on disk.
    File(PathBuf),
    /// A private in-memory database, discarded when the store is closed.
    Memory,
}

impl std::fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
            DatabaseLocation::Memory => f.write_str(":memory:"),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database: DatabaseLocation,
}

impl CoreConfig {
    /// Create a new `CoreConfig` for the given database location.
    pub fn new(database: DatabaseLocation) -> Self {
        Self { database }
    }

    /// Build the configuration from the raw value of `DATABASE_URL`.
    ///
    /// `None` or a blank value falls back to [`DEFAULT_DATABASE_PATH`].
    pub fn from_database_url(value: Option<String>) -> RecordResult<Self> {
        let value = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let database = match value {
            Some(url) => parse_database_url(&url)?,
            None => DatabaseLocation::File(PathBuf::from(DEFAULT_DATABASE_PATH)),
        };

        Ok(Self { database })
    }

    pub fn database(&self) -> &DatabaseLocation {
        &self.database
    }

    /// The on-disk path of the database, if it is file backed.
    pub fn database_path(&self) -> Option<&Path> {
        match &self.database {
            DatabaseLocation::File(path) => Some(path),
            DatabaseLocation::Memory => None,
        }
    }
}

/// Parse a SQLite connection string.
///
/// Accepts `sqlite://<path>`, `sqlite:<path>`, `sqlite::memory:`, `:memory:` or a bare path.
/// Query parameters (`?mode=rwc` and the like) are ignored.
pub fn parse_database_url(url: &str) -> RecordResult<DatabaseLocation> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);

    if url.contains("://") && !url.starts_with("sqlite://") {
        return Err(RecordError::InvalidConfig(format!(
            "DATABASE_URL must be a sqlite connection string, got: '{}'",
            url
        )));
    }

    let rest = rest.split('?').next().unwrap_or_default();

    if rest == ":memory:" {
        return Ok(DatabaseLocation::Memory);
    }
    if rest.is_empty() {
        return Err(RecordError::InvalidConfig(
            "DATABASE_URL does not name a database file".into(),
        ));
    }

    Ok(DatabaseLocation::File(PathBuf::from(rest)))
}
