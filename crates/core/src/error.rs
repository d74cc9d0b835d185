use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("diagnostic test not found: {id}")]
    NotFound { id: String },
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("migration failed at version {version}: {reason}")]
    Migration { version: i64, reason: String },
    #[error("database lock poisoned")]
    LockPoisoned,
    #[error("database connection is closed")]
    Closed,
    #[error("corrupt value in column {column}: {value}")]
    CorruptRow { column: &'static str, value: String },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RecordError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

pub type RecordResult<T> = std::result::Result<T, RecordError>;
