//! Record identifier and timestamp utilities.
//!
//! Diagnostic test records are keyed by a *canonical* UUID representation: **32 lowercase
//! hexadecimal characters** (no hyphens). Identifiers are allocated by the store, never by
//! clients, so anything arriving from outside (a URL path segment, a CLI argument) must be
//! checked with [`RecordId::parse`] before it is trusted.
//!
//! ## Canonical UUID form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the same value you would get from `Uuid::new_v4().simple().to_string()`.
//!
//! The crate also provides [`next_timestamp`], used to stamp `updatedAt` so that every
//! mutation moves a record's clock strictly forward.

mod record_id;
mod timestamp;

// Re-export public types
pub use record_id::RecordId;
pub use timestamp::{format_timestamp, next_timestamp, parse_timestamp};

/// Error type for identifier and timestamp operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier and timestamp operations.
pub type UuidResult<T> = Result<T, UuidError>;
