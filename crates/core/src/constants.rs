//! Constants used throughout the core crate.
//!
//! Keeps table names, defaults and user-facing messages in one place so the API, pages and
//! CLI all agree on them.

/// Database location used when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_PATH: &str = "diagnostic_tests.db";

/// Name of the single entity table.
pub const TESTS_TABLE: &str = "diagnostic_tests";

/// Message returned when a record id does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Diagnostic test not found";

/// Message returned after a successful delete.
pub const DELETED_MESSAGE: &str = "Diagnostic test deleted";

/// Upper bound on notes length enforced by the form (not by the schema).
pub const NOTES_DISPLAY_MAX_LEN: usize = 500;
