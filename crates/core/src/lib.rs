//! # DTR Core
//!
//! Core business logic for the diagnostic test records system.
//!
//! This crate contains pure data operations:
//! - The `DiagnosticTest` entity and its validated input fields
//! - The validation schema applied to every create and update
//! - SQLite persistence with versioned migrations
//! - Startup configuration
//!
//! **No API concerns**: HTTP handlers, pages and response shapes belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod record;
pub mod store;
pub mod validation;

pub use config::{CoreConfig, DatabaseLocation};
pub use constants::*;
pub use error::{RecordError, RecordResult};
pub use record::{DiagnosticTest, TestFields};
pub use store::DiagnosticTestStore;
pub use validation::{parse_test_date, parse_test_fields, ValidationError, ValidationErrors};

pub use dtr_types::{Label, MIN_LABEL_LEN};
pub use dtr_uuid::RecordId;
