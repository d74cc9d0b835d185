//! # API Shared
//!
//! Shared definitions for the diagnostic test records API.
//!
//! Contains:
//! - JSON request/response types with OpenAPI schemas (`types` module)
//! - The `HealthService` used by the `/health` endpoint
//!
//! Used by `api-rest` for handlers and the OpenAPI document.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
