//! JSON request and response bodies.
//!
//! Field names follow the public camelCase contract. Dates are `YYYY-MM-DD` and timestamps
//! RFC 3339 UTC with microseconds.

use dtr_core::{DiagnosticTest, ValidationErrors};
use dtr_uuid::format_timestamp;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<i64>,
}

/// Body accepted by `POST /api/tests` and `PUT /api/tests/{id}`.
///
/// Handlers validate the raw JSON against the schema in `dtr-core`; this type documents the
/// expected shape in the OpenAPI document.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestFieldsReq {
    /// At least 2 characters.
    #[schema(example = "Jane Doe", min_length = 2)]
    pub patient_name: String,
    /// At least 2 characters.
    #[schema(example = "Blood Panel", min_length = 2)]
    pub test_type: String,
    #[schema(example = "Normal")]
    pub result: String,
    /// `YYYY-MM-DD` or an RFC 3339 date-time.
    #[schema(example = "2024-01-15")]
    pub test_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A stored diagnostic test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticTestRes {
    #[schema(example = "550e8400e29b41d4a716446655440000")]
    pub id: String,
    pub patient_name: String,
    pub test_type: String,
    pub result: String,
    #[schema(example = "2024-01-15")]
    pub test_date: String,
    pub notes: Option<String>,
    #[schema(example = "2024-01-15T09:30:00.000000Z")]
    pub created_at: String,
    #[schema(example = "2024-01-15T09:30:00.000000Z")]
    pub updated_at: String,
}

impl From<DiagnosticTest> for DiagnosticTestRes {
    fn from(record: DiagnosticTest) -> Self {
        Self {
            id: record.id.to_string(),
            patient_name: record.patient_name,
            test_type: record.test_type,
            result: record.result,
            test_date: record.test_date.format("%Y-%m-%d").to_string(),
            notes: record.notes,
            created_at: format_timestamp(&record.created_at),
            updated_at: format_timestamp(&record.updated_at),
        }
    }
}

/// Confirmation body, e.g. after a delete.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MessageRes {
    pub message: String,
}

/// One broken validation rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IssueRes {
    #[schema(example = "patientName")]
    pub field: String,
    #[schema(example = "Patient name must be at least 2 characters.")]
    pub message: String,
}

/// Error body returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    #[schema(example = "Diagnostic test not found")]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<IssueRes>>,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            issues: None,
        }
    }
}

impl From<&ValidationErrors> for ErrorRes {
    fn from(errors: &ValidationErrors) -> Self {
        Self {
            error: errors.to_string(),
            issues: Some(
                errors
                    .issues()
                    .iter()
                    .map(|issue| IssueRes {
                        field: issue.field.to_string(),
                        message: issue.reason.clone(),
                    })
                    .collect(),
            ),
        }
    }
}
