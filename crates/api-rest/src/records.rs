//! Record API: the collection endpoint (`/api/tests`) and the item endpoint
//! (`/api/tests/{id}`).
//!
//! Every handler resolves its single store call before responding. Validation failures and
//! missing ids are 400, unknown ids 404, store faults 500.

use api_shared::{DiagnosticTestRes, ErrorRes, MessageRes, TestFieldsReq};
use axum::{
    extract::{rejection::JsonRejection, Path as AxumPath, State},
    response::Json,
};
use dtr_core::{parse_test_fields, TestFields, DELETED_MESSAGE, NOT_FOUND_MESSAGE};
use serde_json::Value;

use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/tests",
    responses(
        (status = 200, description = "All diagnostic tests, most recent first", body = [DiagnosticTestRes]),
        (status = 500, description = "Store error", body = ErrorRes)
    )
)]
/// List all diagnostic tests, most recently created first.
///
/// # Errors
/// Returns `500 Internal Server Error` if the store cannot be read.
#[axum::debug_handler]
pub async fn list_tests(
    State(state): State<AppState>,
) -> Result<Json<Vec<DiagnosticTestRes>>, ApiError> {
    let tests = state
        .store
        .find_all()
        .map_err(ApiError::store("Failed to fetch diagnostic tests"))?;

    Ok(Json(tests.into_iter().map(DiagnosticTestRes::from).collect()))
}

#[utoipa::path(
    post,
    path = "/api/tests",
    request_body = TestFieldsReq,
    responses(
        (status = 200, description = "Diagnostic test created", body = DiagnosticTestRes),
        (status = 400, description = "Validation failed or malformed body", body = ErrorRes),
        (status = 500, description = "Store error", body = ErrorRes)
    )
)]
/// Create a diagnostic test from a JSON body.
///
/// # Errors
/// Returns `400 Bad Request` if the body is not JSON or breaks a validation rule, and
/// `500 Internal Server Error` if the insert fails.
#[axum::debug_handler]
pub async fn create_test(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DiagnosticTestRes>, ApiError> {
    let fields = validated_body(body)?;

    let test = state
        .store
        .create(fields)
        .map_err(ApiError::store("Failed to create diagnostic test"))?;

    tracing::info!("diagnostic test {} created", test.id);
    Ok(Json(test.into()))
}

#[utoipa::path(
    get,
    path = "/api/tests/{id}",
    params(("id" = String, Path, description = "Diagnostic test id")),
    responses(
        (status = 200, description = "Diagnostic test", body = DiagnosticTestRes),
        (status = 400, description = "Missing id", body = ErrorRes),
        (status = 404, description = "Unknown id", body = ErrorRes),
        (status = 500, description = "Store error", body = ErrorRes)
    )
)]
/// Fetch one diagnostic test by id.
#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<DiagnosticTestRes>, ApiError> {
    let id = require_id(&id)?;

    let test = state
        .store
        .find_one(id)
        .map_err(ApiError::store("Failed to fetch diagnostic test"))?
        .ok_or_else(|| ApiError::NotFound(NOT_FOUND_MESSAGE.into()))?;

    Ok(Json(test.into()))
}

#[utoipa::path(
    put,
    path = "/api/tests/{id}",
    params(("id" = String, Path, description = "Diagnostic test id")),
    request_body = TestFieldsReq,
    responses(
        (status = 200, description = "Diagnostic test updated", body = DiagnosticTestRes),
        (status = 400, description = "Missing id or validation failed", body = ErrorRes),
        (status = 404, description = "Unknown id", body = ErrorRes),
        (status = 500, description = "Store error", body = ErrorRes)
    )
)]
/// Replace the editable fields of a diagnostic test.
///
/// The id is checked before the body, so a request that is wrong on both counts reports the
/// missing id.
#[axum::debug_handler]
pub async fn update_test(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DiagnosticTestRes>, ApiError> {
    let id = require_id(&id)?;
    let fields = validated_body(body)?;

    let test = state.store.update(id, fields).map_err(|e| {
        if matches!(e, dtr_core::RecordError::NotFound { .. }) {
            tracing::warn!("update of unknown diagnostic test {}", id);
        }
        ApiError::store("Failed to update diagnostic test")(e)
    })?;

    tracing::info!("diagnostic test {} updated", test.id);
    Ok(Json(test.into()))
}

#[utoipa::path(
    delete,
    path = "/api/tests/{id}",
    params(("id" = String, Path, description = "Diagnostic test id")),
    responses(
        (status = 200, description = "Diagnostic test deleted", body = MessageRes),
        (status = 400, description = "Missing id", body = ErrorRes),
        (status = 404, description = "Unknown id", body = ErrorRes),
        (status = 500, description = "Store error", body = ErrorRes)
    )
)]
/// Delete a diagnostic test.
///
/// Deleting an id that is already gone is a 404, not a success.
#[axum::debug_handler]
pub async fn delete_test(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<MessageRes>, ApiError> {
    let id = require_id(&id)?;

    state.store.delete(id).map_err(|e| {
        if matches!(e, dtr_core::RecordError::NotFound { .. }) {
            tracing::warn!("delete of unknown diagnostic test {}", id);
        }
        ApiError::store("Failed to delete diagnostic test")(e)
    })?;

    tracing::info!("diagnostic test {} deleted", id);
    Ok(Json(MessageRes {
        message: DELETED_MESSAGE.into(),
    }))
}

/// Item endpoint reached with an empty id segment (`/api/tests/`).
pub async fn missing_id() -> ApiError {
    ApiError::MissingParameter("id")
}

fn require_id(raw: &str) -> Result<&str, ApiError> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ApiError::MissingParameter("id"));
    }
    Ok(id)
}

fn validated_body(body: Result<Json<Value>, JsonRejection>) -> Result<TestFields, ApiError> {
    let Json(value) = body.map_err(|rejection| {
        ApiError::BadRequest(format!("Invalid JSON body: {}", rejection.body_text()))
    })?;

    parse_test_fields(&value).map_err(ApiError::Validation)
}
