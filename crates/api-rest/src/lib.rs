//! # API REST
//!
//! HTTP surface for diagnostic test records.
//!
//! Handles:
//! - JSON endpoints with axum (`records`)
//! - Server-rendered list, new and edit pages (`pages`)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialisation, CORS, status mapping)
//!
//! Uses `api-shared` for response types and `dtr-core` for validation and storage. The store
//! is built by the process entry point and injected through [`AppState`].

#![warn(rust_2018_idioms)]

pub mod error;
pub mod pages;
pub mod records;

use api_shared::{
    DiagnosticTestRes, ErrorRes, HealthRes, HealthService, IssueRes, MessageRes, TestFieldsReq,
};
use axum::{extract::State, response::Json, routing::get, Router};
use dtr_core::DiagnosticTestStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DiagnosticTestStore>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        records::list_tests,
        records::create_test,
        records::get_test,
        records::update_test,
        records::delete_test,
    ),
    components(schemas(
        HealthRes,
        TestFieldsReq,
        DiagnosticTestRes,
        MessageRes,
        ErrorRes,
        IssueRes,
    ))
)]
pub struct ApiDoc;

/// Build the full application router: API, pages, health and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/tests",
            get(records::list_tests).post(records::create_test),
        )
        .route(
            "/api/tests/",
            get(records::missing_id)
                .put(records::missing_id)
                .delete(records::missing_id),
        )
        .route(
            "/api/tests/:id",
            get(records::get_test)
                .put(records::update_test)
                .delete(records::delete_test),
        )
        .route("/", get(pages::list_page))
        .route("/new", get(pages::new_page))
        .route("/edit/:id", get(pages::edit_page))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Probes the store with a record count. Always answers 200; `ok` is false when the store
/// cannot be reached.
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health(state.store.count()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        router(AppState {
            store: Arc::new(DiagnosticTestStore::open_in_memory().unwrap()),
        })
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["records"], 0);
    }

    #[tokio::test]
    async fn openapi_document_lists_record_paths() {
        let response = app()
            .oneshot(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 256 * 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["paths"]["/api/tests"].is_object());
        assert!(json["paths"]["/api/tests/{id}"]["delete"].is_object());
    }
}
