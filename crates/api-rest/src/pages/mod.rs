//! Server-rendered pages.
//!
//! The list page reads the store directly rather than going through the JSON API; the form
//! and list components then talk to the API with `fetch` from small inline scripts.
//!
//! Every record value interpolated into markup goes through [`escape_html`].

mod form;
mod list;

use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::AppState;
pub use form::{render_form, FormMode};
pub use list::render_list;

/// Failure while rendering a page, shown to the browser as an HTML page.
#[derive(Debug)]
pub enum PageError {
    NotFound,
    Internal(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            PageError::NotFound => (
                StatusCode::NOT_FOUND,
                "<h1>Not found</h1><p>This diagnostic test does not exist.</p>\
                 <p><a href=\"/\">Back to all tests</a></p>",
            ),
            PageError::Internal(detail) => {
                tracing::error!(detail, "page render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "<h1>Something went wrong</h1><p>Failed to load diagnostic tests.</p>",
                )
            }
        };
        (status, Html(layout("Diagnostic Tests", body))).into_response()
    }
}

/// `GET /` - every record, newest first.
pub async fn list_page(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let tests = state
        .store
        .find_all()
        .map_err(|e| PageError::Internal(e.to_string()))?;

    let body = format!(
        "<div class=\"header\"><h1>Diagnostic Tests</h1>\
         <a class=\"button primary\" href=\"/new\">Add New Test</a></div>{}",
        render_list(&tests)
    );
    Ok(Html(layout("Diagnostic Tests", &body)))
}

/// `GET /new` - the form in create mode.
pub async fn new_page() -> Html<String> {
    let body = format!(
        "<h1>Add New Diagnostic Test</h1>{}",
        render_form(FormMode::Create)
    );
    Html(layout("Add New Diagnostic Test", &body))
}

/// `GET /edit/{id}` - the form in edit mode, prefilled from the stored record.
pub async fn edit_page(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Html<String>, PageError> {
    let test = state
        .store
        .find_one(id.trim())
        .map_err(|e| PageError::Internal(e.to_string()))?
        .ok_or(PageError::NotFound)?;

    let body = format!(
        "<h1>Edit Diagnostic Test</h1>{}",
        render_form(FormMode::Edit(&test))
    );
    Ok(Html(layout("Edit Diagnostic Test", &body)))
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{}</style></head>\
         <body><main class=\"container\">{}</main></body></html>",
        escape_html(title),
        STYLE,
        body
    )
}

const STYLE: &str = "\
body { font-family: system-ui, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; }\
.container { max-width: 960px; margin: 0 auto; padding: 32px 16px; }\
.header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 32px; }\
.cards { display: flex; flex-wrap: wrap; gap: 16px; align-items: flex-start; }\
.card { background: white; border: 1px solid #e2e8f0; border-radius: 8px; padding: 16px; min-width: 220px; }\
.muted { color: #64748b; font-size: 14px; }\
.button { border: none; border-radius: 6px; padding: 8px 16px; cursor: pointer; text-decoration: none; }\
.primary { background: #3b82f6; color: white; }\
.secondary { background: #e5e7eb; color: #1f2937; }\
.link { background: none; border: none; cursor: pointer; padding: 0 4px; }\
.edit { color: #3b82f6; } .delete { color: #ef4444; }\
form label { display: block; font-size: 14px; font-weight: 500; margin-top: 12px; }\
form input, form textarea { display: block; width: 100%; box-sizing: border-box; padding: 8px; margin-top: 4px; border: 1px solid #cbd5e1; border-radius: 6px; }\
.actions { display: flex; justify-content: flex-end; gap: 12px; padding-top: 16px; }\
.error { color: #dc2626; min-height: 1em; }\
button:disabled { opacity: 0.7; cursor: not-allowed; }";
