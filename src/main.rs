use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use dtr_core::{CoreConfig, DiagnosticTestStore};

/// Main entry point for the diagnostic test records application
///
/// Opens the SQLite store (running pending migrations), then serves the JSON API, the
/// HTML pages and Swagger UI from a single axum server. On Ctrl-C or SIGTERM the server
/// drains in-flight requests and the store connection is released before exit.
///
/// # Environment Variables
/// - `DATABASE_URL`: SQLite location, e.g. `sqlite://diagnostic_tests.db` or `sqlite::memory:`
///   (default: "diagnostic_tests.db")
/// - `DTR_REST_ADDR`: server address (default: "0.0.0.0:3000")
/// - `RUST_LOG`: extra tracing directives
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter()?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CoreConfig::from_database_url(std::env::var("DATABASE_URL").ok())
        .context("invalid DATABASE_URL")?;
    let store = Arc::new(
        DiagnosticTestStore::open(&config).context("failed to open diagnostic test store")?,
    );
    tracing::info!(
        schema_version = store.schema_version()?,
        "++ Opened store at {}",
        config.database()
    );

    let rest_addr = std::env::var("DTR_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    tracing::info!("++ Starting DTR REST on {}", rest_addr);

    let app = router(AppState {
        store: store.clone(),
    });
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .with_context(|| format!("failed to bind {rest_addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Shutting down, releasing store");
    store.close()?;

    Ok(())
}

/// `RUST_LOG` directives plus `info` for the workspace crates that log.
fn log_filter() -> anyhow::Result<EnvFilter> {
    Ok(EnvFilter::from_default_env()
        .add_directive("dtr=info".parse()?)
        .add_directive("api_rest=info".parse()?))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_enables_api_and_core_crates() {
        let filter = log_filter().unwrap().to_string();
        assert!(filter.contains("api_rest=info"));
        assert!(filter.contains("dtr=info"));
    }
}
