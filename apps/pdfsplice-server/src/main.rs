//! pdfsplice server
//!
//! REST API around the pdfsplice-core page operations: upload PDFs as base64
//! payloads, get back one merged document or one document per requested page
//! range. Uploads live only for the duration of a request; nothing is ever
//! written to disk.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod audit;
mod certificate;
mod error;
#[cfg(test)]
mod tests;

use audit::{AuditLog, TracingAuditLog};

/// Command-line arguments for the pdfsplice server
#[derive(Parser, Debug)]
#[command(name = "pdfsplice-server")]
#[command(about = "Merge and split PDF documents over a REST API")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Maximum request body size in megabytes
    #[arg(long, default_value = "64")]
    max_upload_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Collaborator recording successful operations
    pub audit: Arc<dyn AuditLog>,
}

fn router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(api::handle_health))
        // API endpoints
        .route("/api/inspect", post(api::handle_inspect))
        .route("/api/merge", post(api::handle_merge))
        .route("/api/split", post(api::handle_split))
        // Apply middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState {
        audit: Arc::new(TracingAuditLog),
    };
    let app = router(state, args.max_upload_mb * 1024 * 1024);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("pdfsplice server listening on http://{}", addr);
    info!("Upload limit: {} MB per request", args.max_upload_mb);

    axum::serve(listener, app).await?;

    Ok(())
}
