//! Serve command - run the web front-end and HTTP API.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::server::{build_router, AppState};
use std::sync::Arc;
use tracing::info;

/// Run the HTTP server until interrupted.
pub async fn run_serve(host: Option<&str>, port: Option<u16>, settings: Settings) -> anyhow::Result<()> {
    let orchestrator = Orchestrator::new(&settings)?;
    let state = Arc::new(AppState::new(orchestrator, &settings));
    let app = build_router(state);

    let host = host.unwrap_or(&settings.server.host);
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Glean Server");
    Output::success(&format!("Listening on http://{}", addr));
    Output::kv("LLM", &format!("{} ({})", settings.llm.provider, settings.llm.model));
    Output::kv("Index", "GET  /");
    Output::kv("Insights", "POST /get-insights");
    Output::kv("PDF", "POST /download-pdf");
    Output::kv("Health", "GET  /health");
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
