pub mod routes;

use crate::config::Config;
use crate::store::ReportStore;
use anyhow::{Context, Result};
use axum::Router;
use rust_embed::RustEmbed;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tracing::info;

#[derive(RustEmbed)]
#[folder = "frontend/dist"]
struct DashboardAssets;

pub async fn run_server(config: Arc<Config>, store: ReportStore) -> Result<()> {
    let port = config.api_port;
    let state = routes::ApiState {
        config,
        store: Arc::new(Mutex::new(store)),
    };
    let app: Router = routes::router(state);

    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind dashboard server: {addr}"))?;

    info!(address = %addr, "HealthWatch dashboard started");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("Dashboard server failed")?;

    Ok(())
}

pub fn get_embedded_asset(path: &str) -> Option<(Vec<u8>, String)> {
    let normalized = path.trim_start_matches('/');
    let requested = if normalized.is_empty() {
        "index.html"
    } else {
        normalized
    };

    DashboardAssets::get(requested)
        .map(|content| (content, requested))
        .or_else(|| DashboardAssets::get("index.html").map(|content| (content, "index.html")))
        .map(|(content, served)| {
            let mime = mime_guess::from_path(served)
                .first_or_octet_stream()
                .to_string();
            (content.data.into_owned(), mime)
        })
}
