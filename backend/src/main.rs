use anyhow::{Context, Result};
use tracing::info;
use wris_backend::api::{router, AppState};
use wris_backend::{build_pipeline, log_filter};
use wris_backend::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .init();

    info!("💧 Starting WRIS fetch API server...");

    let config = Config::from_env()?;
    info!("Writing output under {:?}", config.output_dir);

    let pipeline = build_pipeline(&config)?;
    let app = router(AppState { pipeline });

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("🚀 Server running on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
