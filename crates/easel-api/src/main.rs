//! easel-api - HTTP API server for easel

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use easel_api::uploads::UploadStore;
use easel_api::{build_router, AppState};
use easel_core::AppConfig;
use easel_hosting::{Deployer, HostingApiClient, HostingCliDeployer};
use easel_inference::{CritiqueBackend, OpenAiCritiqueBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "easel_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "easel_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("easel-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Build configuration; the critique API key is required
    let config = Arc::new(AppConfig::from_env()?);

    // Upload store must be writable before accepting traffic
    let uploads = UploadStore::from_config(&config.intake);
    if let Err(e) = uploads.validate().await {
        anyhow::bail!("Upload store validation failed: {}", e);
    }
    info!(dir = %config.intake.upload_dir.display(), "Upload store ready");

    // Critique backend
    let critique = Arc::new(OpenAiCritiqueBackend::new(config.critique.clone())?);
    if critique.health_check().await.unwrap_or(false) {
        info!(model = critique.model_name(), "Critique backend is reachable");
    } else {
        warn!("Critique backend health check failed, continuing startup");
    }

    // Deploy CLI and optional hosting API lookup
    let deployer = Arc::new(HostingCliDeployer::from_config(&config.hosting));
    if deployer.health_check().await.unwrap_or(false) {
        info!(command = %config.hosting.deploy_command, "Deploy CLI is available");
    } else {
        warn!("Deploy CLI health check failed, continuing startup");
    }

    let hosting_api = HostingApiClient::from_config(&config.hosting)?.map(Arc::new);
    if hosting_api.is_none() {
        info!("No hosting API token configured, preview URL lookup disabled");
    }

    let state = AppState {
        config: config.clone(),
        critique,
        deployer,
        hosting_api,
        uploads,
    };

    let app = build_router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
