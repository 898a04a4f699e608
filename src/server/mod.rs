use crate::config::Config;
use crate::fetch::{MediaPipeline, ScratchDir, YtDlpFetcher};
use crate::metadata::MetadataRegistry;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    middleware, Router,
};
use reelgate_av::{ToolRegistry, YT_DLP};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod openapi;
pub mod request_id;
pub mod routes_api;

pub use error::AppError;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    /// Platform -> metadata provider dispatch table
    pub metadata: Arc<MetadataRegistry>,
    /// Validates, fetches and stages downloads
    pub pipeline: Arc<MediaPipeline>,
}

impl AppContext {
    pub fn new(config: Config, metadata: MetadataRegistry, pipeline: MediaPipeline) -> Self {
        Self {
            config: Arc::new(config),
            metadata: Arc::new(metadata),
            pipeline: Arc::new(pipeline),
        }
    }

    /// Wire up the default collaborators: discovered tools, the built-in
    /// metadata providers and a yt-dlp fetcher.
    pub fn from_config(config: Config) -> Result<Self> {
        let tools = ToolRegistry::discover(&config.tools);
        if tools.require(YT_DLP).is_err() {
            tracing::warn!("yt-dlp not found; downloads and some metadata lookups will fail");
        }

        let metadata = MetadataRegistry::with_defaults(&config.metadata, &tools)?;
        let fetcher = YtDlpFetcher::new(tools.path_or_name(YT_DLP), config.download.timeout());
        let pipeline = MediaPipeline::new(
            Arc::new(fetcher),
            ScratchDir::new(config.download.scratch_dir.clone()),
        );

        Ok(Self::new(config, metadata, pipeline))
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::CONTENT_DISPOSITION,
        ])
        .expose_headers([header::CONTENT_DISPOSITION]);

    Router::new()
        .merge(routes_api::api_routes())
        .merge(openapi::openapi_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id::request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(ctx)
}

/// Start the HTTP server with the default collaborators
pub async fn start_server(config: Config) -> Result<()> {
    let ctx = AppContext::from_config(config)?;
    start_server_with_context(ctx).await
}

/// Start the HTTP server with a prepared context
pub async fn start_server_with_context(ctx: AppContext) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port)
        .parse()
        .context("Invalid server address")?;

    let scratch = ctx.pipeline.scratch();
    scratch
        .ensure()
        .await
        .with_context(|| format!("Failed to create scratch directory {:?}", scratch.path()))?;
    tracing::info!("Staging downloads in {:?}", scratch.path());

    let app = create_router(ctx);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
