//! ExecFit coaching site backend
//!
//! (c) ExecFit 2026

use execfit_api::api;
use execfit_api::infrastructure::config::AppConfig;
use execfit_api::infrastructure::database::DatabaseConnection;
use execfit_api::service_collection;

use anyhow::anyhow;
use axum::Router;
use axum::http::{HeaderValue, Method};
use di_axum::RouterServiceProviderExtensions;
use log::{info, warn};
use tokio::runtime::{Builder, Runtime};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt::init();

    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;
    runtime.block_on(web_server_task())
}

async fn web_server_task() -> anyhow::Result<()> {
    let provider = service_collection()
        .build_provider()
        .map_err(|e| anyhow!("invalid service registrations: {e:?}"))?;

    let config = provider.get_required::<AppConfig>();
    tokio::fs::create_dir_all(&config.data_dir).await?;

    let connection = provider.get_required::<DatabaseConnection>();
    sqlx::migrate!().run(&**connection).await?;
    info!("database migrations applied");

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|e| warn!("ignoring CORS origin {origin}: {e}"))
                .ok()
        })
        .collect();

    let app = Router::new()
        .nest("/api", api::router())
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_headers(Any)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_origin(origins),
            ),
        )
        .with_provider(provider);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    info!("Shutting down...");

    Ok(())
}
