// axum application setup and server startup

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::{
    handlers::{assets::serve_static_asset, browse::handle_browse_request},
    middleware::security::add_security_headers,
};
use crate::config::AppConfig;
use crate::store::{self, ObjectStore};

/// url prefix for embedded static assets
pub const STATIC_PREFIX: &str = "/__s3browse_static";

/// shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ObjectStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

/// create the axum application backed by the configured store
pub async fn create_app(config: AppConfig) -> Result<Router> {
    let store = store::connect(&config.store)
        .await
        .context("failed to open object store")?;
    Ok(create_app_with_store(config, store))
}

/// create the axum application around an existing store
pub fn create_app_with_store(config: AppConfig, store: Arc<dyn ObjectStore>) -> Router {
    let app_state = AppState::new(config, store);

    Router::new()
        // static asset routes
        .route(&format!("{STATIC_PREFIX}/*path"), get(serve_static_asset))
        // the browser page, driven by ?prefix=
        .route("/", get(handle_browse_request))
        // middleware stack
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(add_security_headers)),
        )
        .with_state(app_state)
}

/// start the http server
pub async fn start_server(config: AppConfig) -> Result<()> {
    let app = create_app(config.clone()).await?;

    // create socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("invalid host/port combination")?;

    // log startup information
    info!(
        "starting s3browse v{} at http://{}",
        env!("CARGO_PKG_VERSION"),
        addr
    );
    info!("bucket: {}", config.store.bucket);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("failed to bind to address")?;

    info!("server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
