//! Equipment portal server implementation
//!
//! HTTP server using Axum. Serves the login page and static assets, and
//! guards the equipment API behind the session login gate.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::auth::{self, SessionStore};
use super::handlers;
use crate::config::{LoginSettings, PortalConfig, REMOTE_TIMEOUT, SESSION_TTL};
use crate::drive::{ClientCredentials, GraphDrive, RemoteStore};
use crate::locator::FileLocator;

/// Shared application state
pub struct AppState {
    pub version: String,
    pub store: Arc<dyn RemoteStore>,
    pub locator: FileLocator,
    pub sessions: SessionStore,
    pub login: LoginSettings,
    pub public_dir: PathBuf,
    pub views_dir: PathBuf,
}

impl AppState {
    /// Assemble state around any remote store
    pub fn new(config: &PortalConfig, store: Arc<dyn RemoteStore>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            locator: FileLocator::new(Arc::clone(&store), config.drive.folder_root.clone()),
            store,
            sessions: SessionStore::new(SESSION_TTL),
            login: config.login.clone(),
            public_dir: config.public_dir.clone(),
            views_dir: config.views_dir.clone(),
        }
    }
}

/// Build the router: public pages, the login endpoints, and the guarded API
pub fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route_service("/", ServeFile::new(state.views_dir.join("index.html")))
        .route("/api/list-folders", get(handlers::list_folders))
        .route("/api/excel-data", get(handlers::excel_data))
        .route("/api/save-excel", post(handlers::save_excel))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth::require_login,
        ));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route_service(
            "/login.html",
            ServeFile::new(state.public_dir.join("login.html")),
        )
        .nest_service("/public", ServeDir::new(&state.public_dir))
        .merge(protected)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the portal server against Microsoft Graph
pub async fn run_api_server(config: PortalConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "equipment_portal=info,tower_http=info".into()),
        )
        .init();

    config.validate()?;

    let client = reqwest::Client::builder().timeout(REMOTE_TIMEOUT).build()?;
    let tokens = Arc::new(ClientCredentials::new(
        client.clone(),
        config.credentials.clone(),
    ));
    let store: Arc<dyn RemoteStore> = Arc::new(GraphDrive::new(
        client,
        tokens,
        config.drive.drive_user.clone(),
    ));

    let state = Arc::new(AppState::new(&config, store));
    let app = build_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Equipment portal starting on http://{}", addr);
    info!("   Drive root: {}", config.drive.folder_root);
    info!("   Endpoints: /api/list-folders, /api/excel-data, /api/save-excel");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Equipment portal shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
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
                tracing::error!("failed to install SIGTERM handler: {}", e);
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

    info!("Shutdown signal received, stopping server...");
}
