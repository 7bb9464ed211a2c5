//! HTTP surface: axum router over the bridge services.

pub mod error;
pub mod handlers;
pub mod session;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::{
    AuthFlow, FileTokenStore, KommoOAuth, MemorySessionStore, SessionStore, TokenStore,
};
use crate::catalog::CatalogService;
use crate::config::BridgeConfig;
use crate::error::Result;
use crate::provisioning::ProvisioningService;
use crate::util::http::build_client;

/// Services shared by every handler (and by the CLI).
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<AuthFlow>,
    pub catalog: Arc<CatalogService>,
    pub provisioning: Arc<ProvisioningService>,
    pub tokens: Arc<dyn TokenStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Wire services with the file token store named in `config`.
    pub fn from_config(config: &BridgeConfig) -> Result<Self> {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.tokens_file.clone()));
        Self::with_stores(config, store, Arc::new(MemorySessionStore::new()))
    }

    pub fn with_stores(
        config: &BridgeConfig,
        tokens: Arc<dyn TokenStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        config.validate()?;
        let http = build_client(config.http_timeout())?;
        let oauth = KommoOAuth::new(config, http.clone());
        Ok(Self {
            flow: Arc::new(AuthFlow::new(oauth, tokens.clone(), config.locale)),
            catalog: Arc::new(CatalogService::new(
                http.clone(),
                tokens.clone(),
                config.locale,
                config.renew_url.clone(),
            )),
            provisioning: Arc::new(ProvisioningService::new(http, tokens.clone())),
            tokens,
            sessions,
        })
    }
}

/// Build the router.
///
/// # Routes
/// - `GET /auth` - authorize redirect / button / OAuth callback
/// - `GET /token/renew` - restart authorization for `name`
/// - `GET /deals/:lead_id/products` - products table for a deal
/// - `POST /users` - create the service user
/// - `GET /health` - liveness
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/auth", get(handlers::authorize))
        .route("/token/renew", get(handlers::renew_token))
        .route("/deals/:lead_id/products", get(handlers::deal_products))
        .route("/users", post(handlers::add_user))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
