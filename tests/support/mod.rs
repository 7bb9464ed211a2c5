#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use kommo_bridge::auth::{AccountToken, MemorySessionStore, MemoryTokenStore, TokenStore};
use kommo_bridge::config::BridgeConfig;
use kommo_bridge::server::AppState;
use wiremock::MockServer;

pub fn config() -> BridgeConfig {
    BridgeConfig::new("client-1", "secret-1", "https://bridge.example/auth")
}

/// Config that accepts the mock server as an account domain.
pub fn config_for(server: &MockServer) -> BridgeConfig {
    config().with_allowed_base_domains([server.uri()])
}

/// A still-valid token pointing at `base_domain`.
pub fn token(access_token: &str, base_domain: &str) -> AccountToken {
    AccountToken {
        access_token: access_token.to_string(),
        refresh_token: "refresh".to_string(),
        expires: (Utc::now() + Duration::hours(1)).timestamp(),
        base_domain: base_domain.to_string(),
    }
}

pub fn expired_token(base_domain: &str) -> AccountToken {
    AccountToken {
        expires: (Utc::now() - Duration::hours(1)).timestamp(),
        ..token("stale", base_domain)
    }
}

/// Store with `account` authorized against the mock server.
pub fn store_for(account: &str, server: &MockServer) -> Arc<MemoryTokenStore> {
    let store = Arc::new(MemoryTokenStore::new());
    store
        .save(account, &token("access-1", &server.uri()))
        .expect("seed token");
    store
}

pub fn app_state(store: Arc<dyn TokenStore>) -> AppState {
    AppState::with_stores(&config(), store, Arc::new(MemorySessionStore::new()))
        .expect("app state")
}

/// State whose OAuth client may exchange codes against `server`.
pub fn app_state_for(
    store: Arc<dyn TokenStore>,
    sessions: Arc<MemorySessionStore>,
    server: &MockServer,
) -> AppState {
    AppState::with_stores(&config_for(server), store, sessions).expect("app state")
}
