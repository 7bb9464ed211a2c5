//! CLI command handlers.

use chrono::Utc;

use crate::config::BridgeConfig;
use crate::error::Result;
use crate::server::{self, AppState};

/// Handle `kommo-bridge serve`.
pub async fn handle_serve(config: &BridgeConfig, bind: Option<String>) -> Result<()> {
    let state = AppState::from_config(config)?;
    let addr = bind.unwrap_or_else(|| config.bind_addr.clone());
    server::serve(state, &addr).await
}

/// Handle `kommo-bridge products`.
pub async fn handle_products(config: &BridgeConfig, name: &str, lead: u64) -> Result<()> {
    let state = AppState::from_config(config)?;
    let view = state.catalog.view(name, lead).await;
    println!("{}", view.html());
    Ok(())
}

/// Handle `kommo-bridge add-user`.
pub async fn handle_add_user(config: &BridgeConfig, name: &str) -> Result<()> {
    let state = AppState::from_config(config)?;
    let created = state.provisioning.add_user(name).await?;
    for user in created {
        println!("✅ Created user {}", user.id);
    }
    Ok(())
}

/// Handle `kommo-bridge tokens`.
pub fn handle_tokens(config: &BridgeConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let accounts = state.tokens.accounts()?;
    if accounts.is_empty() {
        println!("No stored tokens in {}", config.tokens_file.display());
        return Ok(());
    }

    println!("🔐 Stored tokens\n");
    let now = Utc::now();
    for account in accounts {
        let Some(token) = state.tokens.load(&account)? else {
            continue;
        };
        let expiry = token
            .expires_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| token.expires.to_string());
        let status = if token.has_expired_at(now) {
            format!("⚠️  expired {expiry}")
        } else {
            format!("✅ valid until {expiry}")
        };
        println!("  {account} ({}): {status}", token.base_domain);
    }
    Ok(())
}
