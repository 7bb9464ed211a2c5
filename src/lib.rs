//! kommo-bridge: OAuth2 bridge between a web application and the Kommo CRM API.
//!
//! Runs the authorization-code flow, keeps one token per account name in a
//! JSON file, and uses those tokens to list the products attached to a deal
//! and to create the integration's service user.
//!
//! # Quick Start
//!
//! ```no_run
//! use kommo_bridge::config::BridgeConfig;
//! use kommo_bridge::server::{self, AppState};
//!
//! # async fn example() -> kommo_bridge::error::Result<()> {
//! let config = BridgeConfig::from_env()?;
//! let state = AppState::from_config(&config)?;
//! server::serve(state, &config.bind_addr).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod messages;
pub mod provisioning;
pub mod server;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
