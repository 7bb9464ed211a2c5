use thiserror::Error;

use crate::error::BridgeError;

/// Errors raised by the OAuth flow and the token store.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid state")]
    InvalidState,
    #[error("Session has no account name")]
    MissingSessionName,
    #[error("Missing base domain (referer)")]
    MissingBaseDomain,
    #[error("Base domain {0} is not an allowed account domain")]
    InvalidBaseDomain(String),
    #[error("{0}")]
    Exchange(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

impl From<std::io::Error> for AuthError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}

impl From<AuthError> for BridgeError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidState => BridgeError::InvalidState,
            AuthError::MissingSessionName => BridgeError::MissingSessionName,
            AuthError::MissingBaseDomain => {
                BridgeError::InvalidArgument("referer (account base domain) is required".to_string())
            }
            // Network failures only happen during the code exchange.
            AuthError::Exchange(message) | AuthError::Network(message) => {
                BridgeError::TokenExchange(message)
            }
            AuthError::InvalidBaseDomain(domain) => {
                BridgeError::InvalidArgument(format!("referer {domain} is not an allowed account domain"))
            }
            AuthError::InvalidConfig(message) => BridgeError::Configuration(message),
            AuthError::Io(message) | AuthError::Serialization(message) => {
                BridgeError::Storage(message)
            }
        }
    }
}
