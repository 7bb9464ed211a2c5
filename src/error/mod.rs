//! Error types for kommo-bridge.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid state")]
    InvalidState,

    #[error("{0}")]
    TokenExchange(String),

    #[error("No token stored for account {0}")]
    MissingToken(String),

    #[error("Token for account {0} has expired")]
    TokenExpired(String),

    #[error("Session has no account name")]
    MissingSessionName,

    #[error("Deal {0} has no products")]
    NoProducts(u64),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl BridgeError {
    /// Create an API error from a status code and response body.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidState => ErrorCategory::Csrf,
            Self::TokenExchange(_) => ErrorCategory::TokenExchange,
            Self::MissingToken(_) | Self::TokenExpired(_) => ErrorCategory::Token,
            Self::Api { status: 401, .. } => ErrorCategory::Token,
            Self::Api { .. } | Self::Network(_) => ErrorCategory::Api,
            Self::NoProducts(_) => ErrorCategory::EmptyResult,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Storage(_) | Self::Io(_) | Self::Serialization(_) => ErrorCategory::Storage,
            Self::MissingSessionName | Self::InvalidArgument(_) => ErrorCategory::Request,
        }
    }

    /// Whether the stored token has to be recreated through the OAuth flow.
    pub fn requires_reauthorization(&self) -> bool {
        self.category() == ErrorCategory::Token
    }

    /// Suggest a recovery action for the caller.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Token => RecoverySuggestion::Reauthorize,
            ErrorCategory::Csrf | ErrorCategory::TokenExchange => RecoverySuggestion::RestartAuthorization,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::Request => RecoverySuggestion::FixRequest,
            ErrorCategory::EmptyResult => RecoverySuggestion::None,
            ErrorCategory::Api | ErrorCategory::Storage => RecoverySuggestion::ContactDeveloper,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BridgeError>;
