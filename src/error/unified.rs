//! Error classification and recovery.

/// Broad error category for routing user-facing responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// OAuth state did not match the one stored in the session.
    Csrf,
    /// The authorization code could not be exchanged.
    TokenExchange,
    /// Stored token is missing, expired or rejected by the CRM.
    Token,
    Api,
    /// A lookup succeeded but returned nothing to show.
    EmptyResult,
    Configuration,
    Storage,
    /// The inbound request was missing something it needs.
    Request,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    Reauthorize,
    RestartAuthorization,
    CheckConfiguration,
    FixRequest,
    ContactDeveloper,
    None,
}
