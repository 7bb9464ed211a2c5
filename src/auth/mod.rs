//! OAuth authorization flow, sessions and token storage.

pub mod error;
pub mod flow;
pub mod oauth;
pub mod session;
pub mod store;
pub mod token;

pub use error::AuthError;
pub use flow::{AuthFlow, AuthOutcome, AuthorizeParams};
pub use oauth::{ButtonOptions, KommoOAuth};
pub use session::{MemorySessionStore, Session, SessionStore};
pub use store::{FileTokenStore, MemoryTokenStore, TokenMap, TokenStore};
pub use token::AccountToken;
