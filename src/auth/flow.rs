//! Authorization-code flow: redirect (or button) first, token exchange on callback.

use std::sync::Arc;

use serde::Deserialize;

use crate::messages::Locale;

use super::error::AuthError;
use super::oauth::{ButtonOptions, KommoOAuth};
use super::session::Session;
use super::store::TokenStore;

/// Query parameters accepted by the authorize endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizeParams {
    /// Display name the token is saved under.
    pub name: Option<String>,
    /// Account base domain, sent back by Kommo on the callback.
    pub referer: Option<String>,
    pub code: Option<String>,
    pub state: Option<String>,
    /// Any value renders the install button instead of redirecting.
    pub button: Option<String>,
}

/// What the caller has to send back to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// HTML for the install button.
    Button(String),
    /// Redirect to the vendor's authorize page.
    Redirect(String),
    /// The code was exchanged and the token stored (if still valid).
    Authorized { name: String },
}

/// Drives one authorization round trip against a session.
pub struct AuthFlow {
    oauth: KommoOAuth,
    store: Arc<dyn TokenStore>,
    locale: Locale,
}

impl AuthFlow {
    pub fn new(oauth: KommoOAuth, store: Arc<dyn TokenStore>, locale: Locale) -> Self {
        Self {
            oauth,
            store,
            locale,
        }
    }

    pub fn oauth(&self) -> &KommoOAuth {
        &self.oauth
    }

    /// Handle an authorize request.
    ///
    /// Without a `code` a new state is stored in the session and a button or
    /// redirect is returned. With a `code`, the request state must equal the
    /// session state; the stored state is consumed either way.
    pub async fn authorize(
        &self,
        session: &mut Session,
        params: AuthorizeParams,
    ) -> Result<AuthOutcome, AuthError> {
        if let Some(name) = non_empty(params.name) {
            session.name = Some(name);
        }

        let Some(code) = non_empty(params.code) else {
            let state = generate_state();
            session.oauth_state = Some(state.clone());
            if params.button.is_some() {
                tracing::info!(name = ?session.name, "rendering install button");
                let options = ButtonOptions::builder()
                    .title(self.locale.install_button_title())
                    .build();
                return Ok(AuthOutcome::Button(self.oauth.button_html(&state, &options)));
            }
            tracing::info!(name = ?session.name, "redirecting to authorize page");
            return Ok(AuthOutcome::Redirect(self.oauth.authorize_url(&state)?));
        };

        let expected = session.oauth_state.take();
        match (non_empty(params.state), expected) {
            (Some(received), Some(expected)) if received == expected => {}
            _ => {
                tracing::warn!(name = ?session.name, "oauth state mismatch");
                return Err(AuthError::InvalidState);
            }
        }

        let base_domain = non_empty(params.referer).ok_or(AuthError::MissingBaseDomain)?;
        let name = session.name.clone().ok_or(AuthError::MissingSessionName)?;

        let token = self.oauth.exchange_code(&base_domain, &code).await?;
        if token.has_expired() {
            tracing::warn!(%name, "exchanged token already expired, not saving");
        } else {
            self.store.save(&name, &token)?;
            tracing::info!(%name, %base_domain, "account authorized");
        }

        Ok(AuthOutcome::Authorized { name })
    }
}

/// Random one-time OAuth state: 32 lowercase hex characters.
pub fn generate_state() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
