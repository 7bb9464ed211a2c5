//! Kommo OAuth2 client: authorize URL, install button and code exchange.

use bon::Builder;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::BridgeConfig;
use crate::util::html::escape;
use crate::util::http::{base_url, extract_error_message};

use super::error::AuthError;
use super::token::AccountToken;

/// Display options for the vendor's "install integration" button.
#[derive(Debug, Clone, Builder)]
pub struct ButtonOptions {
    #[builder(into)]
    pub title: String,
    #[builder(default = true)]
    pub compact: bool,
    #[builder(into, default = "className".to_string())]
    pub class_name: String,
    #[builder(into, default = "default".to_string())]
    pub color: String,
    #[builder(into, default = "handleOauthError".to_string())]
    pub error_callback: String,
    #[builder(into, default = "post_message".to_string())]
    pub mode: String,
}

/// OAuth client for one Kommo integration.
///
/// # Example
/// ```no_run
/// use kommo_bridge::auth::KommoOAuth;
/// use kommo_bridge::config::BridgeConfig;
///
/// let config = BridgeConfig::new("client-id", "secret", "https://bridge.example/auth");
/// let oauth = KommoOAuth::new(&config, reqwest::Client::new());
/// let url = oauth.authorize_url("0123abcd")?;
/// assert!(url.contains("state=0123abcd"));
/// # Ok::<(), kommo_bridge::auth::AuthError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KommoOAuth {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    authorize_url: String,
    button_script_url: String,
    target_domain: String,
    allowed_base_domains: Vec<String>,
}

impl KommoOAuth {
    pub fn new(config: &BridgeConfig, client: reqwest::Client) -> Self {
        let target = base_url(&format!("www.{}", config.target_domain));
        Self {
            client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            authorize_url: format!("{target}/oauth"),
            button_script_url: format!("{target}/auth/button.js"),
            target_domain: config.target_domain.trim().to_ascii_lowercase(),
            allowed_base_domains: config
                .allowed_base_domains
                .iter()
                .map(|d| d.trim().trim_end_matches('/').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn with_authorize_url(mut self, url: impl Into<String>) -> Self {
        self.authorize_url = url.into();
        self
    }

    /// Authorization page URL carrying the anti-CSRF `state`.
    pub fn authorize_url(&self, state: &str) -> Result<String, AuthError> {
        let url = url::Url::parse_with_params(
            &self.authorize_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("state", state),
                ("mode", "post_message"),
            ],
        )
        .map_err(|err| {
            AuthError::InvalidConfig(format!("authorize url {}: {err}", self.authorize_url))
        })?;
        Ok(url.into())
    }

    /// Script tag rendering the vendor's install button.
    pub fn button_html(&self, state: &str, options: &ButtonOptions) -> String {
        format!(
            concat!(
                "<script class=\"kommo_oauth\" charset=\"utf-8\" ",
                "data-client-id=\"{client_id}\" data-title=\"{title}\" ",
                "data-compact=\"{compact}\" data-class-name=\"{class_name}\" ",
                "data-color=\"{color}\" data-state=\"{state}\" ",
                "data-error-callback=\"{error_callback}\" data-mode=\"{mode}\" ",
                "src=\"{src}\"></script>"
            ),
            client_id = escape(&self.client_id),
            title = escape(&options.title),
            compact = options.compact,
            class_name = escape(&options.class_name),
            color = escape(&options.color),
            state = escape(state),
            error_callback = escape(&options.error_callback),
            mode = escape(&options.mode),
            src = escape(&self.button_script_url),
        )
    }

    /// Normalize a callback `referer` and check it names an account we may
    /// send the client secret to.
    ///
    /// Accepted: subdomains of the target domain, and entries of the
    /// allow-list (exactly, or their subdomains for bare hosts). A scheme is
    /// only accepted when the allow-list names that exact value.
    pub fn check_base_domain(&self, referer: &str) -> Result<String, AuthError> {
        let candidate = referer.trim().trim_end_matches('/').to_ascii_lowercase();
        if self.allowed_base_domains.iter().any(|d| *d == candidate) {
            return Ok(candidate);
        }

        let is_host = !candidate.is_empty()
            && !candidate.starts_with('.')
            && !candidate.contains("..")
            && candidate
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
        let under = |parent: &str| {
            !parent.is_empty() && !parent.contains("://") && candidate.ends_with(&format!(".{parent}"))
        };
        let allowed = is_host
            && (under(&self.target_domain)
                || self
                    .allowed_base_domains
                    .iter()
                    .any(|d| !d.contains("://") && (candidate == *d || under(d))));
        if allowed {
            Ok(candidate)
        } else {
            Err(AuthError::InvalidBaseDomain(referer.to_string()))
        }
    }

    /// Exchange an authorization code at `https://<base_domain>/oauth2/access_token`.
    ///
    /// `base_domain` goes through [`Self::check_base_domain`] first; nothing
    /// is sent to a host that fails it.
    pub async fn exchange_code(
        &self,
        base_domain: &str,
        code: &str,
    ) -> Result<AccountToken, AuthError> {
        let base_domain = self.check_base_domain(base_domain)?;
        let url = format!("{}/oauth2/access_token", base_url(&base_domain));
        tracing::debug!(%url, "exchanging authorization code");
        let resp = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(&TokenRequest {
                client_id: &self.client_id,
                client_secret: &self.client_secret,
                grant_type: "authorization_code",
                code,
                redirect_uri: &self.redirect_uri,
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = extract_error_message(&body).unwrap_or(body);
            return Err(AuthError::Exchange(format!(
                "Token exchange failed with status {status}: {detail}"
            )));
        }

        let payload: TokenResponse = resp.json().await?;
        let expires = Utc::now()
            .timestamp()
            .checked_add(payload.expires_in)
            .ok_or_else(|| {
                AuthError::Exchange(format!("invalid expires_in: {}", payload.expires_in))
            })?;
        Ok(AccountToken {
            access_token: payload.access_token,
            refresh_token: payload.refresh_token,
            expires,
            base_domain,
        })
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    expires_in: i64,
}
