//! Configuration (layered: explicit values > env / `.env` > TOML file defaults).

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::BridgeError;
use crate::messages::Locale;

pub const DEFAULT_TARGET_DOMAIN: &str = "kommo.com";
pub const DEFAULT_TOKENS_FILE: &str = "./tokens.json";
pub const DEFAULT_RENEW_URL: &str = "/token/renew";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Integration settings for one Kommo OAuth application.
#[derive(Clone, Deserialize)]
pub struct BridgeConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Domain hosting the authorize page and install button script.
    #[serde(default = "default_target_domain")]
    pub target_domain: String,
    /// Extra account domains accepted as the callback `referer`, besides
    /// subdomains of `target_domain`. An entry may carry an explicit scheme
    /// (`http://127.0.0.1:9000`); such entries only match exactly.
    #[serde(default)]
    pub allowed_base_domains: Vec<String>,
    #[serde(default = "default_tokens_file")]
    pub tokens_file: PathBuf,
    /// Target of the "recreate token" link shown on token errors.
    #[serde(default = "default_renew_url")]
    pub renew_url: String,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"..")
            .field("redirect_uri", &self.redirect_uri)
            .field("target_domain", &self.target_domain)
            .field("allowed_base_domains", &self.allowed_base_domains)
            .field("tokens_file", &self.tokens_file)
            .field("renew_url", &self.renew_url)
            .field("locale", &self.locale)
            .field("bind_addr", &self.bind_addr)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .finish()
    }
}

impl BridgeConfig {
    /// Create a config with the required OAuth values and defaults for the rest.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
            target_domain: default_target_domain(),
            allowed_base_domains: Vec::new(),
            tokens_file: default_tokens_file(),
            renew_url: default_renew_url(),
            locale: Locale::default(),
            bind_addr: default_bind_addr(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }

    pub fn with_tokens_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.tokens_file = path.into();
        self
    }

    pub fn with_target_domain(mut self, domain: impl Into<String>) -> Self {
        self.target_domain = domain.into();
        self
    }

    pub fn with_allowed_base_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_base_domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Load from environment variables (`KOMMO_CLIENT_ID`, `KOMMO_CLIENT_SECRET`, ...).
    pub fn from_env() -> Result<Self, BridgeError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup using the `KOMMO_*` variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BridgeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| BridgeError::Configuration(format!("{key} is not set")))
        };

        let mut config = Self::new(
            required("KOMMO_CLIENT_ID")?,
            required("KOMMO_CLIENT_SECRET")?,
            required("KOMMO_REDIRECT_URI")?,
        );

        if let Some(domain) = lookup("KOMMO_TARGET_DOMAIN") {
            config.target_domain = domain;
        }
        if let Some(domains) = lookup("KOMMO_ALLOWED_BASE_DOMAINS") {
            config.allowed_base_domains = domains
                .split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(path) = lookup("KOMMO_TOKENS_FILE") {
            config.tokens_file = PathBuf::from(path);
        }
        if let Some(url) = lookup("KOMMO_RENEW_URL") {
            config.renew_url = url;
        }
        if let Some(locale) = lookup("KOMMO_LOCALE") {
            config.locale = Locale::from_str(&locale).map_err(|_| {
                BridgeError::Configuration(format!("Unsupported locale: {locale}"))
            })?;
        }
        if let Some(addr) = lookup("KOMMO_BIND_ADDR") {
            config.bind_addr = addr;
        }
        if let Some(secs) = lookup("KOMMO_HTTP_TIMEOUT_SECS") {
            config.http_timeout_secs = secs.parse().map_err(|_| {
                BridgeError::Configuration(format!("Invalid KOMMO_HTTP_TIMEOUT_SECS: {secs}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BridgeError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|err| {
            BridgeError::Configuration(format!("Cannot read {}: {err}", path.display()))
        })?;
        let config: Self = toml::from_str(&raw).map_err(|err| {
            BridgeError::Configuration(format!("Invalid config {}: {err}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BridgeError> {
        for (field, value) in [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("redirect_uri", &self.redirect_uri),
            ("target_domain", &self.target_domain),
        ] {
            if value.trim().is_empty() {
                return Err(BridgeError::Configuration(format!("{field} must not be empty")));
            }
        }
        if self.http_timeout_secs == 0 {
            return Err(BridgeError::Configuration(
                "http_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

fn default_target_domain() -> String {
    DEFAULT_TARGET_DOMAIN.to_string()
}

fn default_tokens_file() -> PathBuf {
    PathBuf::from(DEFAULT_TOKENS_FILE)
}

fn default_renew_url() -> String {
    DEFAULT_RENEW_URL.to_string()
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_http_timeout_secs() -> u64 {
    DEFAULT_HTTP_TIMEOUT_SECS
}
