//! Typed client for the Kommo REST API (`/api/v4`).

pub mod models;

pub use models::{
    CatalogElement, CreatedUser, Lead, LinkedCatalogElement, ModuleRights, NewUser, RightLevel,
    UserRights,
};

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{AccountToken, TokenStore};
use crate::error::{BridgeError, Result};
use crate::util::http::{base_url, bearer_headers, status_to_error};

use models::{Embedded, UsersEmbedded};

/// Client bound to one account's base domain and access token.
#[derive(Debug, Clone)]
pub struct KommoClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl KommoClient {
    pub fn new(http: reqwest::Client, token: &AccountToken) -> Self {
        Self {
            http,
            base_url: base_url(&token.base_domain),
            access_token: token.access_token.clone(),
        }
    }

    /// Load the stored token for `account` and bind a client to it.
    ///
    /// Fails with [`BridgeError::MissingToken`] when nothing is stored and
    /// [`BridgeError::TokenExpired`] when the stored token is past its expiry.
    pub fn for_account(
        http: reqwest::Client,
        store: &dyn TokenStore,
        account: &str,
    ) -> Result<Self> {
        let token = store
            .load(account)?
            .ok_or_else(|| BridgeError::MissingToken(account.to_string()))?;
        if token.has_expired() {
            return Err(BridgeError::TokenExpired(account.to_string()));
        }
        Ok(Self::new(http, &token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/v4/leads/{id}?with=catalog_elements`
    pub async fn lead_with_catalog_elements(&self, lead_id: u64) -> Result<Lead> {
        self.get_json(
            &format!("/api/v4/leads/{lead_id}"),
            &[("with", "catalog_elements")],
        )
        .await
    }

    /// `GET /api/v4/catalogs/{catalog_id}/elements/{element_id}`
    pub async fn catalog_element(&self, catalog_id: u64, element_id: u64) -> Result<CatalogElement> {
        self.get_json(
            &format!("/api/v4/catalogs/{catalog_id}/elements/{element_id}"),
            &[],
        )
        .await
    }

    /// `POST /api/v4/users`
    pub async fn add_users(&self, users: &[NewUser]) -> Result<Vec<CreatedUser>> {
        let created: Embedded<UsersEmbedded> = self.post_json("/api/v4/users", users).await?;
        Ok(created.embedded.users)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(&url)
            .headers(bearer_headers(&self.access_token))
            .query(query)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%url, "POST");
        let resp = self
            .http
            .post(&url)
            .headers(bearer_headers(&self.access_token))
            .json(body)
            .send()
            .await?;
        Self::decode(resp).await
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        // Kommo answers 204 for entities that do not exist.
        if status == StatusCode::NO_CONTENT {
            return Err(BridgeError::api(status.as_u16(), "empty response"));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body));
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
