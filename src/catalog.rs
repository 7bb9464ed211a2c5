//! Products attached to a deal, rendered as an HTML table.

use std::sync::Arc;

use crate::api::KommoClient;
use crate::auth::TokenStore;
use crate::error::{BridgeError, Result};
use crate::messages::Locale;
use crate::util::html::escape;

/// Position of the SKU custom field on a catalog element.
pub const SKU_FIELD_INDEX: usize = 0;
/// Position of the price custom field on a catalog element.
pub const PRICE_FIELD_INDEX: usize = 2;

/// One rendered line of the products table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRow {
    pub name: String,
    pub sku: String,
    pub price: String,
    pub quantity: String,
}

/// Result of a products lookup, ready to send to the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    Table(String),
    NoProducts(String),
    /// Token missing, expired or rejected; carries the recovery link.
    Reauthorize(String),
    Failed(String),
}

impl CatalogView {
    pub fn html(&self) -> &str {
        match self {
            Self::Table(html)
            | Self::NoProducts(html)
            | Self::Reauthorize(html)
            | Self::Failed(html) => html,
        }
    }
}

pub struct CatalogService {
    http: reqwest::Client,
    store: Arc<dyn TokenStore>,
    locale: Locale,
    renew_url: String,
}

impl CatalogService {
    pub fn new(
        http: reqwest::Client,
        store: Arc<dyn TokenStore>,
        locale: Locale,
        renew_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            store,
            locale,
            renew_url: renew_url.into(),
        }
    }

    /// Fetch the deal and each of its catalog elements, one request per line item.
    pub async fn deal_products(&self, account: &str, lead_id: u64) -> Result<Vec<ProductRow>> {
        let client = KommoClient::for_account(self.http.clone(), self.store.as_ref(), account)?;
        let lead = client.lead_with_catalog_elements(lead_id).await?;
        if lead.catalog_elements().is_empty() {
            return Err(BridgeError::NoProducts(lead_id));
        }

        let mut rows = Vec::with_capacity(lead.catalog_elements().len());
        for item in lead.catalog_elements() {
            let element = client
                .catalog_element(item.metadata.catalog_id, item.id)
                .await?;
            rows.push(ProductRow {
                name: element.name.clone(),
                sku: element.field_text(SKU_FIELD_INDEX),
                price: element.field_text(PRICE_FIELD_INDEX),
                quantity: item
                    .metadata
                    .quantity
                    .as_ref()
                    .map(quantity_text)
                    .unwrap_or_default(),
            });
        }
        Ok(rows)
    }

    /// Like [`Self::deal_products`] but maps every failure to a user-facing page.
    pub async fn view(&self, account: &str, lead_id: u64) -> CatalogView {
        match self.deal_products(account, lead_id).await {
            Ok(rows) => CatalogView::Table(render_table(&rows, self.locale)),
            Err(BridgeError::NoProducts(_)) => {
                CatalogView::NoProducts(escape(self.locale.no_products()))
            }
            Err(err) if err.requires_reauthorization() => {
                tracing::warn!(account, lead_id, error = %err, "token rejected");
                CatalogView::Reauthorize(self.renew_notice(account))
            }
            Err(err) => {
                tracing::warn!(account, lead_id, error = %err, "catalog lookup failed");
                CatalogView::Failed(escape(self.locale.contact_developer()))
            }
        }
    }

    fn renew_notice(&self, account: &str) -> String {
        format!(
            "{}<a href='{}'>{}</a>",
            escape(self.locale.token_error()),
            escape(&self.renew_href(account)),
            escape(self.locale.renew_token_link())
        )
    }

    fn renew_href(&self, account: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("name", account)
            .finish();
        let separator = if self.renew_url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.renew_url)
    }
}

/// Quantities are decimals in the API; whole values print without a fraction.
fn quantity_text(quantity: &serde_json::Number) -> String {
    match quantity.as_f64() {
        Some(value)
            if !quantity.is_i64()
                && !quantity.is_u64()
                && value.fract() == 0.0
                && value.abs() < 1e15 =>
        {
            format!("{}", value as i64)
        }
        _ => quantity.to_string(),
    }
}

/// Render the products table: one header row, then one row per product.
pub fn render_table(rows: &[ProductRow], locale: Locale) -> String {
    let mut html = String::from("<table>\n<tr>");
    for header in locale.table_headers() {
        html.push_str(&format!("<td>{}</td>", escape(header)));
    }
    html.push_str("</tr>\n");
    for row in rows {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&row.name),
            escape(&row.sku),
            escape(&row.price),
            escape(&row.quantity)
        ));
    }
    html.push_str("</table>");
    html
}
