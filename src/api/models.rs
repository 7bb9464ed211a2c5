//! Request and response shapes of the Kommo `/api/v4` endpoints used here.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// HAL-style `_embedded` wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct Embedded<T> {
    #[serde(rename = "_embedded")]
    pub embedded: T,
}

/// A deal (lead) as returned with `?with=catalog_elements`.
#[derive(Debug, Clone, Deserialize)]
pub struct Lead {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "_embedded", default)]
    pub embedded: LeadEmbedded,
}

impl Lead {
    pub fn catalog_elements(&self) -> &[LinkedCatalogElement] {
        &self.embedded.catalog_elements
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadEmbedded {
    #[serde(default)]
    pub catalog_elements: Vec<LinkedCatalogElement>,
}

/// Line item linking a deal to a catalog element.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkedCatalogElement {
    pub id: u64,
    pub metadata: LinkMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkMetadata {
    pub catalog_id: u64,
    #[serde(default)]
    pub quantity: Option<serde_json::Number>,
}

/// A catalog element (product).
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogElement {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub custom_fields_values: Option<Vec<CustomFieldValues>>,
}

impl CatalogElement {
    /// First value of the custom field at `index`, rendered as text.
    ///
    /// Missing fields or values yield an empty string.
    pub fn field_text(&self, index: usize) -> String {
        self.custom_fields_values
            .as_ref()
            .and_then(|fields| fields.get(index))
            .and_then(|field| field.values.first())
            .map(|value| value_text(&value.value))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomFieldValues {
    #[serde(default)]
    pub field_id: Option<u64>,
    #[serde(default)]
    pub field_name: Option<String>,
    #[serde(default)]
    pub values: Vec<CustomFieldValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomFieldValue {
    #[serde(default)]
    pub value: serde_json::Value,
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Permission level for one action on one module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum RightLevel {
    /// Full access.
    #[serde(rename = "A")]
    #[strum(serialize = "A")]
    Full,
    /// Access limited to the user's group.
    #[serde(rename = "G")]
    #[strum(serialize = "G")]
    Group,
    /// Access only to entities the user is responsible for.
    #[serde(rename = "M")]
    #[strum(serialize = "M")]
    OnlyResponsible,
    #[serde(rename = "D")]
    #[strum(serialize = "D")]
    Denied,
}

/// Per-action rights on a module (leads, contacts, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct ModuleRights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add: Option<RightLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<RightLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit: Option<RightLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<RightLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<RightLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
pub struct UserRights {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads: Option<ModuleRights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts: Option<ModuleRights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<ModuleRights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<ModuleRights>,
    #[builder(default)]
    pub mail_access: bool,
    #[builder(default)]
    pub catalog_access: bool,
    #[builder(default)]
    pub is_admin: bool,
}

/// Body item of `POST /api/v4/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
pub struct NewUser {
    #[builder(into)]
    pub name: String,
    #[builder(into)]
    pub email: String,
    #[builder(into)]
    pub password: String,
    #[builder(into)]
    pub lang: String,
    pub rights: UserRights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsersEmbedded {
    #[serde(default)]
    pub users: Vec<CreatedUser>,
}

/// A user returned from `POST /api/v4/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedUser {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
