//! Creates the integration's service user in a connected account.

use std::sync::Arc;

use crate::api::{CreatedUser, KommoClient, ModuleRights, NewUser, RightLevel, UserRights};
use crate::auth::TokenStore;
use crate::error::Result;

pub struct ProvisioningService {
    http: reqwest::Client,
    store: Arc<dyn TokenStore>,
}

impl ProvisioningService {
    pub fn new(http: reqwest::Client, store: Arc<dyn TokenStore>) -> Self {
        Self { http, store }
    }

    /// Submit [`service_user`] to the account stored under `account`.
    pub async fn add_user(&self, account: &str) -> Result<Vec<CreatedUser>> {
        let client = KommoClient::for_account(self.http.clone(), self.store.as_ref(), account)?;
        let created = client.add_users(&[service_user()]).await.inspect_err(|err| {
            tracing::warn!(account, error = %err, "user creation failed");
        })?;
        tracing::info!(
            account,
            ids = ?created.iter().map(|u| u.id).collect::<Vec<_>>(),
            "service user created"
        );
        Ok(created)
    }
}

/// The fixed user every connected account receives.
pub fn service_user() -> NewUser {
    NewUser::builder()
        .name("emfy")
        .email("test@emfy.com")
        .password("1234")
        .lang("en")
        .rights(service_rights())
        .build()
}

fn service_rights() -> UserRights {
    let entity = || {
        ModuleRights::builder()
            .add(RightLevel::Denied)
            .view(RightLevel::OnlyResponsible)
            .delete(RightLevel::Full)
            .export(RightLevel::OnlyResponsible)
            .edit(RightLevel::Full)
            .build()
    };
    UserRights::builder()
        .leads(entity())
        .companies(entity())
        .contacts(entity())
        .tasks(
            ModuleRights::builder()
                .delete(RightLevel::Full)
                .edit(RightLevel::Full)
                .build(),
        )
        .mail_access(false)
        .catalog_access(true)
        .is_admin(true)
        .build()
}
