use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::api::CreatedUser;
use crate::auth::{AuthOutcome, AuthorizeParams};
use crate::catalog::CatalogView;
use crate::error::BridgeError;

use super::session::BoundSession;
use super::AppState;

/// `?name=` selecting the account whose token is used.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountQuery {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddUserResponse {
    pub created: Vec<u64>,
}

impl From<Vec<CreatedUser>> for AddUserResponse {
    fn from(users: Vec<CreatedUser>) -> Self {
        Self {
            created: users.into_iter().map(|u| u.id).collect(),
        }
    }
}

/// `GET /auth`
pub async fn authorize(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<AuthorizeParams>,
) -> Result<(CookieJar, Response), BridgeError> {
    run_authorize(&state, jar, params).await
}

/// `GET /token/renew?name=` - target of the recovery link.
pub async fn renew_token(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<AccountQuery>,
) -> Result<(CookieJar, Response), BridgeError> {
    let params = AuthorizeParams {
        name: Some(query.name),
        ..Default::default()
    };
    run_authorize(&state, jar, params).await
}

async fn run_authorize(
    state: &AppState,
    jar: CookieJar,
    params: AuthorizeParams,
) -> Result<(CookieJar, Response), BridgeError> {
    let sessions = state.sessions.as_ref();
    let mut bound = BoundSession::resolve(&jar, sessions);
    let outcome = match state.flow.authorize(&mut bound.session, params).await {
        Ok(outcome) => outcome,
        Err(err) => {
            // Existing sessions are stored even on failure: the spent state must not come back.
            if !bound.fresh {
                sessions.put(&bound.id, bound.session);
            }
            return Err(err.into());
        }
    };
    Ok(match outcome {
        AuthOutcome::Redirect(url) => (
            bound.commit(sessions, jar),
            Redirect::to(&url).into_response(),
        ),
        AuthOutcome::Button(html) => (bound.commit(sessions, jar), Html(html).into_response()),
        AuthOutcome::Authorized { name } => {
            (bound.finish(sessions, jar), name.into_response())
        }
    })
}

/// `GET /deals/:lead_id/products?name=`
pub async fn deal_products(
    State(state): State<AppState>,
    Path(lead_id): Path<u64>,
    Query(query): Query<AccountQuery>,
) -> Response {
    let view = state.catalog.view(&query.name, lead_id).await;
    let status = match &view {
        CatalogView::Table(_) => StatusCode::OK,
        CatalogView::NoProducts(_) => StatusCode::NOT_FOUND,
        CatalogView::Reauthorize(_) => StatusCode::UNAUTHORIZED,
        CatalogView::Failed(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Html(view.html().to_string())).into_response()
}

/// `POST /users?name=`
pub async fn add_user(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> Result<Json<AddUserResponse>, BridgeError> {
    let created = state.provisioning.add_user(&query.name).await?;
    Ok(Json(created.into()))
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}
