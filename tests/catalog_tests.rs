mod support;

use std::sync::Arc;

use kommo_bridge::auth::{MemoryTokenStore, TokenStore};
use kommo_bridge::catalog::{CatalogService, CatalogView, ProductRow};
use kommo_bridge::error::BridgeError;
use kommo_bridge::messages::Locale;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn catalog(store: Arc<MemoryTokenStore>) -> CatalogService {
    CatalogService::new(reqwest::Client::new(), store, Locale::En, "/token/renew")
}

async fn mount_lead(server: &MockServer, lead_id: u64, elements: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v4/leads/{lead_id}")))
        .and(query_param("with", "catalog_elements"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": lead_id,
            "name": "Deal",
            "_embedded": { "catalog_elements": elements }
        })))
        .mount(server)
        .await;
}

fn widget() -> serde_json::Value {
    json!({
        "id": 77,
        "name": "Widget",
        "custom_fields_values": [
            { "field_id": 1, "values": [{ "value": "W-77" }] },
            { "field_id": 2, "values": [{ "value": "ignored" }] },
            { "field_id": 3, "values": [{ "value": 1250 }] }
        ]
    })
}

#[tokio::test]
async fn one_linked_element_renders_one_row() {
    let server = MockServer::start().await;
    mount_lead(
        &server,
        10,
        json!([{ "id": 77, "metadata": { "catalog_id": 5, "quantity": 3 } }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/catalogs/5/elements/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget()))
        .expect(2)
        .mount(&server)
        .await;

    let service = catalog(support::store_for("acme", &server));
    let rows = service.deal_products("acme", 10).await.expect("rows");
    assert_eq!(
        rows,
        vec![ProductRow {
            name: "Widget".to_string(),
            sku: "W-77".to_string(),
            price: "1250".to_string(),
            quantity: "3".to_string(),
        }]
    );

    let CatalogView::Table(html) = service.view("acme", 10).await else {
        panic!("expected a table");
    };
    assert_eq!(html.matches("<tr><td>Widget").count(), 1);
    assert!(html.contains("<td>3</td></tr>"));
    assert!(html.starts_with("<table>\n<tr><td>Name</td>"));
}

#[tokio::test]
async fn each_line_item_fetches_its_element() {
    let server = MockServer::start().await;
    mount_lead(
        &server,
        11,
        json!([
            { "id": 77, "metadata": { "catalog_id": 5, "quantity": 1 } },
            { "id": 78, "metadata": { "catalog_id": 6, "quantity": 2.5 } }
        ]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/catalogs/5/elements/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/catalogs/6/elements/78"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 78,
            "name": "Gadget",
            "custom_fields_values": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let rows = catalog(support::store_for("acme", &server))
        .deal_products("acme", 11)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].name, "Gadget");
    assert_eq!(rows[1].sku, "");
    assert_eq!(rows[1].price, "");
    assert_eq!(rows[1].quantity, "2.5");
}

#[tokio::test]
async fn deal_without_elements_has_no_products() {
    let server = MockServer::start().await;
    mount_lead(&server, 12, json!([])).await;

    let service = catalog(support::store_for("acme", &server));
    let view = service.view("acme", 12).await;

    assert_eq!(view, CatalogView::NoProducts(Locale::En.no_products().to_string()));
    assert!(!view.html().contains("<tr>"));
}

#[tokio::test]
async fn rejected_token_offers_renew_link() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/leads/13"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "title": "Unauthorized",
            "detail": "Token has expired"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let service = catalog(support::store_for("acme", &server));
    let err = service.deal_products("acme", 13).await.unwrap_err();
    assert!(err.requires_reauthorization());

    let CatalogView::Reauthorize(html) = service.view("acme", 13).await else {
        panic!("expected reauthorize view");
    };
    assert!(html.contains("<a href='/token/renew?name=acme'>"));
}

#[tokio::test]
async fn server_error_shows_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/leads/14"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let service = catalog(support::store_for("acme", &server));
    match service.deal_products("acme", 14).await.unwrap_err() {
        BridgeError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected Api, got {other:?}"),
    }
    assert!(matches!(
        service.view("acme", 14).await,
        CatalogView::Failed(_)
    ));
}

#[tokio::test]
async fn expired_token_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::new());
    store
        .save("acme", &support::expired_token(&server.uri()))
        .unwrap();
    let service = catalog(store);

    assert!(matches!(
        service.deal_products("acme", 1).await,
        Err(BridgeError::TokenExpired(_))
    ));
    assert!(matches!(
        service.view("acme", 1).await,
        CatalogView::Reauthorize(_)
    ));
}

#[tokio::test]
async fn unknown_account_needs_authorization() {
    let service = catalog(Arc::new(MemoryTokenStore::new()));
    assert!(matches!(
        service.deal_products("ghost", 1).await,
        Err(BridgeError::MissingToken(name)) if name == "ghost"
    ));
}

#[tokio::test]
async fn russian_locale_uses_russian_notice() {
    let server = MockServer::start().await;
    mount_lead(&server, 15, json!([])).await;

    let service = CatalogService::new(
        reqwest::Client::new(),
        support::store_for("acme", &server),
        Locale::Ru,
        "/token/renew",
    );
    let view = service.view("acme", 15).await;
    assert_eq!(view.html(), Locale::Ru.no_products());
}

#[tokio::test]
async fn whole_decimal_quantity_renders_without_fraction() {
    let server = MockServer::start().await;
    mount_lead(
        &server,
        16,
        json!([{ "id": 77, "metadata": { "catalog_id": 5, "quantity": 3.0 } }]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/catalogs/5/elements/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(widget()))
        .mount(&server)
        .await;

    let service = catalog(support::store_for("acme", &server));
    let CatalogView::Table(html) = service.view("acme", 16).await else {
        panic!("expected a table");
    };
    assert!(html.contains("<td>1250</td><td>3</td></tr>"));
}
