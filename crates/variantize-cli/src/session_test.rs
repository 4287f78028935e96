//! Session preparation tests against a wiremock catalog.

use std::path::PathBuf;

use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use variantize_core::AppConfig;
use variantize_pim::PimClient;

use crate::selection::Selection;
use crate::session::prepare;

fn test_config() -> AppConfig {
    AppConfig {
        pim_api_url: "http://unused.example.com".to_owned(),
        pim_api_token: "test-token".to_owned(),
        log_level: "info".to_owned(),
        selection_path: PathBuf::from("./selection.yaml"),
        request_timeout_secs: 30,
        user_agent: "variantize-test/0.1".to_owned(),
        max_concurrent_fetches: 4,
        option_page_limit: 100,
    }
}

fn test_client(base_url: &str) -> PimClient {
    PimClient::with_base_url(base_url, "test-token", 30, "variantize-test/0.1")
        .expect("client construction should not fail")
}

fn selection(uuids: &[Uuid], family_variant: &str) -> Selection {
    let yaml = format!(
        "products:\n{}family_variant: {family_variant}\nroot_code: tees_root\n",
        uuids
            .iter()
            .map(|u| format!("  - {u}\n"))
            .collect::<String>()
    );
    crate::selection::parse_selection(&yaml).expect("selection should parse")
}

async fn mock_product(server: &MockServer, n: u128, identifier: &str, color: &str) {
    let uuid = Uuid::from_u128(n);
    let body = serde_json::json!({
        "uuid": uuid,
        "identifier": identifier,
        "family": "shirts",
        "parent": null,
        "categories": [],
        "values": {
            "color": [ { "locale": null, "scope": null, "data": color } ]
        }
    });
    Mock::given(method("GET"))
        .and(path(format!("/api/rest/v1/products-uuid/{uuid}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

async fn mock_family_variants(server: &MockServer) {
    let body = serde_json::json!({
        "items": [
            {
                "code": "shirts_by_color",
                "labels": { "en_US": "By color" },
                "variant_attribute_sets": [
                    { "level": 1, "axes": ["color"], "attributes": ["color"] }
                ]
            }
        ]
    });
    Mock::given(method("GET"))
        .and(path("/api/rest/v1/families/shirts/variants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn prepare_builds_a_validated_session() {
    let server = MockServer::start().await;
    mock_product(&server, 1, "tee-red", "red").await;
    mock_product(&server, 2, "tee-blue", "blue").await;
    mock_family_variants(&server).await;

    let client = test_client(&server.uri());
    let sel = selection(&[Uuid::from_u128(1), Uuid::from_u128(2)], "shirts_by_color");
    let session = prepare(&client, &test_config(), &sel)
        .await
        .expect("session should prepare");

    assert_eq!(session.family, "shirts");
    assert_eq!(session.family_variant_code, "shirts_by_color");
    assert_eq!(session.plan.root_code, "tees_root");
    assert!(session.schema.is_one_level());
    // Selection order is preserved regardless of fetch completion order.
    assert_eq!(session.products[0].identifier.as_deref(), Some("tee-red"));
    assert_eq!(session.products[1].identifier.as_deref(), Some("tee-blue"));
    // Axis table seeded from stored values.
    assert_eq!(
        session.axis_values.get(Uuid::from_u128(1), "color"),
        Some("red")
    );
}

#[tokio::test]
async fn prepare_rejects_unknown_family_variant() {
    let server = MockServer::start().await;
    mock_product(&server, 1, "tee-red", "red").await;
    mock_family_variants(&server).await;

    let client = test_client(&server.uri());
    let sel = selection(&[Uuid::from_u128(1)], "shirts_by_size");
    let err = prepare(&client, &test_config(), &sel)
        .await
        .expect_err("unknown variant must fail");
    let msg = format!("{err:#}");
    assert!(msg.contains("shirts_by_size"), "got: {msg}");
    assert!(msg.contains("shirts_by_color"), "available codes listed: {msg}");
}

#[tokio::test]
async fn prepare_gates_on_duplicate_axis_combinations() {
    let server = MockServer::start().await;
    mock_product(&server, 1, "tee-a", "red").await;
    mock_product(&server, 2, "tee-b", "red").await;
    mock_family_variants(&server).await;

    let client = test_client(&server.uri());
    let sel = selection(&[Uuid::from_u128(1), Uuid::from_u128(2)], "shirts_by_color");
    let err = prepare(&client, &test_config(), &sel)
        .await
        .expect_err("duplicate combinations must gate");
    let msg = format!("{err:#}");
    assert!(
        msg.contains("duplicate axis value combinations"),
        "got: {msg}"
    );
    assert!(msg.contains("red"), "got: {msg}");
}

#[tokio::test]
async fn prepare_applies_axis_overrides_from_selection() {
    let server = MockServer::start().await;
    mock_product(&server, 1, "tee-a", "red").await;
    mock_product(&server, 2, "tee-b", "red").await;
    mock_family_variants(&server).await;

    let client = test_client(&server.uri());
    // The file overrides tee-b's color, resolving the duplicate.
    let yaml = format!(
        "products:\n  - {}\n  - {}\n\
         family_variant: shirts_by_color\n\
         root_code: tees_root\n\
         axis_values:\n  {}:\n    color: crimson\n",
        Uuid::from_u128(1),
        Uuid::from_u128(2),
        Uuid::from_u128(2),
    );
    let sel = crate::selection::parse_selection(&yaml).expect("selection should parse");
    let session = prepare(&client, &test_config(), &sel)
        .await
        .expect("override should resolve the duplicate");
    assert_eq!(
        session.axis_values.get(Uuid::from_u128(2), "color"),
        Some("crimson")
    );
}

#[tokio::test]
async fn prepare_gates_on_products_with_parents() {
    let server = MockServer::start().await;
    let uuid = Uuid::from_u128(1);
    let body = serde_json::json!({
        "uuid": uuid,
        "identifier": "tee-a",
        "family": "shirts",
        "parent": "some_model",
        "categories": [],
        "values": {}
    });
    Mock::given(method("GET"))
        .and(path(format!("/api/rest/v1/products-uuid/{uuid}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let sel = selection(&[uuid], "shirts_by_color");
    let err = prepare(&client, &test_config(), &sel)
        .await
        .expect_err("parented product must gate");
    let msg = format!("{err:#}");
    assert!(msg.contains("already has a parent"), "got: {msg}");
    assert!(msg.contains("some_model"), "got: {msg}");
}
