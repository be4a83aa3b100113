//! End-to-end tests of the REST routes over a real socket

mod common;

use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{memory_config, spawn_app, spawn_seeded_app};

async fn get_json(url: &str) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.expect("request failed");
    let status = response.status();
    (status, response.json().await.expect("body is JSON"))
}

async fn send_json(method: reqwest::Method, url: &str, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .request(method, url)
        .json(&body)
        .send()
        .await
        .expect("request failed");
    let status = response.status();
    (status, response.json().await.expect("body is JSON"))
}

fn ids(body: &Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_client() {
    let base = spawn_seeded_app().await;

    let (status, body) = send_json(
        reqwest::Method::POST,
        &format!("{}/api/clients", base),
        json!({"name": "Ann Lee", "email": "a@x.com", "phone": "1234567890", "status": "Lead"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "Lead");
    assert_eq!(body["data"]["name"], "Ann Lee");
    assert!(!body["data"]["id"].as_str().unwrap().is_empty());
    assert!(body["data"]["lastContacted"].is_string());

    let id = body["data"]["id"].as_str().unwrap();
    let (status, fetched) = get_json(&format!("{}/api/clients/{}", base, id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["email"], "a@x.com");
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let base = spawn_seeded_app().await;
    let payload = json!({
        "date": "2024-03-01T00:00:00Z",
        "description": "Staging fee",
        "category": "Expense",
        "amount": -400,
        "type": "Expense"
    });

    let (_, first) = send_json(reqwest::Method::POST, &format!("{}/api/transactions", base), payload.clone()).await;
    let (_, second) = send_json(reqwest::Method::POST, &format!("{}/api/transactions", base), payload).await;

    assert_ne!(first["data"]["id"], second["data"]["id"]);
    assert_eq!(first["data"]["type"], "Expense");
    assert_eq!(first["data"]["amount"], -400.0);
}

#[tokio::test]
async fn test_status_only_update_keeps_other_fields() {
    let base = spawn_seeded_app().await;
    // Listing seeds the table
    let (status, _) = get_json(&format!("{}/api/clients", base)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        reqwest::Method::PUT,
        &format!("{}/api/clients/cli-2", base),
        json!({"status": "Active"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "Active");
    assert_eq!(body["data"]["name"], "Jane Smith");
    assert_eq!(body["data"]["email"], "jane.smith@example.com");
    assert_eq!(body["data"]["phone"], "098-765-4321");
    assert_ne!(body["data"]["updatedAt"], body["data"]["createdAt"]);
}

#[tokio::test]
async fn test_paging_walks_every_row_once() {
    let base = spawn_seeded_app().await;

    let (_, first) = get_json(&format!("{}/api/clients?limit=2", base)).await;
    assert_eq!(ids(&first), vec!["cli-1", "cli-2"]);
    let mut next = first["data"]["next"].as_str().map(str::to_string);
    assert!(next.is_some());

    let mut seen = ids(&first);
    while let Some(cursor) = next {
        let (status, page) =
            get_json(&format!("{}/api/clients?limit=2&cursor={}", base, cursor)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(ids(&page).len() <= 2);
        seen.extend(ids(&page));
        next = page["data"]["next"].as_str().map(str::to_string);
    }

    assert_eq!(seen, vec!["cli-1", "cli-2", "cli-3", "cli-4", "cli-5"]);
}

#[tokio::test]
async fn test_limit_parsing() {
    let base = spawn_seeded_app().await;

    let (_, body) = get_json(&format!("{}/api/clients?limit=abc", base)).await;
    assert_eq!(ids(&body).len(), 1);

    let (_, body) = get_json(&format!("{}/api/clients?limit=500", base)).await;
    assert_eq!(ids(&body).len(), 5);
    assert!(body["data"]["next"].is_null());

    let (_, body) = get_json(&format!("{}/api/properties", base)).await;
    assert_eq!(ids(&body).len(), 4);
    assert!(body["data"]["next"].is_null());
}

#[tokio::test]
async fn test_bad_cursor_is_rejected() {
    let base = spawn_seeded_app().await;
    // "nopipe": decodes, but has no separator
    let (status, body) = get_json(&format!("{}/api/contracts?cursor=bm9waXBl", base)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Invalid cursor"));
}

#[tokio::test]
async fn test_validation_errors() {
    let base = spawn_seeded_app().await;

    let (status, body) = send_json(
        reqwest::Method::POST,
        &format!("{}/api/clients", base),
        json!({"name": "A", "email": "not-an-email", "phone": "123"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    for field in ["name", "email", "phone", "status"] {
        assert!(error.contains(field), "{} missing from {}", field, error);
    }

    let (status, body) = send_json(
        reqwest::Method::POST,
        &format!("{}/api/properties", base),
        json!({
            "name": "Lake House",
            "address": "1 Shore Rd, Laketown",
            "price": 500000,
            "status": "Archived",
            "imageUrl": "https://example.com/a.jpg",
            "bedrooms": 3,
            "bathrooms": 2,
            "sqft": 1800
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("invalid JSON body"));
    assert!(error.contains("Archived"));
}

#[tokio::test]
async fn test_missing_records() {
    let base = spawn_seeded_app().await;

    let (status, body) = get_json(&format!("{}/api/clients/nope", base)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "error": "not found"}));

    let (status, _) = send_json(
        reqwest::Method::PUT,
        &format!("{}/api/properties/nope", base),
        json!({"price": 10}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Payload is checked before the lookup
    let (status, _) = send_json(
        reqwest::Method::PUT,
        &format!("{}/api/properties/nope", base),
        json!({"price": -10}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get_json(&format!("{}/api/nothing-here", base)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_delete_reports_whether_a_row_went() {
    let base = spawn_seeded_app().await;
    get_json(&format!("{}/api/contracts", base)).await;

    let url = format!("{}/api/contracts/con-1", base);
    let (status, body) = send_json(reqwest::Method::DELETE, &url, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"id": "con-1", "deleted": true}));

    let (status, body) = send_json(reqwest::Method::DELETE, &url, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"id": "con-1", "deleted": false}));

    let (status, _) = get_json(&url).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seeding_can_be_disabled() {
    let mut config = memory_config();
    config.seed.on_list = false;
    let base = spawn_app(config).await;

    let (status, body) = get_json(&format!("{}/api/clients", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"items": [], "next": null}));
}

#[tokio::test]
async fn test_dashboard_and_health() {
    let base = spawn_seeded_app().await;

    let (status, body) = get_json(&format!("{}/api/dashboard", base)).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["totalRevenue"], 41_000.0);
    assert_eq!(data["newLeads"], 2);
    assert_eq!(data["activeListings"], 2);
    assert_eq!(data["contractsPending"], 1);
    assert_eq!(data["monthly"][9], json!({"name": "Oct", "sales": 1, "revenue": 36_000.0}));

    let (status, body) = get_json(&format!("{}/api/health", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

/// Every submitted field comes back unchanged; numbers compare by value
fn assert_fields_kept(sent: &Value, got: &Value) {
    for (field, expected) in sent.as_object().expect("payload object") {
        let actual = &got[field];
        match (expected.as_f64(), actual.as_f64()) {
            (Some(e), Some(a)) => assert_eq!(e, a, "field {}", field),
            _ => assert_eq!(expected, actual, "field {}", field),
        }
    }
}

async fn create_then_get(base: &str, resource: &str, payload: Value) -> Value {
    let (status, created) =
        send_json(reqwest::Method::POST, &format!("{}/api/{}", base, resource), payload.clone()).await;
    assert_eq!(status, StatusCode::OK, "{}", created);
    assert_fields_kept(&payload, &created["data"]);

    let id = created["data"]["id"].as_str().expect("id").to_string();
    let (status, fetched) = get_json(&format!("{}/api/{}/{}", base, resource, id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_fields_kept(&payload, &fetched["data"]);
    assert_eq!(created["data"], fetched["data"]);
    fetched["data"].clone()
}

#[tokio::test]
async fn test_round_trip_every_entity() {
    let base = spawn_seeded_app().await;

    create_then_get(
        &base,
        "clients",
        json!({"name": "Ann Lee", "email": "a@x.com", "phone": "1234567890", "status": "Active"}),
    )
    .await;

    create_then_get(
        &base,
        "properties",
        json!({
            "name": "Lake House",
            "address": "1 Shore Rd, Laketown",
            "price": 525000.5,
            "status": "Pending",
            "imageUrl": "https://example.com/lake.jpg",
            "bedrooms": 3,
            "bathrooms": 0,
            "sqft": 1800
        }),
    )
    .await;

    let transaction = create_then_get(
        &base,
        "transactions",
        json!({
            "date": "2024-03-01T00:00:00Z",
            "description": "Commission on Lake House",
            "category": "Commission",
            "amount": 15750,
            "type": "Income"
        }),
    )
    .await;
    assert!(transaction.get("kind").is_none());

    let signed = create_then_get(
        &base,
        "contracts",
        json!({
            "propertyId": "prop-1",
            "clientId": "cli-2",
            "status": "Signed",
            "signingDate": "2024-04-02T10:30:00Z",
            "expiryDate": "2024-05-01T00:00:00Z",
            "amount": 750000
        }),
    )
    .await;
    assert_eq!(signed["signingDate"], "2024-04-02T10:30:00Z");

    let draft = create_then_get(
        &base,
        "contracts",
        json!({
            "propertyId": "prop-9",
            "clientId": "cli-9",
            "status": "Draft",
            "expiryDate": "2024-06-01T00:00:00Z",
            "amount": 100
        }),
    )
    .await;
    assert!(draft["signingDate"].is_null());
}

#[tokio::test]
async fn test_numeric_strings_are_accepted() {
    let base = spawn_seeded_app().await;

    let (status, body) = send_json(
        reqwest::Method::POST,
        &format!("{}/api/properties", base),
        json!({
            "name": "Lake House",
            "address": "1 Shore Rd, Laketown",
            "price": "500000",
            "status": "For Sale",
            "imageUrl": "https://example.com/a.jpg",
            "bedrooms": "3",
            "bathrooms": 2,
            "sqft": "1800"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["price"], 500_000.0);
    assert_eq!(body["data"]["bedrooms"], 3);
    assert_eq!(body["data"]["sqft"], 1800);

    let id = body["data"]["id"].as_str().unwrap();
    let (status, body) = send_json(
        reqwest::Method::PUT,
        &format!("{}/api/properties/{}", base, id),
        json!({"price": "612000.25"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 612_000.25);
    assert_eq!(body["data"]["bedrooms"], 3);

    let (status, body) = send_json(
        reqwest::Method::PUT,
        &format!("{}/api/properties/{}", base, id),
        json!({"sqft": "large"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_repeated_query_keys_use_the_first_value() {
    let base = spawn_seeded_app().await;

    let (status, body) = get_json(&format!("{}/api/clients?limit=1&limit=2", base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body).len(), 1);
    assert!(body["data"]["next"].is_string());
}

#[tokio::test]
async fn test_unsupported_method_gets_an_envelope() {
    let base = spawn_seeded_app().await;

    let (status, body) = send_json(
        reqwest::Method::PATCH,
        &format!("{}/api/clients/cli-1", base),
        json!({"status": "Active"}),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body, json!({"success": false, "error": "method not allowed"}));

    let (status, body) = send_json(reqwest::Method::DELETE, &format!("{}/api/dashboard", base), json!({})).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["success"], false);
}
