//! Integration tests for the badge catalog.

use std::time::Duration;

use axum::{http::StatusCode, routing::get, Router};
use reqwest::Client;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::models::fixtures::badge_json;
use crate::models::LoadStatus;
use crate::view::InputRead;
use crate::{create_router, AppState};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Published document served by the fake badge source, keyed by badge id.
fn source_document() -> Value {
    let mut doc = Map::new();
    let records = [
        badge_json("b-cloud", "Cloud Fundamentals", Some(0.0), Some("Foundational"), Some("Learning")),
        badge_json("b-arch", "Cloud Architect", Some(50.0), Some("Advanced"), Some("Certification")),
        badge_json("b-data", "Data Analyst", None, Some("Intermediate"), None),
        badge_json("b-sec", "Security Basics", Some(0.0), None, Some("Learning")),
    ];
    for record in records {
        let id = record["id"].as_str().unwrap().to_string();
        doc.insert(id, record);
    }
    // One badge links to its global activity page.
    doc["b-arch"]["global_activity_url"] = json!("https://activity.example.com/b-arch");
    Value::Object(doc)
}

/// Spawn a fake badge source and return its base URL.
async fn spawn_source() -> String {
    let document = source_document().to_string();
    let app = Router::new()
        .route("/badges.json", get(move || async move { document }))
        .route(
            "/stalled.json",
            get(|| async {
                std::future::pending::<()>().await;
                "{}"
            }),
        )
        .route(
            "/broken.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
        )
        .route("/garbage.json", get(|| async { "<html>not json</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind source");
    let addr = listener.local_addr().expect("Failed to get source addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    state: AppState,
}

impl TestFixture {
    /// Catalog loaded from the fake source before the server starts.
    async fn new() -> Self {
        let fixture = Self::with_source("/badges.json", InputRead::Fresh).await;
        fixture.state.catalog.load().await.expect("Failed to load badges");
        fixture
    }

    async fn with_source(path: &str, search_input: InputRead) -> Self {
        let source_base = spawn_source().await;

        let config = Config {
            source_url: format!("{}{}", source_base, path),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_json: false,
            debounce: DEBOUNCE,
            fetch_timeout: None,
            search_input,
            view_idle_ttl: Duration::from_secs(600),
            max_views: 100,
        };

        let state = AppState::new(&config).expect("Failed to build state");
        let app = create_router(state.clone());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            state,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn put_json(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn open_view(&self) -> String {
        let resp = self.client.post(self.url("/api/views")).send().await.unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

fn ids(badges: &Value) -> Vec<&str> {
    badges
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_catalog_info_after_load() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/catalog").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "loaded");
    assert_eq!(body["data"]["total"], 4);
    assert_eq!(body["data"]["generation"], 1);
    assert_eq!(body["generation"], 1);
    assert!(body["data"]["loadedAt"].is_string());
}

#[tokio::test]
async fn test_badges_keep_source_order() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/badges").await;
    assert_eq!(status, 200);
    assert_eq!(
        ids(&body["data"]["badges"]),
        vec!["b-cloud", "b-arch", "b-data", "b-sec"]
    );
    assert_eq!(body["data"]["total"], 4);
    assert_eq!(body["data"]["matched"], 4);
}

#[tokio::test]
async fn test_facets() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/facets").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["costs"], json!([0, 50]));
    assert_eq!(
        body["data"]["levels"],
        json!(["Foundational", "Advanced", "Intermediate"])
    );
    assert_eq!(body["data"]["typeCategories"], json!(["Learning", "Certification"]));
}

#[tokio::test]
async fn test_badge_filters() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture.get_json("/api/badges?q=CLOUD").await;
    assert_eq!(ids(&body["data"]["badges"]), vec!["b-cloud", "b-arch"]);

    let (_, body) = fixture.get_json("/api/badges?cost=50").await;
    assert_eq!(ids(&body["data"]["badges"]), vec!["b-arch"]);

    let (_, body) = fixture
        .get_json("/api/badges?q=&cost=0&level=&type_category=Learning")
        .await;
    assert_eq!(ids(&body["data"]["badges"]), vec!["b-cloud", "b-sec"]);
    assert_eq!(body["data"]["matched"], 2);

    let (_, body) = fixture.get_json("/api/badges?q=cloud&level=Intermediate").await;
    assert!(body["data"]["badges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_get_badge() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/badges/b-data").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["name"], "Data Analyst");
    assert!(body["data"]["cost"].is_null());

    let (status, body) = fixture.get_json("/api/badges/missing").await;
    assert_eq!(status, 404);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_cards_call_to_action() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get_json("/api/cards?q=cloud").await;
    assert_eq!(status, 200);
    let cards = body["data"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(
        cards[0]["callToActionUrl"],
        "https://badges.example.com/org/badge/b-cloud"
    );
    assert_eq!(cards[1]["callToActionUrl"], "https://activity.example.com/b-arch");
    assert_eq!(cards[0]["issuer"], "Issued by Example Org");
    assert_eq!(cards[0]["skills"], "Networking, Security");
}

#[tokio::test]
async fn test_gallery_page() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/?type_category=Certification"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();

    assert!(html.contains(r#"data-badge-id="b-arch""#));
    assert!(!html.contains(r#"data-badge-id="b-cloud""#));
    assert!(html.contains(r#"<option value="Certification" selected>"#));
    assert!(html.contains(r#"href="https://activity.example.com/b-arch""#));
}

#[tokio::test]
async fn test_view_debounces_search() {
    let fixture = TestFixture::new().await;
    let view_id = fixture.open_view().await;
    let path = format!("/api/views/{}/search", view_id);

    for value in ["s", "se", "sec"] {
        let (status, body) = fixture.put_json(&path, json!({ "value": value })).await;
        assert_eq!(status, 200);
        assert_eq!(body["data"]["input"]["search"], value);
    }

    // Inside the window nothing has been filtered yet.
    let (_, body) = fixture.get_json(&format!("/api/views/{}", view_id)).await;
    assert_eq!(body["data"]["pending"], true);
    assert_eq!(body["data"]["passes"], 0);
    assert_eq!(body["data"]["badges"].as_array().unwrap().len(), 4);

    tokio::time::sleep(DEBOUNCE * 4).await;

    let (_, body) = fixture.get_json(&format!("/api/views/{}", view_id)).await;
    assert_eq!(body["data"]["pending"], false);
    assert_eq!(body["data"]["passes"], 1);
    assert_eq!(body["data"]["applied"]["search"], "sec");
    assert_eq!(ids(&body["data"]["badges"]), vec!["b-sec"]);
}

#[tokio::test]
async fn test_view_facet_filter_and_cards() {
    let fixture = TestFixture::new().await;
    let view_id = fixture.open_view().await;

    let (status, _) = fixture
        .put_json(
            &format!("/api/views/{}/filter", view_id),
            json!({ "field": "cost", "value": "50" }),
        )
        .await;
    assert_eq!(status, 200);
    tokio::time::sleep(DEBOUNCE * 4).await;

    let (status, body) = fixture
        .get_json(&format!("/api/views/{}/cards", view_id))
        .await;
    assert_eq!(status, 200);
    let cards = body["data"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"], "b-arch");

    let (status, body) = fixture
        .put_json(
            &format!("/api/views/{}/filter", view_id),
            json!({ "field": "price", "value": "50" }),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_view_with_stale_input() {
    let fixture = TestFixture::with_source("/badges.json", InputRead::Stale).await;
    fixture.state.catalog.load().await.unwrap();
    let view_id = fixture.open_view().await;
    let path = format!("/api/views/{}/search", view_id);

    for value in ["c", "cl", "clo"] {
        fixture.put_json(&path, json!({ "value": value })).await;
    }
    tokio::time::sleep(DEBOUNCE * 4).await;

    let (_, body) = fixture.get_json(&format!("/api/views/{}", view_id)).await;
    assert_eq!(body["data"]["passes"], 1);
    assert_eq!(body["data"]["input"]["search"], "clo");
    assert_eq!(body["data"]["applied"]["search"], "cl");
}

#[tokio::test]
async fn test_view_page_feeds_controls_as_triggers() {
    let fixture = TestFixture::new().await;
    let view_id = fixture.open_view().await;
    let page = fixture.url(&format!("/views/{}", view_id));

    // Query strings on the page itself do not change the view.
    let html = fixture
        .client
        .get(format!("{}?q=data", page))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(r#"method="post""#));
    assert!(!html.contains(r#"value="data""#));

    // Submitting the form redirects back to the page with the new input.
    let form = [("q", "data"), ("cost", ""), ("level", ""), ("type_category", "")];
    let resp = fixture.client.post(&page).form(&form).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.url().as_str().ends_with(&format!("/views/{}", view_id)));
    let html = resp.text().await.unwrap();
    assert!(html.contains(r#"value="data""#));

    tokio::time::sleep(DEBOUNCE * 4).await;

    let html = fixture.client.get(&page).send().await.unwrap().text().await.unwrap();
    assert!(html.contains(r#"data-badge-id="b-data""#));
    assert!(!html.contains(r#"data-badge-id="b-sec""#));

    let (_, body) = fixture.get_json(&format!("/api/views/{}", view_id)).await;
    assert_eq!(body["data"]["passes"], 1);
}

#[tokio::test]
async fn test_missing_view_page_is_html_404() {
    let fixture = TestFixture::new().await;

    for id in ["not-a-uuid", "00000000-0000-0000-0000-000000000000"] {
        let resp = fixture
            .client
            .get(fixture.url(&format!("/views/{}", id)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
        let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        assert!(resp.text().await.unwrap().contains("is not open"));
    }

    let resp = fixture
        .client
        .post(fixture.url("/views/not-a-uuid"))
        .form(&[("q", "data")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_view_delete() {
    let fixture = TestFixture::new().await;
    let view_id = fixture.open_view().await;

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/views/{}", view_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let (status, _) = fixture.get_json(&format!("/api/views/{}", view_id)).await;
    assert_eq!(status, 404);

    let (status, body) = fixture.get_json("/api/views/not-a-uuid").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_stalled_source_renders_nothing() {
    let fixture = TestFixture::with_source("/stalled.json", InputRead::Fresh).await;

    let catalog = fixture.state.catalog.clone();
    tokio::spawn(async move {
        let _ = catalog.load().await;
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(fixture.state.catalog.status().await, LoadStatus::Pending);

    let resp = fixture.client.get(fixture.url("/")).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(!html.contains("data-badge-id"));
    assert!(!html.contains("badge-notice"));

    let (status, body) = fixture.get_json("/api/badges").await;
    assert_eq!(status, 503);
    assert_eq!(body["error"]["code"], "NOT_LOADED");

    let view_id = fixture.open_view().await;
    let (_, body) = fixture.get_json(&format!("/api/views/{}", view_id)).await;
    assert_eq!(body["data"]["status"], "pending");
    assert!(body["data"]["badges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_source_is_reported() {
    let fixture = TestFixture::with_source("/broken.json", InputRead::Fresh).await;

    let resp = fixture
        .client
        .post(fixture.url("/api/catalog/reload"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "SOURCE_UNAVAILABLE");

    let (_, body) = fixture.get_json("/api/catalog").await;
    assert_eq!(body["data"]["status"], "failed");
    assert!(body["data"]["lastError"].is_string());

    let html = fixture
        .client
        .get(fixture.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("Badges could not be loaded."));
    assert!(!html.contains("data-badge-id"));
}

#[tokio::test]
async fn test_malformed_source_is_reported() {
    let fixture = TestFixture::with_source("/garbage.json", InputRead::Fresh).await;

    let resp = fixture
        .client
        .post(fixture.url("/api/catalog/reload"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "SOURCE_DECODE");

    let (status, body) = fixture.get_json("/api/facets").await;
    assert_eq!(status, 502);
    assert_eq!(body["error"]["code"], "SOURCE_DECODE");
}

#[tokio::test]
async fn test_reload_bumps_generation() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/catalog/reload"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["generation"], 2);
    assert_eq!(body["data"]["total"], 4);
}
