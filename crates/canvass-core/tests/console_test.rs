// Integration tests for `Console` against a wiremock backend: criteria
// resolution, list + delete pipeline, filtered counting, and session
// expiry mapping.

use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use canvass_api::transport::TransportConfig;
use canvass_api::{AdminClient, PageRequest};
use canvass_core::filter::FilterValue;
use canvass_core::{Console, CoreError, DeleteFlow, FieldSchema, ListState};

async fn setup() -> (MockServer, Console) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).expect("mock server uri");
    let client = AdminClient::new(base, &TransportConfig::default()).expect("client");
    (server, Console::from_client(client))
}

async fn prime_csrf(server: &MockServer, console: &Console) {
    Mock::given(method("GET"))
        .and(path("/sanctum/csrf-cookie"))
        .respond_with(
            ResponseTemplate::new(204).insert_header("set-cookie", "XSRF-TOKEN=tok; Path=/"),
        )
        .mount(server)
        .await;
    console.api().fetch_csrf_cookie().await.expect("csrf");
}

fn campaign(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "start_date": "2026-04-01",
        "end_date": "2026-04-30",
        "status": "Active",
        "prospect_filter": {},
        "slug": title.to_lowercase().replace(' ', "-"),
        "landingpage_id": null
    })
}

#[tokio::test]
async fn criteria_resolve_once_and_cache_for_the_session() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/prospects/search-criteria"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "gender": ["male", "female"],
            "age": {"min": 18, "max": 99}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let schema = console.criteria().await.expect("criteria");
    assert_eq!(
        schema.get("age"),
        Some(&FieldSchema::NumericRange { min: 18.0, max: 99.0 })
    );

    // Second call is served from the cache; the mock allows one hit only.
    let again = console.criteria().await.expect("cached criteria");
    assert_eq!(again, schema);
}

#[tokio::test]
async fn criteria_fetch_failure_is_terminal() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/prospects/search-criteria"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "boom"})))
        .mount(&server)
        .await;

    let err = console.criteria().await.expect_err("should fail");
    assert!(matches!(err, CoreError::CriteriaUnavailable { .. }));
}

#[tokio::test]
async fn delete_pipeline_deletes_invalidates_and_revalidates() {
    let (server, console) = setup().await;
    prime_csrf(&server, &console).await;

    // The list endpoint serves both the initial load and the
    // revalidation after the delete.
    Mock::given(method("GET"))
        .and(path("/api/campaigns"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [campaign("c-1", "Acme Corp")],
            "meta": {"current_page": 1, "last_page": 1, "per_page": 10, "total": 1},
            "links": {}
        })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/campaigns/c-1"))
        .and(header("X-XSRF-TOKEN", "tok"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let list = console.campaigns();
    list.load(PageRequest::default()).await.expect("load");

    let mut flow = DeleteFlow::new();
    flow.request("c-1", "Acme Corp");
    flow.confirm(&list).await.expect("delete");

    assert!(!flow.is_open());
    assert!(matches!(list.state(), ListState::Ready(_)));
    // Mock expectations (2 GETs, 1 DELETE) are verified on drop.
}

#[tokio::test]
async fn filtered_count_reads_meta_total() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/prospects/filter"))
        .and(query_param("per_page", "1"))
        .and(query_param("min_age", "25"))
        .and(query_param("gender", "female"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": {"current_page": 1, "last_page": 17, "per_page": 1, "total": 17}
        })))
        .mount(&server)
        .await;

    let mut filter = FilterValue::new();
    filter.set_numeric_range("age", (18.0, 99.0), 25.0, 99.0);
    filter.select_options("gender", vec!["female".to_owned()]);

    let count = console.count_prospects(&filter).await.expect("count");
    assert_eq!(count, 17);
}

// Real clock: the debounce interacts with live wiremock IO here, so the
// paused-clock harness stays in the unit tests.
#[tokio::test]
async fn debounced_counter_reports_live_totals() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/prospects/filter"))
        .and(query_param("per_page", "1"))
        .and(query_param("gender", "female"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": {"current_page": 1, "last_page": 23, "per_page": 1, "total": 23}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let counter = console.match_counter();
    let mut rx = counter.subscribe();

    let mut filter = FilterValue::new();
    filter.select_options("gender", vec!["female".to_owned()]);
    counter.update(filter);

    loop {
        if *rx.borrow_and_update() == canvass_core::CountState::Ready(23) {
            break;
        }
        rx.changed().await.expect("counter alive");
    }
    counter.shutdown();
}

#[tokio::test]
async fn session_expiry_surfaces_as_core_error() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/campaigns"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Unauthenticated."
        })))
        .mount(&server)
        .await;

    let list = console.campaigns();
    let err = list.load(PageRequest::default()).await.expect_err("401");
    assert!(matches!(err, CoreError::SessionExpired));
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn differently_filtered_prospect_pages_do_not_collide() {
    let (server, console) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/prospects"))
        .and(query_param("gender", "female"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": {"current_page": 1, "last_page": 1, "per_page": 10, "total": 5},
            "links": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/prospects"))
        .and(query_param("gender", "male"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [],
            "meta": {"current_page": 1, "last_page": 1, "per_page": 10, "total": 9},
            "links": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut women = FilterValue::new();
    women.select_options("gender", vec!["female".to_owned()]);
    let mut men = FilterValue::new();
    men.select_options("gender", vec!["male".to_owned()]);

    let first = console
        .prospects(&women)
        .load(PageRequest::default())
        .await
        .expect("women page");
    let second = console
        .prospects(&men)
        .load(PageRequest::default())
        .await
        .expect("men page");

    assert_eq!(first.meta.total, 5);
    // A shared cache key would have returned the first page again.
    assert_eq!(second.meta.total, 9);
}
