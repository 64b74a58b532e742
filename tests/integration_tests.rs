//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: config → DataClient → authorized HTTP
//! requests → envelope decoding → pages and session state

use devpage::{
    ClientConfig, DataClient, Error, Item, LoadResult, LoaderState, PageQuery, ResourceKind,
};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn devices(range: std::ops::Range<u32>) -> Value {
    json!(range
        .map(|i| json!({"id": i, "deviceName": format!("sensor-{i}"), "online": true}))
        .collect::<Vec<_>>())
}

fn client_for(server: &MockServer) -> DataClient {
    DataClient::new(ClientConfig::new(server.uri())).unwrap()
}

// ============================================================================
// Single Page Tests
// ============================================================================

#[tokio::test]
async fn test_environment_sensors_single_short_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/device/page"))
        .and(query_param("pageNum", "1"))
        .and(query_param("pageSize", "20"))
        .and(query_param("productType", "5"))
        .and(header("Authorization", "Bearer abc"))
        .and(header("Accept-Language", "zh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": { "records": devices(0..15), "total": 15 },
            "message": "ok"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.set_credential("abc");

    let page = client
        .request_page(ResourceKind::EnvironmentSensor, 1, Some(20), PageQuery::new())
        .await
        .unwrap();

    assert_eq!(page.len(), 15);
    assert_eq!(page.prev_key, None);
    assert_eq!(page.next_key, None);
    assert_eq!(page.items[0].name(), "sensor-0");
    assert!(matches!(page.items[14], Item::Device(_)));
}

#[tokio::test]
async fn test_camera_page_posts_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/camera/page"))
        .and(body_json(json!({
            "current": 2,
            "size": 10,
            "category": 6,
            "keyword": "gate"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": devices(10..20)
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .request_page(
            ResourceKind::Camera,
            2,
            Some(10),
            PageQuery::new().keyword("gate"),
        )
        .await
        .unwrap();

    assert_eq!(page.len(), 10);
    assert_eq!(page.prev_key, Some(1));
    assert_eq!(page.next_key, Some(3));
}

#[tokio::test]
async fn test_unknown_kind_is_empty_without_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let page = client
        .request_page_named("street_light_pole", 1, None, PageQuery::new())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert_eq!(page.next_key, None);
}

#[tokio::test]
async fn test_exempt_host_carries_no_credential() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/site/page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": [{"id": 1, "siteName": "Depot"}]
        })))
        .mount(&mock_server)
        .await;

    let config = ClientConfig::builder(mock_server.uri())
        .exempt_host("127.0.0.1")
        .build()
        .unwrap();
    let client = DataClient::new(config).unwrap();
    client.set_credential("abc");

    let page = client
        .request_page(ResourceKind::Site, 1, Some(20), PageQuery::new())
        .await
        .unwrap();
    assert_eq!(page.items[0].name(), "Depot");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert!(requests[0].headers.get("accept-language").is_none());
}

// ============================================================================
// Session Tests
// ============================================================================

#[tokio::test]
async fn test_expired_token_fails_session_load() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/device/lamp/page"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 401,
            "data": null,
            "message": "token expired"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.set_credential("stale");
    let session = client
        .open_session(ResourceKind::Lamp, PageQuery::new().road_id("7"), None)
        .unwrap();

    let result = session.load(None).await;
    match &result {
        LoadResult::Error { page_number, error } => {
            assert_eq!(*page_number, 1);
            assert!(matches!(
                error.as_ref(),
                Error::Domain { code: 401, message } if message == "token expired"
            ));
        }
        other => panic!("Expected Error, got {other:?}"),
    }
    assert!(matches!(session.state(), LoaderState::Failed { .. }));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query_pairs().filter(|(k, _)| k == "roadIds").count(), 1);
}

#[tokio::test]
async fn test_crawl_stops_on_short_page() {
    let mock_server = MockServer::start().await;

    for (page_number, range) in [("1", 0..20), ("2", 20..40), ("3", 40..47)] {
        Mock::given(method("GET"))
            .and(path("/device/page"))
            .and(query_param("pageNum", page_number))
            .and(query_param("productType", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "data": { "list": devices(range), "total": 47 }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client_for(&mock_server);
    let session = client
        .open_session(ResourceKind::Concentrator, PageQuery::new(), Some(20))
        .unwrap();

    let sizes: Vec<usize> = session
        .pages()
        .map(|result| result.page().map_or(0, devpage::Page::len))
        .collect()
        .await;

    assert_eq!(sizes, vec![20, 20, 7]);
    assert_eq!(session.paging_state().item_count(), 47);
}

#[tokio::test]
async fn test_transport_failure_is_typed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/site/page"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request_page(ResourceKind::Site, 1, None, PageQuery::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Transport { .. }));
}
