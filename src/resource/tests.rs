//! Tests for the resource module

use super::*;
use crate::auth::{AuthorizerConfig, RequestAuthorizer, TokenStore};
use crate::config::{ClientConfig, EndpointOverride};
use crate::envelope::EnvelopeDecoder;
use crate::error::{Error, Result};
use crate::http::{HttpTransport, OutboundRequest, RawResponse, Transport};
use crate::types::Method;
use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Transport that records requests and replays one canned response
struct RecordingTransport {
    response: RawResponse,
    sent: Mutex<Vec<OutboundRequest>>,
}

impl RecordingTransport {
    fn new(body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            response: RawResponse::new(200, serde_json::to_vec(&body).unwrap()),
            sent: Mutex::new(Vec::new()),
        })
    }

    fn sent(&self) -> Vec<OutboundRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse> {
        self.sent.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

fn devices(n: usize) -> serde_json::Value {
    let rows: Vec<_> = (0..n)
        .map(|i| json!({"id": i, "name": format!("dev-{i}"), "productType": 5}))
        .collect();
    json!(rows)
}

fn request(page: u32, size: u32, query: PageQuery) -> PageRequest {
    PageRequest::new(page, size, query).unwrap()
}

// ============================================================================
// ResourceKind Tests
// ============================================================================

#[test_case("lamp", ResourceKind::Lamp)]
#[test_case("LOOP_CONTROLLER", ResourceKind::LoopController)]
#[test_case("environment-sensor", ResourceKind::EnvironmentSensor)]
#[test_case(" Site ", ResourceKind::Site)]
fn test_kind_parse(raw: &str, expected: ResourceKind) {
    assert_eq!(raw.parse::<ResourceKind>().unwrap(), expected);
}

#[test]
fn test_kind_parse_unknown() {
    let err = "street_sign".parse::<ResourceKind>().unwrap_err();
    assert!(matches!(err, Error::UnknownResourceKind { .. }));
}

#[test]
fn test_kind_round_trips_through_display() {
    for kind in ResourceKind::ALL {
        assert_eq!(kind.to_string().parse::<ResourceKind>().unwrap(), kind);
    }
}

// ============================================================================
// PageRequest / Filters Tests
// ============================================================================

#[test]
fn test_page_request_bounds() {
    assert!(PageRequest::new(0, 20, PageQuery::new()).is_err());
    assert!(PageRequest::new(1, 0, PageQuery::new()).is_err());
    let first = PageRequest::first(20, PageQuery::new()).unwrap();
    assert_eq!(first.page_number, 1);
}

#[test_case(Some("12"), vec![12] ; "numeric")]
#[test_case(Some(" 7 "), vec![7] ; "padded")]
#[test_case(Some("road-a"), vec![] ; "not numeric")]
#[test_case(Some(""), vec![] ; "empty")]
#[test_case(None, vec![] ; "absent")]
fn test_road_ids(raw: Option<&str>, expected: Vec<i64>) {
    let filters = Filters {
        road_id: raw.map(String::from),
        ..Default::default()
    };
    assert_eq!(filters.road_ids(), expected);
}

#[test]
fn test_effective_keyword_skips_blank() {
    assert_eq!(PageQuery::new().keyword("  ").effective_keyword(), None);
    assert_eq!(
        PageQuery::new().keyword(" pole ").effective_keyword(),
        Some("pole")
    );
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[test]
fn test_devices_request_shape() {
    let endpoint = Endpoint::default_for(ResourceKind::EnvironmentSensor);
    let req = endpoint.build_request(&request(2, 20, PageQuery::new().keyword("pm25").online(true)));

    assert_eq!(req.method, Method::GET);
    assert_eq!(req.path, "/device/page");
    assert_eq!(
        req.query,
        vec![
            ("pageNum".to_string(), "2".to_string()),
            ("pageSize".to_string(), "20".to_string()),
            ("productType".to_string(), "5".to_string()),
            ("keyword".to_string(), "pm25".to_string()),
            ("online".to_string(), "true".to_string()),
        ]
    );
    assert!(req.body.is_none());
}

#[test]
fn test_road_devices_request_shape() {
    let endpoint = Endpoint::default_for(ResourceKind::Lamp);

    let req = endpoint.build_request(&request(1, 10, PageQuery::new().road_id("42")));
    assert_eq!(req.path, "/device/lamp/page");
    assert_eq!(req.query_value("productType"), Some("1"));
    assert_eq!(req.query_value("roadIds"), Some("42"));

    let req = endpoint.build_request(&request(1, 10, PageQuery::new().road_id("north-ring")));
    assert_eq!(req.query_value("roadIds"), None);
    assert_eq!(req.query_value("pageNum"), Some("1"));
}

#[test]
fn test_sites_request_shape() {
    let endpoint = Endpoint::default_for(ResourceKind::Site);
    let req = endpoint.build_request(&request(3, 15, PageQuery::new().keyword("depot").site_id("x")));

    assert_eq!(req.path, "/site/page");
    assert_eq!(req.query_value("siteName"), Some("depot"));
    assert_eq!(req.query_value("siteId"), None);
    assert_eq!(req.query_value("productType"), None);
}

#[test]
fn test_cameras_request_shape() {
    let endpoint = Endpoint::default_for(ResourceKind::Camera);
    let req = endpoint.build_request(&request(4, 30, PageQuery::new().site_id("9")));

    assert_eq!(req.method, Method::POST);
    assert_eq!(req.path, "/camera/page");
    assert!(req.query.is_empty());
    assert_eq!(
        req.body,
        Some(json!({"current": 4, "size": 30, "category": 6, "siteId": 9}))
    );
}

#[test]
fn test_each_device_kind_has_distinct_code() {
    let codes: Vec<i32> = ResourceKind::ALL
        .into_iter()
        .filter_map(|kind| match Endpoint::default_for(kind) {
            Endpoint::Devices { product_type, .. } | Endpoint::RoadDevices { product_type, .. } => {
                Some(product_type)
            }
            Endpoint::Cameras { category, .. } => Some(category),
            Endpoint::Sites { .. } => None,
        })
        .collect();
    let mut unique = codes.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(unique.len(), codes.len());
}

#[test]
fn test_endpoint_override() {
    let endpoint = Endpoint::default_for(ResourceKind::Camera).with_override(&EndpointOverride {
        path: Some("/v2/camera/page".to_string()),
        code: Some(11),
    });
    assert_eq!(
        endpoint,
        Endpoint::Cameras {
            path: "/v2/camera/page".to_string(),
            category: 11
        }
    );

    // Sites have no fixed code
    let endpoint = Endpoint::default_for(ResourceKind::Site).with_override(&EndpointOverride {
        path: None,
        code: Some(3),
    });
    assert_eq!(endpoint, Endpoint::default_for(ResourceKind::Site));
}

#[test]
fn test_endpoint_table_from_config() {
    let config = ClientConfig::builder("https://api.example.com")
        .endpoint(ResourceKind::Concentrator, None, Some(20))
        .build()
        .unwrap();
    let table = EndpointTable::from_config(&config);

    assert_eq!(table.entries().len(), ResourceKind::ALL.len());
    assert_eq!(
        table.get(ResourceKind::Concentrator),
        Some(&Endpoint::Devices {
            path: "/device/page".to_string(),
            product_type: 20
        })
    );
    assert_eq!(
        table.get(ResourceKind::Lamp),
        Some(&Endpoint::default_for(ResourceKind::Lamp))
    );
}

// ============================================================================
// Item Tests
// ============================================================================

#[test]
fn test_device_decodes_aliases_and_extra() {
    let device: Device = serde_json::from_value(json!({
        "id": "CAM-01",
        "deviceName": "Gate camera",
        "sn": "SN123",
        "lng": 120.1,
        "lat": 30.2,
        "firmware": "1.4.2"
    }))
    .unwrap();

    assert_eq!(device.id, ResourceId::Text("CAM-01".to_string()));
    assert_eq!(device.name, "Gate camera");
    assert_eq!(device.serial_number.as_deref(), Some("SN123"));
    assert_eq!(device.longitude, Some(120.1));
    assert_eq!(device.extra.get("firmware"), Some(&json!("1.4.2")));
}

#[test]
fn test_item_accessors() {
    let site: Site = serde_json::from_value(json!({"id": 3, "siteName": "Depot"})).unwrap();
    let item = Item::Site(site);
    assert_eq!(item.id().to_string(), "3");
    assert_eq!(item.name(), "Depot");
}

// ============================================================================
// Fetcher Tests
// ============================================================================

#[tokio::test]
async fn test_fetcher_returns_items_in_order() {
    let transport = RecordingTransport::new(json!({"code": 200, "data": devices(3)}));
    let fetcher = EndpointFetcher::new(
        Endpoint::default_for(ResourceKind::Concentrator),
        transport.clone(),
        EnvelopeDecoder::default(),
    );

    let items = fetcher.fetch(&request(1, 20, PageQuery::new())).await.unwrap();
    let names: Vec<&str> = items.iter().map(Item::name).collect();
    assert_eq!(names, vec!["dev-0", "dev-1", "dev-2"]);

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].query_value("productType"), Some("2"));
}

#[tokio::test]
async fn test_fetcher_propagates_domain_error() {
    let transport =
        RecordingTransport::new(json!({"code": 401, "data": null, "message": "token expired"}));
    let fetcher = EndpointFetcher::new(
        Endpoint::default_for(ResourceKind::Site),
        transport,
        EnvelopeDecoder::default(),
    );

    let err = fetcher
        .fetch(&request(1, 20, PageQuery::new()))
        .await
        .unwrap_err();
    match err {
        Error::Domain { code, message } => {
            assert_eq!(code, 401);
            assert_eq!(message, "token expired");
        }
        other => panic!("Expected Domain, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetcher_null_payload_is_empty() {
    let transport = RecordingTransport::new(json!({"code": 200, "data": null}));
    let fetcher = EndpointFetcher::new(
        Endpoint::default_for(ResourceKind::Camera),
        transport,
        EnvelopeDecoder::default(),
    );
    let items = fetcher.fetch(&request(1, 20, PageQuery::new())).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_fetcher_over_http_environment_sensor_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/device/page"))
        .and(query_param("pageNum", "1"))
        .and(query_param("pageSize", "20"))
        .and(query_param("productType", "5"))
        .and(header("Authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "data": {"records": devices(15), "total": 15}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let store = TokenStore::with_token("tok");
    let authorizer = RequestAuthorizer::new(store, AuthorizerConfig::default()).unwrap();
    let transport = HttpTransport::with_options(
        &mock_server.uri(),
        Duration::from_secs(5),
        "devpage-test",
        authorizer,
    )
    .unwrap();

    let fetcher = EndpointFetcher::new(
        Endpoint::default_for(ResourceKind::EnvironmentSensor),
        Arc::new(transport),
        EnvelopeDecoder::default(),
    );
    let items = fetcher
        .fetch(&request(1, 20, PageQuery::new().keyword("")))
        .await
        .unwrap();
    assert_eq!(items.len(), 15);
}

// ============================================================================
// Dispatcher Tests
// ============================================================================

/// Fetcher that returns a fixed number of sites
struct FixedFetcher(usize);

#[async_trait]
impl Fetcher for FixedFetcher {
    async fn fetch(&self, _request: &PageRequest) -> Result<Vec<Item>> {
        Ok((0..self.0)
            .map(|i| {
                Item::Site(Site {
                    id: ResourceId::Number(i as i64),
                    name: format!("site-{i}"),
                    address: None,
                    longitude: None,
                    latitude: None,
                    device_count: None,
                    extra: Default::default(),
                })
            })
            .collect())
    }
}

#[test]
fn test_standard_dispatcher_is_total() {
    let transport = RecordingTransport::new(json!({"code": 200, "data": []}));
    let dispatcher = Dispatcher::standard(
        transport,
        EnvelopeDecoder::default(),
        &EndpointTable::default(),
    );
    for kind in ResourceKind::ALL {
        assert!(dispatcher.supports(kind), "{kind} not registered");
    }
    assert_eq!(dispatcher.kinds().len(), ResourceKind::ALL.len());
}

#[tokio::test]
async fn test_dispatch_routes_to_registered_fetcher() {
    let dispatcher = Dispatcher::new()
        .with(ResourceKind::Site, Arc::new(FixedFetcher(2)))
        .with(ResourceKind::Camera, Arc::new(FixedFetcher(5)));

    let req = request(1, 20, PageQuery::new());
    assert_eq!(dispatcher.dispatch(ResourceKind::Site, &req).await.unwrap().len(), 2);
    assert_eq!(dispatcher.dispatch(ResourceKind::Camera, &req).await.unwrap().len(), 5);
}

#[tokio::test]
async fn test_dispatch_unregistered_kind_is_empty() {
    let dispatcher = Dispatcher::new().with(ResourceKind::Site, Arc::new(FixedFetcher(2)));
    let req = request(1, 20, PageQuery::new());

    let items = dispatcher.dispatch(ResourceKind::Lamp, &req).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_dispatch_named_unknown_is_empty() {
    let dispatcher = Dispatcher::new().with(ResourceKind::Site, Arc::new(FixedFetcher(2)));
    let req = request(1, 20, PageQuery::new());

    let items = dispatcher.dispatch_named("traffic_light", &req).await.unwrap();
    assert!(items.is_empty());

    let items = dispatcher.dispatch_named("SITE", &req).await.unwrap();
    assert_eq!(items.len(), 2);
}

#[tokio::test]
async fn test_register_replaces_row() {
    let mut dispatcher = Dispatcher::new();
    assert!(dispatcher
        .register(ResourceKind::Site, Arc::new(FixedFetcher(1)))
        .is_none());
    assert!(dispatcher
        .register(ResourceKind::Site, Arc::new(FixedFetcher(4)))
        .is_some());

    let req = request(1, 20, PageQuery::new());
    assert_eq!(dispatcher.dispatch(ResourceKind::Site, &req).await.unwrap().len(), 4);
}
