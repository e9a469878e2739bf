use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use temblor::application::quakes::QuakeService;
use temblor::cache::MemoryStore;
use temblor::domain::query::UpstreamQuery;
use temblor::infra::http::{self, AppState};
use temblor::infra::upstream::{EventSource, UpstreamError};

/// Upstream double that replays a scripted reply and records traffic.
struct ScriptedSource {
    reply: Reply,
    calls: AtomicUsize,
    last_query: Mutex<Option<UpstreamQuery>>,
}

enum Reply {
    Body(String),
    Status(StatusCode, String),
    Unreachable(String),
}

impl ScriptedSource {
    fn replying(body: Value) -> Arc<Self> {
        Arc::new(Self::new(Reply::Body(body.to_string())))
    }

    fn failing_with_status(status: StatusCode, body: &str) -> Arc<Self> {
        Arc::new(Self::new(Reply::Status(status, body.to_string())))
    }

    fn unreachable(detail: &str) -> Arc<Self> {
        Arc::new(Self::new(Reply::Unreachable(detail.to_string())))
    }

    fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_query: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_query(&self) -> UpstreamQuery {
        self.last_query
            .lock()
            .expect("query mutex")
            .clone()
            .expect("upstream was queried")
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn query(&self, query: &UpstreamQuery) -> Result<String, UpstreamError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().expect("query mutex") = Some(query.clone());

        match &self.reply {
            Reply::Body(body) => Ok(body.clone()),
            Reply::Status(status, body) => Err(UpstreamError::Status {
                status: *status,
                body: body.clone(),
            }),
            Reply::Unreachable(detail) => Err(UpstreamError::Transport {
                detail: detail.clone(),
            }),
        }
    }
}

fn router(source: Arc<ScriptedSource>) -> Router {
    let quakes = Arc::new(QuakeService::new(
        source,
        Arc::new(MemoryStore::new()),
        Duration::from_secs(30),
    ));
    http::build_router(AppState { quakes })
}

fn sample_collection(tsunami_flags: &[i64]) -> Value {
    let features: Vec<Value> = tsunami_flags
        .iter()
        .map(|flag| {
            json!({
                "type": "Feature",
                "properties": { "mag": 3.4, "felt": 12, "tsunami": flag, "place": "offshore" }
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "metadata": { "count": features.len() },
        "features": features
    })
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn get_text(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");

    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

#[tokio::test]
async fn home_returns_welcome_text() {
    let source = ScriptedSource::replying(sample_collection(&[]));

    let (status, body) = get_text(router(source), "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Temblor"));
}

#[tokio::test]
async fn health_returns_no_content() {
    let source = ScriptedSource::replying(sample_collection(&[]));

    let (status, body) = get_text(router(source), "/health").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn bay_area_query_targets_the_fixed_center() {
    let payload = sample_collection(&[0]);
    let source = ScriptedSource::replying(payload.clone());

    let (status, body) = get(
        router(source.clone()),
        "/v1/earthquakes/sf-bay-area?start_time=2026-08-01&end_time=2026-08-02",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);
    assert_eq!(source.calls(), 1);

    let query = source.last_query();
    assert_eq!(query.get("format"), Some("geojson"));
    assert_eq!(query.get("starttime"), Some("2026-08-01"));
    assert_eq!(query.get("endtime"), Some("2026-08-02"));
    assert_eq!(query.get("minmagnitude"), Some("2"));
    assert_eq!(query.get("latitude"), Some("37.7749"));
    assert_eq!(query.get("longitude"), Some("-122.4194"));
    assert_eq!(query.get("maxradiuskm"), Some("100"));
    assert_eq!(query.get("minfelt"), None);
}

#[tokio::test]
async fn bay_area_query_forwards_magnitude_override() {
    let source = ScriptedSource::replying(sample_collection(&[]));

    let (status, _) = get(
        router(source.clone()),
        "/v1/earthquakes/sf-bay-area?start_time=2026-08-01&end_time=2026-08-02&min_magnitude=4.5",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(source.last_query().get("minmagnitude"), Some("4.5"));
}

#[tokio::test]
async fn felt_report_query_forwards_the_felt_threshold() {
    let payload = sample_collection(&[0, 1]);
    let source = ScriptedSource::replying(payload.clone());

    let (status, body) = get(
        router(source.clone()),
        "/v1/earthquakes/sf-bay-area/felt-reports?start_time=2026-08-01&end_time=2026-08-02&min_felt=25",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, payload);

    let query = source.last_query();
    assert_eq!(query.get("minfelt"), Some("25"));
    assert_eq!(query.get("maxradiuskm"), Some("100"));
}

#[tokio::test]
async fn felt_report_threshold_defaults_to_ten() {
    let source = ScriptedSource::replying(sample_collection(&[]));

    get(
        router(source.clone()),
        "/v1/earthquakes/sf-bay-area/felt-reports?start_time=2026-08-01&end_time=2026-08-02",
    )
    .await;

    assert_eq!(source.last_query().get("minfelt"), Some("10"));
}

#[tokio::test]
async fn unknown_state_short_circuits_before_upstream() {
    let source = ScriptedSource::replying(sample_collection(&[]));

    let (status, body) = get(
        router(source.clone()),
        "/v1/earthquakes/tsunami-alerts?state=Atlantis",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(source.calls(), 0);
    assert_eq!(body["error"]["code"], "invalid_region");
    assert!(
        body["error"]["message"]
            .as_str()
            .expect("message is a string")
            .contains("Atlantis")
    );
}

#[tokio::test]
async fn tsunami_alerts_retain_features_matching_the_flag() {
    let source = ScriptedSource::replying(sample_collection(&[0, 1, 0]));

    let (status, body) = get(
        router(source.clone()),
        "/v1/earthquakes/tsunami-alerts?state=California",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    let earthquakes = body["earthquakes"].as_array().expect("array of features");
    assert_eq!(earthquakes.len(), 2);
    assert!(
        earthquakes
            .iter()
            .all(|feature| feature["properties"]["tsunami"] == 0)
    );

    let query = source.last_query();
    assert_eq!(query.get("latitude"), Some("36.17"));
    assert_eq!(query.get("longitude"), Some("-119.7462"));
    assert_eq!(query.get("maxradiuskm"), Some("250"));
    assert_eq!(query.get("format"), Some("geojson"));
    assert!(query.get("starttime").is_some());
    assert!(query.get("endtime").is_some());
}

#[tokio::test]
async fn upstream_status_failures_are_propagated() {
    let source =
        ScriptedSource::failing_with_status(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded");

    let (status, body) = get(
        router(source),
        "/v1/earthquakes/sf-bay-area?start_time=2026-08-01&end_time=2026-08-02",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "upstream_status");
    assert_eq!(body["error"]["detail"], "upstream exploded");
}

#[tokio::test]
async fn upstream_transport_failures_map_to_bad_gateway() {
    let source = ScriptedSource::unreachable("connection refused");

    let (status, body) = get(
        router(source),
        "/v1/earthquakes/tsunami-alerts?state=California",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "upstream_unreachable");
    assert!(
        body["error"]["detail"]
            .as_str()
            .expect("detail is a string")
            .contains("connection refused")
    );
}

#[tokio::test]
async fn repeated_queries_are_served_from_cache() {
    let source = ScriptedSource::replying(sample_collection(&[0]));
    let router = router(source.clone());

    let uri = "/v1/earthquakes/sf-bay-area?start_time=2026-08-01&end_time=2026-08-02";
    let (first_status, first_body) = get(router.clone(), uri).await;
    let (second_status, second_body) = get(router, uri).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first_body, second_body);
    assert_eq!(source.calls(), 1);
}
