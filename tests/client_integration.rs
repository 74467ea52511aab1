use std::{
    collections::VecDeque,
    io::Write,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use cloudflare_v4_http::{
    CloudflareClient, CloudflareError, Credentials, Dns, Envelope, ErrorKind, KvValue, Logs, Zone,
};
use serde_json::{json, Value as JsonValue};

#[derive(Clone)]
enum MockBody {
    Bytes(Vec<u8>),
    /// Respond with the request body verbatim.
    Echo,
}

#[derive(Clone)]
struct MockResponse {
    status: StatusCode,
    content_type: &'static str,
    content_encoding: Option<&'static str>,
    body: MockBody,
}

impl MockResponse {
    fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            content_type: "application/json",
            content_encoding: None,
            body: MockBody::Bytes(body.to_string().into_bytes()),
        }
    }

    fn gzip(status: StatusCode, content_type: &'static str, text: &str) -> Self {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(text.as_bytes())
            .expect("must compress body");
        let compressed = encoder.finish().expect("must finish compression");
        Self {
            status,
            content_type,
            content_encoding: Some("gzip"),
            body: MockBody::Bytes(compressed),
        }
    }

    fn echo() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            content_encoding: None,
            body: MockBody::Echo,
        }
    }
}

#[derive(Clone, Debug)]
struct RecordedRequest {
    method: String,
    uri: String,
    body: String,
    headers: Vec<(String, String)>,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    hits: Arc<AtomicUsize>,
}

async fn api_handler(State(state): State<MockState>, request: Request) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let method = request.method().to_string();
    let uri = request.uri().to_string();
    let headers = request
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body_bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
        .await
        .expect("must read request body");
    let body = String::from_utf8_lossy(&body_bytes).into_owned();

    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(RecordedRequest {
            method,
            uri,
            body,
            headers,
        });

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "no mock response available"}),
            )
        })
    };

    let bytes = match response.body {
        MockBody::Bytes(bytes) => bytes,
        MockBody::Echo => body_bytes.to_vec(),
    };
    let mut builder = Response::builder()
        .status(response.status)
        .header(header::CONTENT_TYPE, response.content_type);
    if let Some(encoding) = response.content_encoding {
        builder = builder.header(header::CONTENT_ENCODING, encoding);
    }
    builder
        .body(Body::from(bytes))
        .expect("must build mock response")
        .into_response()
}

struct TestServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    hits: Arc<AtomicUsize>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    fn client(&self) -> CloudflareClient {
        CloudflareClient::with_base_url(Credentials::token("test-token"), &self.base_url)
            .expect("must build client")
    }

    fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .last()
            .cloned()
            .expect("must have recorded a request")
    }
}

async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new().fallback(api_handler).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}/"),
        requests: state.requests,
        hits: state.hits,
        task,
    }
}

fn zone_created_body() -> JsonValue {
    json!({
        "success": true,
        "errors": [],
        "messages": [],
        "result": {"id": "abc123", "name": "example.com"}
    })
}

#[tokio::test]
async fn zone_create_returns_decoded_envelope() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        zone_created_body(),
    )])
    .await;
    let zone = Zone::new(server.client());

    let envelope = zone
        .create(
            Some("example.com"),
            Some(&json!({"id": "org1", "name": "org"})),
            None,
        )
        .await
        .expect("create must succeed");

    assert!(envelope.success);
    assert_eq!(
        envelope.result,
        Some(json!({"id": "abc123", "name": "example.com"}))
    );
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);

    let request = server.last_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.uri, "/zones");
    assert_eq!(request.header("authorization"), Some("Bearer test-token"));
    assert_eq!(request.header("content-type"), Some("application/json"));
    let sent: JsonValue = serde_json::from_str(&request.body).expect("body must be JSON");
    assert_eq!(sent["name"], json!("example.com"));
    assert_eq!(sent["organization"]["id"], json!("org1"));
}

#[tokio::test]
async fn zone_create_bad_request_maps_to_bad_request_kind() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::BAD_REQUEST,
        json!({"errors":[{"code":1000,"message":"bad"}]}),
    )])
    .await;
    let zone = Zone::new(server.client());

    let err = zone
        .create(Some("example.com"), None, None)
        .await
        .expect_err("create must fail");

    match err {
        CloudflareError::Response(response) => {
            assert_eq!(response.kind, ErrorKind::BadRequest);
            assert_eq!(response.status, 400);
            assert_eq!(response.method, reqwest::Method::POST);
            assert_eq!(response.uri, "/zones");
            assert!(response.url.starts_with(&server.base_url));
            assert!(response.to_string().contains(r#""code":1000"#));
        }
        other => panic!("expected response error, got {other:?}"),
    }
}

#[tokio::test]
async fn status_table_maps_to_error_kinds() {
    let table: &[(u16, ErrorKind)] = &[
        (400, ErrorKind::BadRequest),
        (401, ErrorKind::Unauthorized),
        (403, ErrorKind::Forbidden),
        (404, ErrorKind::ResourceNotFound),
        (409, ErrorKind::Conflict),
        (410, ErrorKind::Gone),
        (412, ErrorKind::PreconditionFailed),
        (422, ErrorKind::UnprocessableEntity),
        (423, ErrorKind::Locked),
        (429, ErrorKind::TooManyRequests),
        (500, ErrorKind::InternalServerError),
        (502, ErrorKind::BadGateway),
        (503, ErrorKind::ServiceUnavailable),
        (504, ErrorKind::GatewayTimeout),
        (418, ErrorKind::ClientError),
        (599, ErrorKind::ServerError),
    ];

    let responses = table
        .iter()
        .map(|(status, _)| {
            MockResponse::json(
                StatusCode::from_u16(*status).expect("valid status"),
                json!({"errors": []}),
            )
        })
        .collect();
    let server = spawn_server(responses).await;
    let client = server.client();

    for (status, kind) in table {
        let err = client
            .get::<JsonValue>("zones/abc123", ())
            .await
            .expect_err("request must fail");
        match err {
            CloudflareError::Response(response) => {
                assert_eq!(response.status, *status, "status {status}");
                assert_eq!(response.kind, *kind, "status {status}");
                assert_eq!(response.method, reqwest::Method::GET);
                assert_eq!(response.uri, "/zones/abc123");
            }
            other => panic!("expected response error for {status}, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn patch_accepts_202() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::ACCEPTED,
        json!({"success": true, "result": {"id": "abc123"}}),
    )])
    .await;
    let client = server.client();

    let envelope: Envelope<JsonValue> = client
        .patch("zones/abc123", (), Some(&json!({"paused": true})))
        .await
        .expect("202 must decode as success");

    assert!(envelope.success);
}

#[tokio::test]
async fn non_error_status_falls_through_to_success() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::from_u16(250).expect("valid status"),
        json!({"success": true, "result": null}),
    )])
    .await;
    let client = server.client();

    let envelope: Envelope<JsonValue> = client
        .get("zones", ())
        .await
        .expect("non-error status must not raise");
    assert!(envelope.success);
}

#[tokio::test]
async fn post_with_empty_body_fails_before_any_network_call() {
    let server = spawn_server(vec![]).await;
    let client = server.client();

    let err = client
        .post::<JsonValue, _>("zones", (), &json!({}))
        .await
        .expect_err("empty body must fail");

    match err {
        CloudflareError::Validation(validation) => assert_eq!(validation.field(), "body"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(server.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn all_absent_query_values_produce_no_query_string() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({"success": true, "result": []}),
    )])
    .await;
    let zone = Zone::new(server.client());

    zone.list(None, None, None, None).await.expect("list must succeed");

    let request = server.last_request();
    assert_eq!(request.uri, "/zones");
    assert!(!request.uri.contains('?'));
}

#[tokio::test]
async fn present_query_values_survive_while_absent_ones_drop() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({"success": true, "result": []}),
    )])
    .await;
    let zone = Zone::new(server.client());

    zone.list(Some("example.com"), None, Some(1), None)
        .await
        .expect("list must succeed");

    let request = server.last_request();
    assert!(request.uri.contains("name=example.com"));
    assert!(request.uri.contains("page=1"));
    assert!(!request.uri.contains("status="));
    assert!(!request.uri.contains("per_page="));
}

#[tokio::test]
async fn gzip_envelope_is_decompressed_before_decoding() {
    let body = json!({"success": true, "result": {"id": "abc123"}}).to_string();
    let server = spawn_server(vec![MockResponse::gzip(
        StatusCode::OK,
        "application/json",
        &body,
    )])
    .await;
    let client = server.client();

    let envelope: Envelope<JsonValue> = client
        .get("zones/abc123", ())
        .await
        .expect("gzip body must decode");
    assert_eq!(envelope.result, Some(json!({"id": "abc123"})));
}

#[tokio::test]
async fn raw_mode_returns_decompressed_log_lines() {
    let lines = "{\"RayID\":\"r1\"}\n{\"RayID\":\"r2\"}\n";
    let server = spawn_server(vec![MockResponse::gzip(
        StatusCode::OK,
        "text/plain",
        lines,
    )])
    .await;
    let logs = Logs::new(server.client(), "abc123");

    let body = logs
        .received(Some("2024-01-02T03:04:05Z"), None, Some(10), None)
        .await
        .expect("log retrieval must succeed");

    assert_eq!(body, lines);
    let request = server.last_request();
    assert!(request.uri.starts_with("/zones/abc123/logs/received"));
    assert!(request.uri.contains("start=2024-01-02T03%3A04%3A05Z"));
    assert!(request.uri.contains("count=10"));
}

#[tokio::test]
async fn echoed_body_round_trips_through_the_pipeline() {
    let server = spawn_server(vec![MockResponse::echo()]).await;
    let client = server.client();

    let payload = json!({
        "name": "example.com",
        "organization": {"id": "org1", "name": "org"},
        "tags": ["a", "b"],
        "ttl": 120
    });
    let echoed: JsonValue = client
        .post("echo", (), &payload)
        .await
        .expect("echo must decode");

    assert_eq!(echoed, payload);
}

#[tokio::test]
async fn dns_create_missing_type_fails_locally_with_no_request_sent() {
    let server = spawn_server(vec![]).await;
    let dns = Dns::new(server.client(), "abc123");

    let err = dns
        .create(None, Some("www.example.com"), Some("203.0.113.7"), None, None)
        .await
        .expect_err("create must fail");

    match err {
        CloudflareError::Validation(validation) => {
            assert_eq!(validation.field(), "type");
            assert_eq!(validation.to_string(), "type is required");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(server.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn dns_create_rejects_unknown_record_type_with_allowed_set() {
    let server = spawn_server(vec![]).await;
    let dns = Dns::new(server.client(), "abc123");

    let err = dns
        .create(Some("PTR"), Some("www"), Some("203.0.113.7"), None, None)
        .await
        .expect_err("create must fail");

    match err {
        CloudflareError::Validation(validation) => {
            assert_eq!(
                validation.to_string(),
                "type must be one of A, AAAA, CNAME, TXT, SRV, LOC, MX, NS, SPF"
            );
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(server.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn key_email_mode_sends_legacy_header_triple() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({"success": true, "result": []}),
    )])
    .await;
    let client =
        CloudflareClient::with_base_url(Credentials::key_email("k1", "kit@example.com"), &server.base_url)
            .expect("must build client");

    let _: Envelope<JsonValue> = client.get("zones", ()).await.expect("get must succeed");

    let request = server.last_request();
    assert_eq!(request.header("x-auth-key"), Some("k1"));
    assert_eq!(request.header("x-auth-email"), Some("kit@example.com"));
    assert_eq!(request.header("x-auth-user-service-key"), Some("k1"));
    assert_eq!(request.header("authorization"), None);
}

#[tokio::test]
async fn delete_error_carries_method_uri_and_url() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::NOT_FOUND,
        json!({"errors":[{"code":1001,"message":"not found"}]}),
    )])
    .await;
    let dns = Dns::new(server.client(), "abc123");

    let err = dns.delete("rec1").await.expect_err("delete must fail");

    match err {
        CloudflareError::Response(response) => {
            assert_eq!(response.kind, ErrorKind::ResourceNotFound);
            assert_eq!(response.method, reqwest::Method::DELETE);
            assert_eq!(response.uri, "/zones/abc123/dns_records/rec1");
            assert_eq!(
                response.url,
                format!("{}zones/abc123/dns_records/rec1", server.base_url)
            );
        }
        other => panic!("expected response error, got {other:?}"),
    }
}

#[tokio::test]
async fn kv_write_and_read_round_trip() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::OK, json!({"success": true, "result": null})),
        MockResponse::json(StatusCode::OK, json!({"cached": true})),
    ])
    .await;
    let kv = KvValue::new(server.client(), "acc1", "ns1");

    kv.write(Some("greeting"), Some(&json!({"cached": true})))
        .await
        .expect("write must succeed");
    let request = server.last_request();
    assert_eq!(request.method, "PUT");
    assert_eq!(
        request.uri,
        "/accounts/acc1/storage/kv/namespaces/ns1/values/greeting"
    );

    let value = kv.read(Some("greeting")).await.expect("read must succeed");
    assert_eq!(value, "{\"cached\":true}");
}

#[tokio::test]
async fn purge_cache_rejects_empty_file_list_locally() {
    let server = spawn_server(vec![]).await;
    let zone = Zone::new(server.client());

    let err = zone
        .purge_cache("abc123", Some(&[]), None)
        .await
        .expect_err("purge must fail");

    match err {
        CloudflareError::Validation(validation) => {
            assert_eq!(validation.to_string(), "files must be a non-empty array");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(server.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn transport_failure_passes_through_unwrapped() {
    // Connect to a port nothing listens on.
    let client = CloudflareClient::with_base_url(
        Credentials::token("test-token"),
        "http://127.0.0.1:9/",
    )
    .expect("must build client");

    let err = client
        .get::<JsonValue>("zones", ())
        .await
        .expect_err("request must fail");

    match err {
        CloudflareError::Transport(inner) => assert!(inner.is_connect() || inner.is_request()),
        other => panic!("expected transport error, got {other:?}"),
    }
}
