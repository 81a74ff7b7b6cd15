//! HTTP-level tests for the variation API, driven through the assembled
//! router with in-memory adapters.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use variation_ledger::adapters::auth::MockSessionValidator;
use variation_ledger::adapters::http::{api_router, ApiServices, ApiSettings, INVALID_SIGNING_LINK};
use variation_ledger::adapters::notifier::RecordingNotifier;
use variation_ledger::adapters::storage::InMemoryProjectRepository;
use variation_ledger::adapters::system::{FixedClock, SequentialTokenGenerator};
use variation_ledger::adapters::token_index::InMemoryTokenIndex;
use variation_ledger::application::DispatchMode;
use variation_ledger::domain::foundation::Timestamp;

const OWNER_TOKEN: &str = "owner-session";

struct TestApp {
    router: Router,
    clock: Arc<FixedClock>,
    notifier: RecordingNotifier,
}

impl TestApp {
    fn new() -> Self {
        Self::with_settings(|settings| settings)
    }

    fn with_settings(configure: impl FnOnce(ApiSettings) -> ApiSettings) -> Self {
        let clock = Arc::new(FixedClock::new(
            Timestamp::from_unix_secs(1_767_225_600).unwrap(),
        ));
        let notifier = RecordingNotifier::new();
        let services = ApiServices {
            repository: Arc::new(InMemoryProjectRepository::new()),
            token_index: Some(Arc::new(InMemoryTokenIndex::new(clock.clone()))),
            notifier: Arc::new(notifier.clone()),
            session_validator: Arc::new(
                MockSessionValidator::new().with_test_user(OWNER_TOKEN, "builder-1"),
            ),
            clock: clock.clone(),
            token_generator: Arc::new(SequentialTokenGenerator::new()),
        };
        let settings = configure(
            ApiSettings::new("https://app.example.com").with_dispatch_mode(DispatchMode::Inline),
        );

        Self {
            router: api_router(services, settings),
            clock,
            notifier,
        }
    }

    /// Makes every request appear to arrive from `peer`.
    fn connected_from(mut self, peer: &str) -> Self {
        let peer: SocketAddr = peer.parse().unwrap();
        self.router = self.router.layer(MockConnectInfo(peer));
        self
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn owner(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", OWNER_TOKEN));
        self.send(with_json(builder, body)).await
    }

    async fn public(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        self.send(with_json(builder, body)).await
    }

    async fn create_project(&self, contract_price_cents: i64) -> String {
        let (status, body) = self
            .owner(
                Method::POST,
                "/api/projects",
                Some(json!({
                    "name": "12 Harbour St",
                    "client_name": "Client Person",
                    "client_email": "client@example.com",
                    "contract_price_cents": contract_price_cents,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    async fn create_variation(&self, project_id: &str, cost_cents: i64) -> String {
        let (status, body) = self
            .owner(
                Method::POST,
                &format!("/api/projects/{}/variations", project_id),
                Some(variation_body(cost_cents)),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["variation"]["id"].as_str().unwrap().to_string()
    }

    /// Sends a variation for signature and returns the raw token.
    async fn send_for_signature(&self, project_id: &str, variation_id: &str) -> String {
        let (status, body) = self
            .owner(
                Method::POST,
                &format!(
                    "/api/projects/{}/variations/{}/send-for-signature",
                    project_id, variation_id
                ),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        let url = body["signing_url"].as_str().unwrap();
        url.split_once("token=").unwrap().1.to_string()
    }

    async fn sign(&self, token: &str) -> (StatusCode, Value) {
        self.public(
            Method::POST,
            "/api/variations/sign",
            Some(json!({
                "token": token,
                "signed_by": { "name": "Client Person", "email": "client@example.com" }
            })),
        )
        .await
    }
}

fn with_json(builder: axum::http::request::Builder, body: Option<Value>) -> Request<Body> {
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn variation_body(cost_cents: i64) -> Value {
    json!({
        "description": "Relocate kitchen island",
        "reason": "Client request",
        "effect": "Plumbing rework",
        "permit_required": false,
        "delay_days": 2,
        "cost_cents": cost_cents,
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let (status, body) = app.public(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn owner_routes_require_bearer_token() {
    let app = TestApp::new();
    let (status, _) = app.public(Method::GET, "/api/projects", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_signing_flow_updates_contract_price() {
    let app = TestApp::new();
    let project_id = app.create_project(45_000_000).await;
    let variation_id = app.create_variation(&project_id, 250_000).await;
    let token = app.send_for_signature(&project_id, &variation_id).await;
    assert_eq!(app.notifier.signature_requests().len(), 1);

    let (status, body) = app
        .public(
            Method::GET,
            &format!("/api/variations/validate-token?token={}", token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["variation"]["id"], variation_id.as_str());
    assert_eq!(body["variation"]["cost_cents"], 250_000);
    assert!(body["project"].get("contract_price_cents").is_none());

    let (status, body) = app.sign(&token).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "approved");
    assert_eq!(app.notifier.signed_confirmations().len(), 1);

    let (status, body) = app
        .owner(Method::GET, &format!("/api/projects/{}", project_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_contract_price_cents"], 45_250_000);
    assert_eq!(body["variations"][0]["signed_by"]["name"], "Client Person");
}

#[tokio::test]
async fn unknown_expired_and_consumed_links_look_identical() {
    let app = TestApp::new();
    let project_id = app.create_project(1_000_000).await;

    let consumed_vid = app.create_variation(&project_id, 10_000).await;
    let consumed = app.send_for_signature(&project_id, &consumed_vid).await;
    let (status, _) = app.sign(&consumed).await;
    assert_eq!(status, StatusCode::OK);

    let expired_vid = app.create_variation(&project_id, 20_000).await;
    let expired = app.send_for_signature(&project_id, &expired_vid).await;
    app.clock.advance_secs(24 * 3_600 + 1);

    let mut bodies = Vec::new();
    for token in [consumed.as_str(), expired.as_str(), "not-a-real-token"] {
        let (status, body) = app.sign(token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        bodies.push(body);

        let (status, body) = app
            .public(
                Method::GET,
                &format!("/api/variations/validate-token?token={}", token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        bodies.push(body);
    }

    assert_eq!(bodies[0]["message"], INVALID_SIGNING_LINK);
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn submitted_variation_cannot_be_edited_by_default() {
    let app = TestApp::new();
    let project_id = app.create_project(1_000_000).await;
    let variation_id = app.create_variation(&project_id, 10_000).await;
    app.send_for_signature(&project_id, &variation_id).await;

    let (status, body) = app
        .owner(
            Method::PUT,
            &format!("/api/projects/{}/variations/{}", project_id, variation_id),
            Some(variation_body(99)),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn draft_variation_can_be_deleted() {
    let app = TestApp::new();
    let project_id = app.create_project(1_000_000).await;
    let variation_id = app.create_variation(&project_id, 10_000).await;

    let (status, body) = app
        .owner(
            Method::DELETE,
            &format!("/api/projects/{}/variations/{}", project_id, variation_id),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["variations"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn invalid_variation_fields_are_rejected() {
    let app = TestApp::new();
    let project_id = app.create_project(1_000_000).await;
    let mut body = variation_body(100);
    body["description"] = json!("   ");

    let (status, response) = app
        .owner(
            Method::POST,
            &format!("/api/projects/{}/variations", project_id),
            Some(body),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn projects_of_other_owners_are_hidden() {
    let app = TestApp::new();
    let (status, _) = app
        .owner(
            Method::GET,
            "/api/projects/00000000-0000-4000-8000-000000000000",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.owner(Method::GET, "/api/projects/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

async fn signer_ip_after_signing(app: &TestApp, forwarded_for: Option<&str>) -> Value {
    let project_id = app.create_project(1_000_000).await;
    let variation_id = app.create_variation(&project_id, 10_000).await;
    let token = app.send_for_signature(&project_id, &variation_id).await;

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri("/api/variations/sign");
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }
    let body = json!({ "token": token, "signed_by": { "name": "Client Person" } });
    let (status, _) = app.send(with_json(builder, Some(body))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, project) = app
        .owner(Method::GET, &format!("/api/projects/{}", project_id), None)
        .await;
    project["variations"][0]["signed_by"]["ip_address"].clone()
}

#[tokio::test]
async fn direct_signature_records_socket_address() {
    let app = TestApp::new().connected_from("192.0.2.44:50000");

    let ip = signer_ip_after_signing(&app, None).await;

    assert_eq!(ip, "192.0.2.44");
}

#[tokio::test]
async fn forwarded_address_wins_behind_trusted_proxy() {
    let app = TestApp::new().connected_from("10.0.0.5:443");

    let ip = signer_ip_after_signing(&app, Some("203.0.113.9, 10.0.0.5")).await;

    assert_eq!(ip, "203.0.113.9");
}

#[tokio::test]
async fn forwarded_address_is_ignored_without_trusted_proxy() {
    let app = TestApp::with_settings(|settings| settings.with_trust_proxy_headers(false))
        .connected_from("192.0.2.44:50000");

    let ip = signer_ip_after_signing(&app, Some("203.0.113.9")).await;

    assert_eq!(ip, "192.0.2.44");
}
