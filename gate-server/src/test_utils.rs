use crate::config::GateConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::Body;
use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Bearer token sent by the authenticated request helpers
pub const TEST_TOKEN: &str = "SOME_TOKEN";

/// Test fixture wiring the full application against mock backends.
///
/// Starts wiremock servers standing in for the Texas sidecar and the
/// synthetic token generator, builds a config pointing at them and exposes
/// helpers for mounting the common mock responses and driving the router
/// in-process.
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// Configuration the app was built with
    pub config: GateConfig,
    /// Mock server standing in for the Texas sidecar
    pub texas_mock: MockServer,
    /// Mock server standing in for the synthetic token generator
    pub token_generator_mock: MockServer,
}

impl TestFixture {
    /// Creates a fixture with the default mock-backed configuration
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Creates a fixture after letting the test adjust the mock-backed
    /// configuration
    pub async fn with_config(adjust: impl FnOnce(&mut GateConfig)) -> Self {
        // Initialize test logger
        let _ = env_logger::builder()
            .filter_level(LevelFilter::Debug)
            .is_test(true)
            .try_init();

        let texas_mock = MockServer::start().await;
        let token_generator_mock = MockServer::start().await;

        let mut config = GateConfig::for_test_with_mocks(&texas_mock, &token_generator_mock);
        adjust(&mut config);

        let state = AppState::new(&config).expect("Failed to initialize application state");
        let app = create_app(state).await;

        Self {
            app,
            config,
            texas_mock,
            token_generator_mock,
        }
    }

    /// Mounts an introspection mock returning the given body with status 200
    pub async fn mock_introspect(&self, body: Value) {
        Mock::given(method("POST"))
            .and(path("/token/introspect"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.texas_mock)
            .await;
    }

    /// Mounts a token endpoint mock returning the given status and body
    pub async fn mock_token(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.texas_mock)
            .await;
    }

    /// Like [`mock_token`](Self::mock_token), but matching on the `target`
    /// field of the request body and expecting exactly one call
    pub async fn mock_token_for_target(&self, target: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .and(body_partial_json(json!({ "target": target })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.texas_mock)
            .await;
    }

    /// Mounts an exchange endpoint mock returning the given status and body
    pub async fn mock_exchange(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/token/exchange"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.texas_mock)
            .await;
    }

    /// Like [`mock_exchange`](Self::mock_exchange), but matching on the
    /// `target` field of the request body and expecting exactly one call
    pub async fn mock_exchange_for_target(&self, target: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/token/exchange"))
            .and(body_partial_json(json!({ "target": target })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.texas_mock)
            .await;
    }

    /// Like [`mock_exchange`](Self::mock_exchange), but matching on the
    /// `user_token` field of the request body and expecting exactly one call
    pub async fn mock_exchange_for_user_token(&self, user_token: &str, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/token/exchange"))
            .and(body_partial_json(json!({ "user_token": user_token })))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .expect(1)
            .mount(&self.texas_mock)
            .await;
    }

    /// Creates a request builder for the given method and URI with no
    /// default headers
    pub fn request_builder(&self, method: Method, uri: impl AsRef<str>) -> http::request::Builder {
        Request::builder().method(method).uri(uri.as_ref())
    }

    /// Sends an unauthenticated GET request
    pub async fn get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a GET request carrying the test bearer token
    pub async fn auth_get(&self, uri: impl AsRef<str>) -> TestResponse {
        let request = self
            .request_builder(Method::GET, uri)
            .header("Authorization", format!("Bearer {TEST_TOKEN}"))
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends an unauthenticated POST request with a form-encoded body
    pub async fn post_form(&self, uri: impl AsRef<str>, body: &str) -> TestResponse {
        let request = self
            .request_builder(Method::POST, uri)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request through the router and collects the response
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request with convenient access to status, headers
/// and body
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    body: Vec<u8>,
}

impl TestResponse {
    /// Asserts that the response has the expected status code
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts that the response status is OK (200)
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// The response body parsed as JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Failed to parse response body as JSON ({e}): {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    /// The response body as a UTF-8 string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The Location header, panicking when absent
    pub fn location(&self) -> &str {
        self.headers
            .get(http::header::LOCATION)
            .expect("Response has no Location header")
            .to_str()
            .expect("Location header is not valid UTF-8")
    }
}
