#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use noter_api::auth::TokenCodec;
use noter_api::config::AppConfig;
use noter_api::AppState;

/// Secret the spawned server signs with
pub const SERVER_SECRET: &str = "integration-test-secret-for-the-spawned-server";

// ---------------------------------------------------------------------------
// In-process router

pub struct TestApp {
    pub router: Router,
    pub codec: TokenCodec,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(AppConfig::development())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let codec = TokenCodec::new(&config.security).expect("codec");
        let state = AppState::new(config.clone()).expect("state");
        Self {
            router: noter_api::app(state),
            codec,
            config,
        }
    }

    /// Signed token for a fresh random user
    pub fn token(&self) -> String {
        self.token_for(Uuid::new_v4())
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.codec
            .issue(&user_id, "Test User", "test@example.com")
            .expect("token")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, path, token, None).await
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.expect("router");
        TestResponse::read(response).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    async fn read(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        Self { status, headers, body }
    }

    /// Value of X-RateLimit-Remaining, if present
    pub fn remaining(&self) -> Option<u64> {
        self.headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
    }
}

// ---------------------------------------------------------------------------
// Spawned binary

/// A `noter-api serve` child process owned by one test. Dropping it kills the
/// child, so no server outlives the test that started it.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_noter-api"));
        cmd.arg("serve")
            .env("APP_ENV", "development")
            .env("NOTER_API_PORT", port.to_string())
            .env("JWT_SECRET", SERVER_SECRET)
            .env("RATE_LIMIT_FREE_CAPACITY", "1000")
            .env("RATE_LIMIT_FREE_REFILL_TOKENS", "1000")
            .env("RATE_LIMIT_BASIC_CAPACITY", "1000")
            .env("RATE_LIMIT_BASIC_REFILL_TOKENS", "1000")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// Whether the child process is still running
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Start a fresh server and wait until `/health` answers
pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn()?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
