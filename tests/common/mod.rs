//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    response::IntoResponse,
    Router,
};
use tokio::net::TcpListener;

use alpaca_relay::config::RelayConfig;
use alpaca_relay::http::HttpServer;
use alpaca_relay::lifecycle::Shutdown;

/// One request observed by the mock upstream.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Mock upstream returning a fixed status and body, recording every
/// request it sees.
pub struct MockUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockUpstream {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a mock upstream on an ephemeral loopback port.
pub async fn start_mock_upstream(status: StatusCode, body: &'static str) -> MockUpstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests: Arc<Mutex<Vec<RecordedRequest>>> = Arc::new(Mutex::new(Vec::new()));

    let recorded = requests.clone();
    let app = Router::new().fallback(move |request: Request| {
        let recorded = recorded.clone();
        async move {
            let (parts, body_stream) = request.into_parts();
            let bytes = axum::body::to_bytes(body_stream, 1024 * 1024)
                .await
                .unwrap_or_default();
            recorded.lock().unwrap().push(RecordedRequest {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().unwrap_or("").to_string(),
                headers: parts
                    .headers
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                    .collect(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                Body::from(body),
            )
                .into_response()
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream { addr, requests }
}

/// Relay configuration pointed at a mock upstream, rate limiting off.
pub fn test_config(upstream: SocketAddr) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.credentials.key_id = "test-key-id".into();
    config.credentials.secret_key = "test-secret-key".into();
    config.upstream.trading_url = Some(format!("http://{upstream}"));
    config.upstream.data_url = Some(format!("http://{upstream}"));
    config.rate_limit.enabled = false;
    config
}

/// Spawn the relay on an ephemeral port; returns its address and the
/// shutdown coordinator keeping it alive.
#[allow(dead_code)]
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();

    let server = HttpServer::new(config).expect("relay construction failed");
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    // Give the server a moment to start accepting.
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown)
}
