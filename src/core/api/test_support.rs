//! In-process mock of a WordPress site for tests.
//!
//! Every request is recorded; routes are matched on exact method and path,
//! unmatched requests get a 404.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;

use super::WordPressClient;
use crate::core::config::WordPressConfig;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

#[derive(Debug, Clone)]
pub struct MockRoute {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
    content_type: String,
}

impl MockRoute {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            status: StatusCode::OK,
            body: "{}".to_string(),
            content_type: "application/json".to_string(),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: &str) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: &str) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn json(mut self, value: Value) -> Self {
        self.body = value.to_string();
        self
    }

    pub fn text(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }
}

struct MockState {
    routes: Vec<MockRoute>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockBackend {
    pub url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start(routes: Vec<MockRoute>) -> Self {
        let state = Arc::new(MockState {
            routes,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend");
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    /// Site config pointing at this backend, authenticated as `admin:secret`.
    pub fn config(&self) -> WordPressConfig {
        WordPressConfig::new(&self.url, "admin", "secret")
            .with_directory_url(format!("{}/directory", self.url))
    }

    pub fn client(&self) -> WordPressClient {
        WordPressClient::new(self.config()).expect("client")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("lock").clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.lock().expect("lock").push(RecordedRequest {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: body.to_vec(),
    });

    match state
        .routes
        .iter()
        .find(|r| r.method == method && r.path == uri.path())
    {
        Some(route) => (
            route.status,
            [(header::CONTENT_TYPE, route.content_type.clone())],
            route.body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            format!("no mock route for {method} {}", uri.path()),
        )
            .into_response(),
    }
}
