//! Authenticated call wrappers, one per backend surface.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult, Surface};
use crate::core::config::WordPressConfig;

/// Path prefix of the core content API.
pub const CORE_PREFIX: &str = "/wp-json/wp/v2";
/// Path of the site discovery document.
pub const ROOT_PATH: &str = "/wp-json/";
/// Path prefix of the WooCommerce API.
pub const COMMERCE_PREFIX: &str = "/wp-json/wc/v3";
/// Path prefix of the BanildTools companion plugin API.
pub const PLUGIN_PREFIX: &str = "/wp-json/banildtools/v1";

/// Client for every WordPress-facing surface.
///
/// Holds a shared, immutable copy of the site configuration and a single
/// `reqwest::Client`. Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct WordPressClient {
    http: reqwest::Client,
    config: Arc<WordPressConfig>,
}

impl WordPressClient {
    /// Build a client for the configured site.
    pub fn new(config: WordPressConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("wordpress-mcp-server/", env!("CARGO_PKG_VERSION")));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// The site configuration this client was built with.
    pub fn config(&self) -> &WordPressConfig {
        &self.config
    }

    pub(super) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(super) fn basic_auth(&self) -> String {
        format!("Basic {}", self.config.auth_token())
    }

    pub(super) fn core_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.config.url, CORE_PREFIX, endpoint)
    }

    pub(super) fn plugin_url(&self, endpoint: &str) -> String {
        format!("{}{}{}", self.config.url, PLUGIN_PREFIX, endpoint)
    }

    fn commerce_url(&self, endpoint: &str) -> ApiResult<String> {
        let base = format!("{}{}{}", self.config.url, COMMERCE_PREFIX, endpoint);
        let Some((key, secret)) = self.config.commerce_credentials() else {
            return Ok(base);
        };

        let query = serde_urlencoded::to_string([("consumer_key", key), ("consumer_secret", secret)])
            .map_err(|e| ApiError::invalid_request(e.to_string()))?;
        let separator = if base.contains('?') { '&' } else { '?' };
        Ok(format!("{base}{separator}{query}"))
    }

    // ========================================================================
    // Core content API
    // ========================================================================

    /// Call `/wp-json/wp/v2{endpoint}` with Basic auth.
    pub async fn core(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        debug!(%method, endpoint, "WordPress API request");
        let request = self
            .http
            .request(method, self.core_url(endpoint))
            .header(AUTHORIZATION, self.basic_auth());
        self.send(Surface::Core, with_json(request, body)).await
    }

    /// GET on the core content API.
    pub async fn core_get(&self, endpoint: &str) -> ApiResult<Value> {
        self.core(Method::GET, endpoint, None).await
    }

    /// Fetch the site discovery document at `/wp-json/`.
    pub async fn root(&self) -> ApiResult<Value> {
        debug!("WordPress root API request");
        let url = format!("{}{}", self.config.url, ROOT_PATH);
        let request = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.basic_auth());
        self.send(Surface::Root, request).await
    }

    // ========================================================================
    // WooCommerce API
    // ========================================================================

    /// Call `/wp-json/wc/v3{endpoint}`.
    ///
    /// Consumer key/secret go in the query string when both are configured;
    /// the Authorization header is only sent when they are not.
    pub async fn commerce(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        debug!(%method, endpoint, "WooCommerce API request");
        let mut request = self.http.request(method, self.commerce_url(endpoint)?);
        if self.config.commerce_credentials().is_none() {
            request = request.header(AUTHORIZATION, self.basic_auth());
        }
        self.send(Surface::Commerce, with_json(request, body)).await
    }

    /// GET on the WooCommerce API.
    pub async fn commerce_get(&self, endpoint: &str) -> ApiResult<Value> {
        self.commerce(Method::GET, endpoint, None).await
    }

    // ========================================================================
    // BanildTools API
    // ========================================================================

    /// Call `/wp-json/banildtools/v1{endpoint}` with Basic auth.
    pub async fn plugin(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> ApiResult<Value> {
        debug!(%method, endpoint, "BanildTools API request");
        let request = self
            .http
            .request(method, self.plugin_url(endpoint))
            .header(AUTHORIZATION, self.basic_auth());
        self.send(Surface::Plugin, with_json(request, body)).await
    }

    /// POST on the BanildTools API, its usual verb.
    pub async fn plugin_post(&self, endpoint: &str, body: &Value) -> ApiResult<Value> {
        self.plugin(Method::POST, endpoint, Some(body)).await
    }

    pub(super) async fn send(&self, surface: Surface, request: RequestBuilder) -> ApiResult<Value> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::transport(surface, &e))?;
        read_json(surface, response).await
    }
}

fn with_json(request: RequestBuilder, body: Option<&Value>) -> RequestBuilder {
    match body {
        Some(body) => request.json(body),
        None => request,
    }
}

/// Canonical reason phrase for a status, or an empty string.
pub(super) fn reason(status: reqwest::StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

/// Turn a response into parsed JSON or a descriptive failure.
pub(super) async fn read_json(surface: Surface, response: Response) -> ApiResult<Value> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::transport(surface, &e))?;

    if !status.is_success() {
        warn!(%surface, status = status.as_u16(), "API call returned an error status");
        return Err(ApiError::Status {
            surface,
            status: status.as_u16(),
            reason: reason(status),
            body: text,
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| ApiError::Decode {
        surface,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use axum::http::StatusCode;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const ADMIN_AUTH: &str = "Basic YWRtaW46c2VjcmV0";

    #[tokio::test]
    async fn test_core_get_returns_parsed_body_with_basic_auth() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wp/v2/posts/42").json(json!({"id": 42, "status": "publish"})),
        ])
        .await;
        let client = backend.client();

        let value = assert_ok!(client.core_get("/posts/42").await);
        assert_eq!(value, json!({"id": 42, "status": "publish"}));

        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header("authorization"), Some(ADMIN_AUTH));
    }

    #[tokio::test]
    async fn test_core_404_carries_status_and_body() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wp/v2/posts/42")
                .status(StatusCode::NOT_FOUND)
                .text("no post"),
        ])
        .await;

        let err = assert_err!(backend.client().core_get("/posts/42").await);
        let msg = err.to_string();
        assert!(msg.contains("404"), "{msg}");
        assert!(msg.contains("no post"), "{msg}");
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_core_sends_json_body() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/wp/v2/posts").json(json!({"id": 7})),
        ])
        .await;

        let body = json!({"title": "Hello", "status": "draft"});
        assert_ok!(
            backend
                .client()
                .core(Method::POST, "/posts", Some(&body))
                .await
        );

        let request = &backend.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.json(), body);
    }

    #[tokio::test]
    async fn test_non_json_success_is_decode_error() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wp/v2/settings").text("<html>oops</html>"),
        ])
        .await;

        let err = assert_err!(backend.client().core_get("/settings").await);
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let backend = MockBackend::start(vec![
            MockRoute::delete("/wp-json/wp/v2/posts/1").text(""),
        ])
        .await;

        let value = assert_ok!(
            backend
                .client()
                .core(Method::DELETE, "/posts/1", None)
                .await
        );
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn test_network_failure_is_wrapped() {
        // Nothing listens on port 9 on loopback.
        let client = WordPressClient::new(WordPressConfig::new("http://127.0.0.1:9", "a", "b"))
            .unwrap();
        let err = assert_err!(client.core_get("/posts").await);
        assert!(matches!(err, ApiError::Transport { surface: Surface::Core, .. }));
        assert!(err.to_string().starts_with("Failed to call WordPress API:"));
    }

    #[tokio::test]
    async fn test_root_targets_discovery_document() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/").json(json!({"name": "Site"})),
        ])
        .await;

        let value = assert_ok!(backend.client().root().await);
        assert_eq!(value["name"], "Site");
        assert_eq!(backend.requests()[0].header("authorization"), Some(ADMIN_AUTH));
    }

    #[tokio::test]
    async fn test_commerce_uses_query_credentials_when_configured() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wc/v3/products").json(json!([])),
        ])
        .await;
        let config = backend.config().with_commerce_keys("ck_abc", "cs_def");
        let client = WordPressClient::new(config).unwrap();

        assert_ok!(client.commerce_get("/products?per_page=5").await);

        let request = &backend.requests()[0];
        assert_eq!(request.header("authorization"), None);
        let query = request.query.clone().unwrap_or_default();
        assert_eq!(query, "per_page=5&consumer_key=ck_abc&consumer_secret=cs_def");
    }

    #[tokio::test]
    async fn test_commerce_falls_back_to_basic_auth() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wc/v3/products").json(json!([])),
        ])
        .await;
        let mut config = backend.config();
        config.wc_consumer_key = Some("ck_only".to_string());
        let client = WordPressClient::new(config).unwrap();

        assert_ok!(client.commerce_get("/products").await);

        let request = &backend.requests()[0];
        assert_eq!(request.header("authorization"), Some(ADMIN_AUTH));
        assert_eq!(request.query, None);
    }

    #[tokio::test]
    async fn test_plugin_post_targets_plugin_prefix() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/banildtools/v1/read").json(json!({"path": "a.php"})),
        ])
        .await;

        let value = assert_ok!(
            backend
                .client()
                .plugin_post("/read", &json!({"target_file": "a.php"}))
                .await
        );
        assert_eq!(value["path"], "a.php");
        let request = &backend.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header("authorization"), Some(ADMIN_AUTH));
    }

    #[tokio::test]
    async fn test_plugin_error_names_surface() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/banildtools/v1/delete")
                .status(StatusCode::FORBIDDEN)
                .text("delete disabled"),
        ])
        .await;

        let err = assert_err!(
            backend
                .client()
                .plugin_post("/delete", &json!({}))
                .await
        );
        assert_eq!(
            err.to_string(),
            "BanildTools API error: 403 Forbidden - delete disabled"
        );
    }
}
