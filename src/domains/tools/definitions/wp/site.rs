//! Site discovery, connection check and settings tools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{NoParams, format_user};
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<GetSiteInfoTool>()
        .register::<TestConnectionTool>()
        .register::<GetSettingsTool>()
        .register::<UpdateSettingsTool>();
}

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

pub struct GetSiteInfoTool;

impl ToolDefinition for GetSiteInfoTool {
    const NAME: &'static str = "wordpress_get_site_info";
    const DESCRIPTION: &'static str =
        "Get complete WordPress site information including available API routes";
    const FAILURE: &'static str = "Failed to get site info";
    type Params = NoParams;

    async fn execute(client: &WordPressClient, _params: Self::Params) -> ToolResult {
        let site = client.root().await?;

        let routes: Vec<&String> = site
            .get("routes")
            .and_then(Value::as_object)
            .map(|routes| routes.keys().collect())
            .unwrap_or_default();

        Ok(ToolReply::new(
            format!("Site: {}", text(&site, "name")),
            json!({
                "name": site.get("name"),
                "description": site.get("description"),
                "url": site.get("url"),
                "homeUrl": site.get("home"),
                "gmtOffset": site.get("gmt_offset"),
                "timezoneString": site.get("timezone_string"),
                "namespaces": site.get("namespaces"),
                "authentication": site.get("authentication"),
                "routes": routes,
            }),
        ))
    }
}

pub struct TestConnectionTool;

impl ToolDefinition for TestConnectionTool {
    const NAME: &'static str = "wordpress_test_connection";
    const DESCRIPTION: &'static str = "Test WordPress connection and authentication";
    const FAILURE: &'static str = "Connection test failed";
    type Params = NoParams;

    async fn execute(client: &WordPressClient, _params: Self::Params) -> ToolResult {
        let user = client.core_get("/users/me").await?;
        Ok(ToolReply::new(
            format!("Connected as {}", text(&user, "name")),
            json!({"connected": true, "user": format_user(&user)}),
        ))
    }
}

pub struct GetSettingsTool;

impl ToolDefinition for GetSettingsTool {
    const NAME: &'static str = "wordpress_get_settings";
    const DESCRIPTION: &'static str = "Get WordPress site settings";
    const FAILURE: &'static str = "Failed to get settings";
    type Params = NoParams;

    async fn execute(client: &WordPressClient, _params: Self::Params) -> ToolResult {
        let settings = client.core_get("/settings").await?;
        Ok(ToolReply::new(
            "Retrieved site settings",
            json!({
                "title": settings.get("title"),
                "description": settings.get("description"),
                "url": settings.get("url"),
                "email": settings.get("email"),
                "timezone": settings.get("timezone"),
                "dateFormat": settings.get("date_format"),
                "timeFormat": settings.get("time_format"),
                "language": settings.get("language"),
                "postsPerPage": settings.get("posts_per_page"),
            }),
        ))
    }
}

/// Any subset of the site settings, passed through unchanged.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateSettingsParams {
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

pub struct UpdateSettingsTool;

impl ToolDefinition for UpdateSettingsTool {
    const NAME: &'static str = "wordpress_update_settings";
    const DESCRIPTION: &'static str =
        "Update site settings (title, description, timezone, etc). Pass settings as top-level arguments";
    const FAILURE: &'static str = "Failed to update settings";
    type Params = UpdateSettingsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let body = Value::Object(params.settings);
        let settings = client.core(Method::PUT, "/settings", Some(&body)).await?;
        Ok(ToolReply::new("Updated site settings", settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use axum::http::StatusCode;
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_site_info_lists_route_keys() {
        let backend = MockBackend::start(vec![MockRoute::get("/wp-json/").json(json!({
            "name": "Demo",
            "description": "Just another site",
            "url": "https://example.com",
            "home": "https://example.com",
            "gmt_offset": 1,
            "timezone_string": "Europe/Paris",
            "namespaces": ["wp/v2"],
            "authentication": {},
            "routes": {"/": {}, "/wp/v2": {}}
        }))])
        .await;

        let reply = assert_ok!(GetSiteInfoTool::execute(&backend.client(), NoParams {}).await);
        assert_eq!(reply.message, "Site: Demo");
        assert_eq!(reply.payload["homeUrl"], "https://example.com");
        assert_eq!(reply.payload["routes"], json!(["/", "/wp/v2"]));
    }

    #[tokio::test]
    async fn test_connection_failure_prefix() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wp/v2/users/me")
                .status(StatusCode::UNAUTHORIZED)
                .text("bad creds"),
        ])
        .await;

        let err = assert_err!(TestConnectionTool::execute(&backend.client(), NoParams {}).await);
        assert_eq!(
            err.envelope_message(TestConnectionTool::FAILURE),
            "Connection test failed: WordPress API error: 401 Unauthorized - bad creds"
        );
    }

    #[tokio::test]
    async fn test_update_settings_passes_arguments_through() {
        let backend = MockBackend::start(vec![
            MockRoute::put("/wp-json/wp/v2/settings").json(json!({"title": "New"})),
        ])
        .await;
        let params = serde_json::from_value(json!({"title": "New", "posts_per_page": 5})).unwrap();
        let reply = assert_ok!(UpdateSettingsTool::execute(&backend.client(), params).await);
        assert_eq!(reply.payload, json!({"title": "New"}));
        assert_eq!(
            backend.requests()[0].json(),
            json!({"title": "New", "posts_per_page": 5})
        );
    }
}
