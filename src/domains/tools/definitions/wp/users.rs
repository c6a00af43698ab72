//! User management tools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use super::posts::{default_page, default_per_page};
use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{Query, format_list, format_user};
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<CreateUserTool>()
        .register::<GetUsersTool>()
        .register::<UpdateUserTool>()
        .register::<DeleteUserTool>();
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    pub password: String,

    /// Role slugs. Defaults to `["subscriber"]`.
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,

    /// Display name.
    pub name: Option<String>,
}

fn default_roles() -> Vec<String> {
    vec!["subscriber".to_string()]
}

pub struct CreateUserTool;

impl ToolDefinition for CreateUserTool {
    const NAME: &'static str = "wordpress_create_user";
    const DESCRIPTION: &'static str = "Create a new WordPress user with roles";
    const FAILURE: &'static str = "Failed to create user";
    type Params = CreateUserParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut body = json!({
            "username": params.username,
            "email": params.email,
            "password": params.password,
            "roles": params.roles,
        });
        if let Some(name) = params.name {
            body["name"] = Value::String(name);
        }

        let user = client.core(Method::POST, "/users", Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Created user: {}", params.username),
            format_user(&user),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetUsersParams {
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    #[serde(default = "default_page")]
    pub page: u32,

    /// Filter by role, e.g. 'editor'.
    pub roles: Option<String>,

    pub search: Option<String>,
}

pub struct GetUsersTool;

impl ToolDefinition for GetUsersTool {
    const NAME: &'static str = "wordpress_get_users";
    const DESCRIPTION: &'static str = "Get WordPress users with role filtering";
    const FAILURE: &'static str = "Failed to get users";
    type Params = GetUsersParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("per_page", params.per_page)
            .push("page", params.page)
            .push_opt("roles", params.roles)
            .push_opt("search", params.search)
            .endpoint("/users");

        let users = format_list(client.core_get(&endpoint).await?, format_user)?;
        Ok(ToolReply::new(
            format!("Retrieved {} users", users.len()),
            json!({"count": users.len(), "users": users}),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    pub user_id: u64,

    /// Fields to change (name, email, roles, password, ...).
    pub updates: Map<String, Value>,
}

pub struct UpdateUserTool;

impl ToolDefinition for UpdateUserTool {
    const NAME: &'static str = "wordpress_update_user";
    const DESCRIPTION: &'static str = "Update user information (name, email, roles, password)";
    const FAILURE: &'static str = "Failed to update user";
    type Params = UpdateUserParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = format!("/users/{}", params.user_id);
        let body = Value::Object(params.updates);
        let user = client.core(Method::PUT, &endpoint, Some(&body)).await?;
        Ok(ToolReply::new(
            format!("Updated user ID {}", params.user_id),
            format_user(&user),
        ))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserParams {
    pub user_id: u64,

    /// User who receives the deleted user's content.
    pub reassign: Option<u64>,
}

pub struct DeleteUserTool;

impl ToolDefinition for DeleteUserTool {
    const NAME: &'static str = "wordpress_delete_user";
    const DESCRIPTION: &'static str = "Delete a user (reassign their content to another user)";
    const FAILURE: &'static str = "Failed to delete user";
    type Params = DeleteUserParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        // Users cannot be trashed; the API refuses deletes without force.
        let endpoint = Query::new()
            .push_opt("reassign", params.reassign)
            .push("force", true)
            .endpoint(&format!("/users/{}", params.user_id));

        client.core(Method::DELETE, &endpoint, None).await?;
        Ok(ToolReply::new(
            format!("Deleted user ID {}", params.user_id),
            json!({"id": params.user_id, "deleted": true}),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_create_user_defaults_to_subscriber() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/wp/v2/users").json(json!({
                "id": 5, "username": "jo", "name": "Jo", "email": "jo@example.com",
                "roles": ["subscriber"], "link": "https://example.com/author/jo"
            })),
        ])
        .await;

        let params = serde_json::from_value(json!({
            "username": "jo", "email": "jo@example.com", "password": "pw"
        }))
        .unwrap();
        let reply = assert_ok!(CreateUserTool::execute(&backend.client(), params).await);
        assert_eq!(reply.message, "Created user: jo");
        assert_eq!(reply.payload["roles"], json!(["subscriber"]));

        let body = backend.requests()[0].json();
        assert_eq!(body["roles"], json!(["subscriber"]));
        assert!(body.get("name").is_none());
    }

    #[tokio::test]
    async fn test_delete_user_always_forces() {
        let backend =
            MockBackend::start(vec![MockRoute::delete("/wp-json/wp/v2/users/9")]).await;
        let client = backend.client();

        let params = serde_json::from_value(json!({"userId": 9})).unwrap();
        assert_ok!(DeleteUserTool::execute(&client, params).await);
        let params = serde_json::from_value(json!({"userId": 9, "reassign": 1})).unwrap();
        assert_ok!(DeleteUserTool::execute(&client, params).await);

        let requests = backend.requests();
        assert_eq!(requests[0].query.as_deref(), Some("force=true"));
        assert_eq!(requests[1].query.as_deref(), Some("reassign=1&force=true"));
    }

    #[tokio::test]
    async fn test_get_users_filters() {
        let backend =
            MockBackend::start(vec![MockRoute::get("/wp-json/wp/v2/users").json(json!([]))]).await;
        let params = serde_json::from_value(json!({"roles": "editor", "search": "ann"})).unwrap();
        let reply = assert_ok!(GetUsersTool::execute(&backend.client(), params).await);
        assert_eq!(reply.payload["count"], 0);
        assert_eq!(
            backend.requests()[0].query.as_deref(),
            Some("per_page=10&page=1&roles=editor&search=ann")
        );
    }
}
