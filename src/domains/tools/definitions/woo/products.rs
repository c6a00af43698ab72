//! Product catalogue tools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::definitions::common::{Query, as_list};
use crate::domains::tools::definitions::wp::posts::default_page;
use crate::domains::tools::{ToolDefinition, ToolRegistry, ToolReply, ToolResult};

const PRICE_FIELDS: [&str; 2] = ["regular_price", "sale_price"];

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<GetProductsTool>()
        .register::<CreateProductTool>()
        .register::<UpdateProductTool>()
        .register::<DeleteProductTool>();
}

/// WooCommerce rejects numeric prices; send them as strings.
pub fn stringify_prices(fields: &mut Map<String, Value>) {
    for key in PRICE_FIELDS {
        if let Some(price) = fields.get_mut(key) {
            match price {
                Value::String(_) | Value::Null => {}
                other => *other = Value::String(other.to_string()),
            }
        }
    }
}

fn default_product_page_size() -> u32 {
    20
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetProductsParams {
    #[serde(default = "default_product_page_size")]
    pub per_page: u32,

    #[serde(default = "default_page")]
    pub page: u32,

    pub search: Option<String>,
}

pub struct GetProductsTool;

impl ToolDefinition for GetProductsTool {
    const NAME: &'static str = "woocommerce_get_products";
    const DESCRIPTION: &'static str = "Get WooCommerce products";
    const FAILURE: &'static str = "Failed to get products";
    type Params = GetProductsParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = Query::new()
            .push("per_page", params.per_page)
            .push("page", params.page)
            .push_opt("search", params.search.as_deref())
            .endpoint("/products");

        let products = as_list(client.commerce_get(&endpoint).await?)?;
        Ok(ToolReply::new(
            format!("Retrieved {} products", products.len()),
            json!({"count": products.len(), "products": products}),
        ))
    }
}

/// Product fields. `name` is required; everything else (type,
/// regular_price, description, short_description, categories, images, ...)
/// is passed through.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateProductParams {
    pub name: String,

    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

pub struct CreateProductTool;

impl ToolDefinition for CreateProductTool {
    const NAME: &'static str = "woocommerce_create_product";
    const DESCRIPTION: &'static str = "Create WooCommerce product";
    const FAILURE: &'static str = "Failed to create product";
    type Params = CreateProductParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut fields = params.fields;
        fields.insert("name".to_string(), Value::String(params.name));
        stringify_prices(&mut fields);

        let product = client
            .commerce(Method::POST, "/products", Some(&Value::Object(fields)))
            .await?;
        let name = product
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        Ok(ToolReply::new(format!("Created product: {name}"), product))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdateProductParams {
    pub id: u64,

    /// Fields to change.
    pub updates: Map<String, Value>,
}

pub struct UpdateProductTool;

impl ToolDefinition for UpdateProductTool {
    const NAME: &'static str = "woocommerce_update_product";
    const DESCRIPTION: &'static str = "Update WooCommerce product";
    const FAILURE: &'static str = "Failed to update product";
    type Params = UpdateProductParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut updates = params.updates;
        stringify_prices(&mut updates);

        let endpoint = format!("/products/{}", params.id);
        let product = client
            .commerce(Method::PUT, &endpoint, Some(&Value::Object(updates)))
            .await?;
        Ok(ToolReply::new(format!("Updated product {}", params.id), product))
    }
}

fn default_force() -> bool {
    true
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteProductParams {
    pub id: u64,

    /// Permanently delete instead of trashing.
    #[serde(default = "default_force")]
    pub force: bool,
}

pub struct DeleteProductTool;

impl ToolDefinition for DeleteProductTool {
    const NAME: &'static str = "woocommerce_delete_product";
    const DESCRIPTION: &'static str = "Delete WooCommerce product";
    const FAILURE: &'static str = "Failed to delete product";
    type Params = DeleteProductParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let endpoint = format!("/products/{}?force={}", params.id, params.force);
        let product = client.commerce(Method::DELETE, &endpoint, None).await?;
        Ok(ToolReply::new(format!("Deleted product {}", params.id), product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::test_support::{MockBackend, MockRoute};
    use tokio_test::assert_ok;

    #[test]
    fn test_stringify_prices() {
        let mut fields = json!({"regular_price": 19.5, "sale_price": "9", "stock": 3})
            .as_object()
            .cloned()
            .unwrap();
        stringify_prices(&mut fields);
        assert_eq!(fields["regular_price"], "19.5");
        assert_eq!(fields["sale_price"], "9");
        assert_eq!(fields["stock"], 3);
    }

    #[tokio::test]
    async fn test_get_products_uses_query_credentials() {
        let backend = MockBackend::start(vec![
            MockRoute::get("/wp-json/wc/v3/products").json(json!([{"id": 1}])),
        ])
        .await;
        let client = WordPressClient::new(backend.config().with_commerce_keys("ck_1", "cs_2")).unwrap();

        let params = serde_json::from_value(json!({"search": "mug"})).unwrap();
        let reply = assert_ok!(GetProductsTool::execute(&client, params).await);
        assert_eq!(reply.message, "Retrieved 1 products");

        let request = &backend.requests()[0];
        assert_eq!(
            request.query.as_deref(),
            Some("per_page=20&page=1&search=mug&consumer_key=ck_1&consumer_secret=cs_2")
        );
        assert!(request.header("authorization").is_none());
    }

    #[tokio::test]
    async fn test_create_product_sends_string_prices() {
        let backend = MockBackend::start(vec![
            MockRoute::post("/wp-json/wc/v3/products").json(json!({"id": 5, "name": "Mug"})),
        ])
        .await;

        let params =
            serde_json::from_value(json!({"name": "Mug", "regular_price": 12, "type": "simple"})).unwrap();
        let reply = assert_ok!(CreateProductTool::execute(&backend.client(), params).await);
        assert_eq!(reply.message, "Created product: Mug");
        assert_eq!(
            backend.requests()[0].json(),
            json!({"name": "Mug", "regular_price": "12", "type": "simple"})
        );
        assert!(backend.requests()[0].header("authorization").is_some());
    }

    #[tokio::test]
    async fn test_delete_product_forces_by_default() {
        let backend = MockBackend::start(vec![
            MockRoute::delete("/wp-json/wc/v3/products/5").json(json!({"id": 5})),
        ])
        .await;

        let params = serde_json::from_value(json!({"id": 5})).unwrap();
        let reply = assert_ok!(DeleteProductTool::execute(&backend.client(), params).await);
        assert_eq!(reply.message, "Deleted product 5");
        assert_eq!(backend.requests()[0].query.as_deref(), Some("force=true"));
    }
}
