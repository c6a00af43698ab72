//! SEO and custom meta tools.
//!
//! Yoast keeps SEO data in two places: classic post meta and, since 26.6, its
//! own indexable table. Post meta is written through the content API (or the
//! WooCommerce API for products); the indexable row through BanildTools.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::core::api::{Method, WordPressClient};
use crate::domains::tools::{ToolDefinition, ToolError, ToolRegistry, ToolReply, ToolResult};

pub fn register(registry: &mut ToolRegistry) {
    registry
        .register::<SetSeoMetaTool>()
        .register::<SetCustomMetaTool>();
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetSeoMetaParams {
    /// Post ID (provide postId or productId).
    pub post_id: Option<u64>,

    /// WooCommerce product ID. Takes precedence over postId.
    pub product_id: Option<u64>,

    pub meta_description: Option<String>,
    pub focus_keyword: Option<String>,
    pub canonical_url: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub twitter_title: Option<String>,
    pub twitter_description: Option<String>,
}

/// Object whose SEO data is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SeoTarget {
    Post(u64),
    Product(u64),
}

impl SeoTarget {
    fn id(self) -> u64 {
        match self {
            Self::Post(id) | Self::Product(id) => id,
        }
    }

    fn object_type(self) -> &'static str {
        match self {
            Self::Post(_) => "post",
            Self::Product(_) => "product",
        }
    }

    fn id_key(self) -> &'static str {
        match self {
            Self::Post(_) => "postId",
            Self::Product(_) => "productId",
        }
    }
}

/// One SEO field: its Yoast post meta key and indexable column.
struct SeoField<'a> {
    meta_key: &'static str,
    indexable_key: &'static str,
    value: &'a str,
}

impl SetSeoMetaParams {
    fn target(&self) -> Option<SeoTarget> {
        match (self.product_id, self.post_id) {
            (Some(id), _) => Some(SeoTarget::Product(id)),
            (None, Some(id)) => Some(SeoTarget::Post(id)),
            (None, None) => None,
        }
    }

    /// The non-empty fields, in a fixed order.
    fn fields(&self) -> Vec<SeoField<'_>> {
        [
            ("_yoast_wpseo_metadesc", "description", &self.meta_description),
            ("_yoast_wpseo_focuskw", "primary_focus_keyword", &self.focus_keyword),
            ("_yoast_wpseo_canonical", "canonical", &self.canonical_url),
            ("_yoast_wpseo_opengraph-title", "open_graph_title", &self.og_title),
            (
                "_yoast_wpseo_opengraph-description",
                "open_graph_description",
                &self.og_description,
            ),
            ("_yoast_wpseo_twitter-title", "twitter_title", &self.twitter_title),
            (
                "_yoast_wpseo_twitter-description",
                "twitter_description",
                &self.twitter_description,
            ),
        ]
        .into_iter()
        .filter_map(|(meta_key, indexable_key, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|value| SeoField {
                    meta_key,
                    indexable_key,
                    value,
                })
        })
        .collect()
    }
}

async fn write_post_meta(
    client: &WordPressClient,
    target: SeoTarget,
    fields: &[SeoField<'_>],
) -> Result<(), ToolError> {
    match target {
        SeoTarget::Product(id) => {
            let meta_data: Vec<Value> = fields
                .iter()
                .map(|f| json!({"key": f.meta_key, "value": f.value}))
                .collect();
            let body = json!({"meta_data": meta_data});
            client
                .commerce(Method::PUT, &format!("/products/{id}"), Some(&body))
                .await?;
        }
        SeoTarget::Post(id) => {
            let meta: Map<String, Value> = fields
                .iter()
                .map(|f| (f.meta_key.to_string(), json!(f.value)))
                .collect();
            let body = json!({"meta": meta});
            client
                .core(Method::PUT, &format!("/posts/{id}"), Some(&body))
                .await?;
        }
    }
    Ok(())
}

async fn write_indexable(
    client: &WordPressClient,
    target: SeoTarget,
    fields: &[SeoField<'_>],
) -> Result<(), ToolError> {
    let mut body = json!({
        "object_id": target.id(),
        "object_type": target.object_type(),
    });
    for field in fields {
        body[field.indexable_key] = json!(field.value);
    }
    client.plugin_post("/yoast-indexable", &body).await?;
    Ok(())
}

pub struct SetSeoMetaTool;

impl ToolDefinition for SetSeoMetaTool {
    const NAME: &'static str = "wordpress_set_seo_meta";
    const DESCRIPTION: &'static str = "Set SEO metadata for posts/products. Updates both post meta AND wp_yoast_indexable table for Yoast SEO 26.6+ compatibility (requires BanildTools plugin).";
    const FAILURE: &'static str = "Failed to set SEO meta";
    type Params = SetSeoMetaParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let Some(target) = params.target() else {
            return Err(ToolError::invalid_arguments(
                "Provide either postId or productId",
            ));
        };
        let fields = params.fields();

        write_post_meta(client, target, &fields).await?;

        // The indexable write is best-effort: post meta is already stored.
        let indexable = write_indexable(client, target, &fields).await;

        let mut message = format!(
            "Set SEO metadata for {} {}",
            target.object_type(),
            target.id()
        );
        let meta_keys: Vec<&str> = fields.iter().map(|f| f.meta_key).collect();
        let mut payload = Map::new();
        payload.insert(target.id_key().to_string(), json!(target.id()));
        payload.insert("metaFieldsSet".to_string(), json!(meta_keys));
        payload.insert("yoastIndexableUpdated".to_string(), json!(indexable.is_ok()));
        match indexable {
            Ok(()) => message.push_str(" (+ Yoast indexable)"),
            Err(err) => {
                warn!(
                    object_id = target.id(),
                    error = %err,
                    "Yoast indexable update failed; post meta was set"
                );
                message.push_str(" (Yoast indexable not updated)");
                payload.insert("yoastIndexableError".to_string(), json!(err.to_string()));
            }
        }

        Ok(ToolReply::new(message, Value::Object(payload)))
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetCustomMetaParams {
    pub post_id: u64,
    pub meta_key: String,

    /// Value stored under `metaKey`.
    pub meta_value: Value,
}

pub struct SetCustomMetaTool;

impl ToolDefinition for SetCustomMetaTool {
    const NAME: &'static str = "wordpress_set_custom_meta";
    const DESCRIPTION: &'static str =
        "Set custom post metadata field - useful for custom fields and plugins";
    const FAILURE: &'static str = "Failed to set custom meta";
    type Params = SetCustomMetaParams;

    async fn execute(client: &WordPressClient, params: Self::Params) -> ToolResult {
        let mut meta = Map::new();
        meta.insert(params.meta_key.clone(), params.meta_value.clone());
        let body = json!({"meta": meta});
        client
            .core(Method::PUT, &format!("/posts/{}", params.post_id), Some(&body))
            .await?;

        Ok(ToolReply::new(
            format!(
                "Set custom meta \"{}\" for post {}",
                params.meta_key, params.post_id
            ),
            json!({
                "postId": params.post_id,
                "metaKey": params.meta_key,
                "metaValue": params.meta_value,
                "set": true,
            }),
        ))
    }
}
