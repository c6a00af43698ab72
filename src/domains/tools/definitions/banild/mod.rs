//! BanildTools companion plugin tools (`banildtools_*`).
//!
//! Only registered when the startup probe finds the plugin. Parameters are
//! snake_case and double as the request body: each params struct serializes
//! straight into the JSON posted to `/wp-json/banildtools/v1`.

pub mod files;
pub mod maintenance;
pub mod options;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::core::api::WordPressClient;
use crate::domains::tools::{ToolError, ToolRegistry};

pub fn register(registry: &mut ToolRegistry) {
    files::register(registry);
    options::register(registry);
    maintenance::register(registry);
}

/// POST `params` as JSON to a plugin endpoint.
async fn post<P: Serialize>(
    client: &WordPressClient,
    endpoint: &str,
    params: &P,
) -> Result<Value, ToolError> {
    let body = serde_json::to_value(params).map_err(|e| ToolError::internal(e.to_string()))?;
    Ok(client.plugin_post(endpoint, &body).await?)
}

/// Copy the named fields of a plugin response. Absent fields are left out.
fn pick(result: &Value, keys: &[&str]) -> Value {
    let fields: Map<String, Value> = keys
        .iter()
        .filter_map(|key| result.get(*key).map(|value| (key.to_string(), value.clone())))
        .collect();
    Value::Object(fields)
}

/// Display form of a response field for messages; `?` when missing.
fn show(result: &Value, key: &str) -> String {
    match result.get(key) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => "?".to_string(),
        Some(other) => other.to_string(),
    }
}

fn flag(result: &Value, key: &str) -> bool {
    result.get(key).and_then(Value::as_bool).unwrap_or(false)
}
