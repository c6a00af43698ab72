//! Shared helpers for tool definitions: result formatters, query building
//! and sequential batches.

use std::fmt::Display;
use std::future::Future;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use url::form_urlencoded;

use crate::domains::tools::ToolError;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// Parameters of tools that take none.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// Characters kept from an excerpt.
pub const EXCERPT_LEN: usize = 150;

/// Remove anything that looks like an HTML tag.
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// Tag-free excerpt, cut to [`EXCERPT_LEN`] characters.
pub fn excerpt(html: &str) -> String {
    strip_html(html).chars().take(EXCERPT_LEN).collect()
}

/// `value[field].rendered`, or "" when absent.
pub fn rendered<'a>(value: &'a Value, field: &str) -> &'a str {
    value
        .get(field)
        .and_then(|f| f.get("rendered"))
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn field(value: &Value, name: &str) -> Value {
    value.get(name).cloned().unwrap_or(Value::Null)
}

pub fn format_post(post: &Value) -> Value {
    json!({
        "id": field(post, "id"),
        "title": rendered(post, "title"),
        "status": field(post, "status"),
        "slug": field(post, "slug"),
        "date": field(post, "date"),
        "modified": field(post, "modified"),
        "link": field(post, "link"),
        "excerpt": excerpt(rendered(post, "excerpt")),
    })
}

pub fn format_page(page: &Value) -> Value {
    json!({
        "id": field(page, "id"),
        "title": rendered(page, "title"),
        "status": field(page, "status"),
        "slug": field(page, "slug"),
        "link": field(page, "link"),
        "parent": field(page, "parent"),
        "menu_order": field(page, "menu_order"),
    })
}

pub fn format_user(user: &Value) -> Value {
    json!({
        "id": field(user, "id"),
        "username": field(user, "username"),
        "name": field(user, "name"),
        "email": field(user, "email"),
        "roles": field(user, "roles"),
        "link": field(user, "link"),
    })
}

pub fn format_comment(comment: &Value) -> Value {
    json!({
        "id": field(comment, "id"),
        "post": field(comment, "post"),
        "author": field(comment, "author_name"),
        "content": strip_html(rendered(comment, "content")),
        "date": field(comment, "date"),
        "status": field(comment, "status"),
    })
}

pub fn format_media(media: &Value) -> Value {
    json!({
        "id": field(media, "id"),
        "title": rendered(media, "title"),
        "url": field(media, "source_url"),
        "type": field(media, "media_type"),
        "mimeType": field(media, "mime_type"),
        "alt": field(media, "alt_text"),
    })
}

/// The elements of a list response. Anything but an array is an error.
pub fn as_list(value: Value) -> Result<Vec<Value>, ToolError> {
    match value {
        Value::Array(items) => Ok(items),
        other => Err(ToolError::unexpected_response(format!(
            "expected a JSON array, got {}",
            kind_name(&other)
        ))),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Format every element of a list response.
pub fn format_list(value: Value, format: fn(&Value) -> Value) -> Result<Vec<Value>, ToolError> {
    Ok(as_list(value)?.iter().map(format).collect())
}

/// `path`, with `?force=true` when `force` is set.
///
/// Without it, deletes of trashable objects move them to the trash.
pub fn force_endpoint(path: &str, force: bool) -> String {
    if force {
        format!("{path}?force=true")
    } else {
        path.to_string()
    }
}

/// URL query builder that drops empty values.
#[derive(Debug, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, key: impl Into<String>, value: impl Display) -> Self {
        let value = value.to_string();
        if !value.is_empty() {
            self.pairs.push((key.into(), value));
        }
        self
    }

    pub fn push_opt(self, key: impl Into<String>, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    /// Encoded query string, without the leading `?`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.pairs)
            .finish()
    }

    /// `path` with the query appended, or `path` alone when empty.
    pub fn endpoint(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{}", self.encode())
        }
    }
}

/// Run `op` over `items` one at a time, in order.
///
/// Stops at the first failure; the error records how many items completed.
pub async fn run_sequential<I, T, F, Fut>(items: Vec<I>, mut op: F) -> Result<Vec<T>, ToolError>
where
    F: FnMut(I) -> Fut,
    Fut: Future<Output = Result<T, ToolError>>,
{
    let total = items.len();
    let mut results = Vec::with_capacity(total);

    for (index, item) in items.into_iter().enumerate() {
        match op(item).await {
            Ok(result) => results.push(result),
            Err(source) => {
                return Err(ToolError::BatchAborted {
                    completed: index,
                    total,
                    source: Box::new(source),
                });
            }
        }
    }

    Ok(results)
}
