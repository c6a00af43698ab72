//! Public WordPress.org plugin directory search.
//!
//! The directory exposes plugins through two differently shaped listings.
//! Queries are tried in a fixed order and the first one that answers with
//! JSON wins; if every query fails, the last failure is returned.

use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::client::{WordPressClient, read_json};
use super::error::{ApiError, ApiResult, Surface};

/// Directory query shapes, in the order they are attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryQuery {
    /// `/plugin?search=..` on the plugin post type.
    PluginCollection,
    /// `/search?search=..&subtype=plugin` on the generic search endpoint.
    SiteSearch,
}

impl DirectoryQuery {
    pub const ORDER: [DirectoryQuery; 2] = [Self::PluginCollection, Self::SiteSearch];

    fn url(self, base: &str, query: &str, page: u32, per_page: u32) -> ApiResult<String> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let (path, pairs) = match self {
            Self::PluginCollection => (
                "/plugin",
                vec![("search", query), ("page", page.as_str()), ("per_page", per_page.as_str())],
            ),
            Self::SiteSearch => (
                "/search",
                vec![
                    ("search", query),
                    ("subtype", "plugin"),
                    ("page", page.as_str()),
                    ("per_page", per_page.as_str()),
                ],
            ),
        };
        let encoded =
            serde_urlencoded::to_string(pairs).map_err(|e| ApiError::invalid_request(e.to_string()))?;
        Ok(format!("{base}{path}?{encoded}"))
    }
}

/// A directory entry reduced to the fields tools display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryPlugin {
    pub slug: String,
    pub name: String,
    pub description: String,
}

impl WordPressClient {
    /// Search the public plugin directory.
    pub async fn search_plugin_directory(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Vec<DirectoryPlugin>> {
        let mut last_error = None;

        for strategy in DirectoryQuery::ORDER {
            match self.run_directory_query(strategy, query, page, per_page).await {
                Ok(plugins) => return Ok(plugins),
                Err(e) => {
                    debug!(?strategy, error = %e, "Directory query failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::invalid_request("no directory query attempted")))
    }

    async fn run_directory_query(
        &self,
        strategy: DirectoryQuery,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<Vec<DirectoryPlugin>> {
        let url = strategy.url(&self.config().directory_url, query, page, per_page)?;
        let response = self
            .http()
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ApiError::transport(Surface::Directory, &e))?;

        let listing = read_json(Surface::Directory, response).await?;
        Ok(normalize_listing(&listing))
    }
}

/// Normalize a directory listing. Only a JSON array carries plugins;
/// any other shape yields an empty list.
pub fn normalize_listing(listing: &Value) -> Vec<DirectoryPlugin> {
    match listing {
        Value::Array(items) => items.iter().map(normalize_entry).collect(),
        _ => Vec::new(),
    }
}

fn normalize_entry(item: &Value) -> DirectoryPlugin {
    let slug = text(item.get("slug"))
        .or_else(|| {
            item.get("url")
                .and_then(Value::as_str)
                .map(|url| url.split("/plugins/").nth(1).unwrap_or_default())
                .map(|rest| rest.strip_suffix('/').unwrap_or(rest).to_string())
        })
        .unwrap_or_default();

    let name = rendered(item, "name")
        .or_else(|| rendered(item, "title"))
        .or_else(|| text(item.get("title")))
        .unwrap_or_else(|| slug.clone());

    let description = rendered(item, "short_description")
        .or_else(|| rendered(item, "excerpt"))
        .or_else(|| text(item.get("description")))
        .unwrap_or_default();

    DirectoryPlugin {
        slug,
        name,
        description,
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn rendered(item: &Value, key: &str) -> Option<String> {
    text(item.get(key).and_then(|field| field.get("rendered")))
}
