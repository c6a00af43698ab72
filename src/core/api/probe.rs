//! BanildTools availability probe.

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::{WordPressClient, reason};
use super::error::error_chain;

/// Discovery endpoint of the companion plugin.
const DISCOVERY_ENDPOINT: &str = "/tools";

/// Outcome of the startup probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginStatus {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools_count: Option<u64>,
    pub message: String,
}

impl PluginStatus {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            available: false,
            version: None,
            tools_count: None,
            message: message.into(),
        }
    }

    fn detected(version: Option<String>, tools_count: Option<u64>) -> Self {
        let mut message = String::from("BanildTools");
        if let Some(version) = &version {
            message.push_str(&format!(" v{version}"));
        }
        message.push_str(" detected");
        if let Some(count) = tools_count {
            message.push_str(&format!(" ({count} additional tools)"));
        }
        Self {
            available: true,
            version,
            tools_count,
            message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    tools_count: Option<u64>,
}

impl WordPressClient {
    /// Check whether the BanildTools plugin answers on this site.
    ///
    /// Never fails: every problem is folded into an unavailable status. The
    /// request is sent without credentials.
    pub async fn probe_plugin(&self) -> PluginStatus {
        let url = self.plugin_url(DISCOVERY_ENDPOINT);
        debug!(%url, "Probing BanildTools");

        let response = match self
            .http()
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return PluginStatus::unavailable(format!(
                    "BanildTools check failed: {}",
                    error_chain(&e)
                ));
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return PluginStatus::unavailable("BanildTools plugin not installed or inactive");
        }
        if !status.is_success() {
            return PluginStatus::unavailable(format!(
                "BanildTools check failed: {} {}",
                status.as_u16(),
                reason(status)
            ));
        }

        match response.json::<DiscoveryDocument>().await {
            Ok(doc) => PluginStatus::detected(doc.version, doc.tools_count),
            Err(e) => PluginStatus::unavailable(format!(
                "BanildTools check failed: {}",
                error_chain(&e)
            )),
        }
    }
}
