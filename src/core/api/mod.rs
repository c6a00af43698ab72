//! WordPress REST API access.
//!
//! One [`WordPressClient`] serves every backend surface:
//!
//! - core content API (`/wp-json/wp/v2`) and the discovery document
//! - WooCommerce (`/wp-json/wc/v3`)
//! - the BanildTools companion plugin (`/wp-json/banildtools/v1`)
//! - the public WordPress.org plugin directory
//!
//! Wrappers return parsed JSON or an [`ApiError`] whose message is safe to
//! show to the caller.

mod client;
mod directory;
mod error;
mod multipart;
mod probe;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{COMMERCE_PREFIX, CORE_PREFIX, PLUGIN_PREFIX, ROOT_PATH, WordPressClient};
pub use directory::{DirectoryPlugin, DirectoryQuery, normalize_listing};
pub use error::{ApiError, ApiResult, Surface, error_chain};
pub use multipart::{FALLBACK_FILENAME, MultipartBody, filename_from_url, mime_for_filename};
pub use probe::PluginStatus;
pub use reqwest::Method;
