//! WordPress core tools (`wordpress_*`).
//!
//! Every tool here talks to `/wp-json/wp/v2` except the SEO tools, which
//! route product targets through the commerce API, and plugin search, which
//! falls back to the public plugin directory.

pub mod comments;
pub mod cpt;
pub mod media;
pub mod pages;
pub mod plugins;
pub mod posts;
pub mod seo;
pub mod site;
pub mod taxonomy;
pub mod users;

use crate::domains::tools::ToolRegistry;

/// Register all WordPress core tools in listing order.
pub fn register(registry: &mut ToolRegistry) {
    posts::register(registry);
    pages::register(registry);
    media::register(registry);
    users::register(registry);
    taxonomy::register(registry);
    comments::register(registry);
    site::register(registry);
    plugins::register(registry);
    seo::register(registry);
    cpt::register(registry);
}
