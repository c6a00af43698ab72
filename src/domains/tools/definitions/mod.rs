//! The tool catalog, grouped by backend surface.

pub mod banild;
pub mod common;
pub mod woo;
pub mod wp;

use super::ToolRegistry;

/// Tools that only need WordPress (and WooCommerce) REST access.
pub fn register_core(registry: &mut ToolRegistry) {
    wp::register(registry);
    woo::register(registry);
}

/// Tools served by the BanildTools plugin.
pub fn register_banild(registry: &mut ToolRegistry) {
    banild::register(registry);
}
