//! WooCommerce tools (`woocommerce_*`), served from `/wp-json/wc/v3`.

pub mod products;

use crate::domains::tools::ToolRegistry;

pub fn register(registry: &mut ToolRegistry) {
    products::register(registry);
}
