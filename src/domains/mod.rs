//! Business logic organized by bounded context.
//!
//! The server only exposes tools; each tool maps onto one or more WordPress,
//! WooCommerce or BanildTools REST calls.

pub mod tools;
