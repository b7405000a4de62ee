//! Session configuration from environment variables.
//!
//! The storefront scopes its cart by an id carried in the session. Until carts
//! are scoped per user, every session shares the demo cart unless
//! `CSHOP_CART_ID` names another one.

/// Cart id used when none is configured.
pub const DEMO_CART_ID: &str = "demo-cart-id";

/// Gets the cart id from `CSHOP_CART_ID`, falling back to [`DEMO_CART_ID`].
#[must_use]
pub fn get_cart_id() -> String {
    std::env::var("CSHOP_CART_ID")
        .ok()
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| DEMO_CART_ID.to_string())
}
