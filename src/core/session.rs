//! Request-scoped context carried into cart and checkout operations.

use crate::config::session::{DEMO_CART_ID, get_cart_id};

/// Identifies the cart a client is working with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    cart_id: String,
}

impl Session {
    /// Creates a session bound to `cart_id`.
    #[must_use]
    pub fn new(cart_id: impl Into<String>) -> Self {
        Self {
            cart_id: cart_id.into(),
        }
    }

    /// Session for the shared demo cart.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(DEMO_CART_ID)
    }

    /// Session using the cart id configured through the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(get_cart_id())
    }

    /// The cart this session reads and writes.
    #[must_use]
    pub fn cart_id(&self) -> &str {
        &self.cart_id
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::demo()
    }
}
