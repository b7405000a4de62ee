//! Cart business logic - Handles the persisted cart and its lines.
//!
//! A cart is a single document holding an ordered list of lines. Lines are keyed by
//! product id: adding a product that is already in the cart changes that line's
//! quantity instead of appending a second row. The stored `total_price` is
//! recomputed from the lines on every write.
//!
//! Every write is a read-modify-write of the whole document with no concurrency
//! token, so two concurrent adds to the same cart can lose an update.

use std::collections::HashMap;

use crate::{
    entities::{
        Cart, cart,
        cart::{CartLine, CartLines, ProductSnapshot},
        product,
    },
    errors::{Error, Result},
    store::{self, ProductPath},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, instrument};

impl From<&product::Model> for ProductSnapshot {
    fn from(product: &product::Model) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            college: product.college_id.clone(),
            category: product.category_id.clone(),
            image_url: product.image_url.clone(),
        }
    }
}

impl ProductSnapshot {
    /// Document path of the product this snapshot was taken from.
    #[must_use]
    pub fn path(&self) -> ProductPath {
        ProductPath::new(&self.college, &self.category, &self.id)
    }
}

impl CartLine {
    /// Contribution of this line to the cart total.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn subtotal(&self) -> f64 {
        self.product.price * self.quantity as f64
    }
}

impl CartLines {
    /// Creates an empty set of lines.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds `quantity` units of `product`.
    ///
    /// An existing line for the same product id has its quantity changed by
    /// `quantity`, which may be negative; the caller keeps the result at one or
    /// more, or removes the line. Otherwise a new line with id
    /// `{productId}-{unixMillis}` is appended.
    ///
    /// Returns the line's quantity after the merge.
    ///
    /// # Errors
    /// Returns [`Error::InvalidQuantity`] when a new line would start below one.
    pub fn merge(
        &mut self,
        product: ProductSnapshot,
        quantity: i64,
        now: DateTimeUtc,
    ) -> Result<i64> {
        if let Some(line) = self.get_mut(&product.id) {
            line.quantity += quantity;
            return Ok(line.quantity);
        }

        if quantity < 1 {
            return Err(Error::InvalidQuantity { quantity });
        }

        self.0.push(CartLine {
            id: format!("{}-{}", product.id, now.timestamp_millis()),
            product,
            quantity,
        });
        Ok(quantity)
    }

    /// Removes every line for `product_id`, returning how many were removed.
    pub fn remove(&mut self, product_id: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|line| line.product.id != product_id);
        before - self.0.len()
    }

    /// Decrements the line for `product_id` by one while it stays at one or more.
    ///
    /// Returns `true` if the quantity changed.
    pub fn decrement(&mut self, product_id: &str) -> bool {
        match self.get_mut(product_id) {
            Some(line) if line.quantity > 1 => {
                line.quantity -= 1;
                true
            }
            _ => false,
        }
    }

    /// Line for `product_id`, if present.
    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&CartLine> {
        self.0.iter().find(|line| line.product.id == product_id)
    }

    fn get_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.0.iter_mut().find(|line| line.product.id == product_id)
    }

    /// Quantity per product id.
    #[must_use]
    pub fn quantities(&self) -> HashMap<&str, i64> {
        self.0
            .iter()
            .map(|line| (line.product.id.as_str(), line.quantity))
            .collect()
    }

    /// Sum of `price * quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.0.iter().map(CartLine::subtotal).sum()
    }

    /// Lines in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartLine> {
        self.0.iter()
    }

    /// Lines as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[CartLine] {
        &self.0
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CartLines {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

async fn write_lines(
    db: &DatabaseConnection,
    existing: cart::Model,
    items: CartLines,
) -> Result<cart::Model> {
    let total = items.total();
    let mut cart: cart::ActiveModel = existing.into();
    cart.items = Set(items);
    cart.total_price = Set(total);
    cart.updated_at = Set(store::server_timestamp());
    cart.update(db).await.map_err(Into::into)
}

/// Adds `quantity` units of `product` to the cart, creating the cart if needed.
///
/// Lines merge by product id (see [`CartLines::merge`]) and the stored total is
/// recomputed. Performs one read and one write.
///
/// # Errors
/// Returns an error if a new line would start below one unit or the store fails.
#[instrument(skip(db, product), fields(product_id = %product.id))]
pub async fn add_to_cart(
    db: &DatabaseConnection,
    cart_id: &str,
    product: ProductSnapshot,
    quantity: i64,
) -> Result<cart::Model> {
    let now = store::server_timestamp();

    if let Some(existing) = get_cart(db, cart_id).await? {
        let mut items = existing.items.clone();
        let new_quantity = items.merge(product, quantity, now)?;
        debug!(new_quantity, "Merged line into {}", store::cart_path(cart_id));
        return write_lines(db, existing, items).await;
    }

    let mut items = CartLines::new();
    items.merge(product, quantity, now)?;
    let cart = cart::ActiveModel {
        id: Set(cart_id.to_string()),
        total_price: Set(items.total()),
        items: Set(items),
        created_at: Set(now),
        updated_at: Set(now),
    };
    debug!("Creating {}", store::cart_path(cart_id));
    cart.insert(db).await.map_err(Into::into)
}

/// Removes every line for `product_id` and recomputes the total.
///
/// Returns `None` without writing when the cart does not exist.
#[instrument(skip(db))]
pub async fn remove_from_cart(
    db: &DatabaseConnection,
    cart_id: &str,
    product_id: &str,
) -> Result<Option<cart::Model>> {
    let Some(existing) = get_cart(db, cart_id).await? else {
        return Ok(None);
    };

    let mut items = existing.items.clone();
    items.remove(product_id);
    write_lines(db, existing, items).await.map(Some)
}

/// Decreases a line by one unit, never below one.
///
/// Lines already at one unit are left alone; use [`remove_from_cart`] to drop
/// them. Returns `None` when the cart does not exist.
#[instrument(skip(db))]
pub async fn decrement_line(
    db: &DatabaseConnection,
    cart_id: &str,
    product_id: &str,
) -> Result<Option<cart::Model>> {
    let Some(existing) = get_cart(db, cart_id).await? else {
        return Ok(None);
    };

    let mut items = existing.items.clone();
    if !items.decrement(product_id) {
        return Ok(Some(existing));
    }
    write_lines(db, existing, items).await.map(Some)
}

/// Deletes the cart document entirely.
///
/// The next [`add_to_cart`] recreates it. Returns `true` if a cart was deleted.
#[instrument(skip(db))]
pub async fn clear_cart(db: &DatabaseConnection, cart_id: &str) -> Result<bool> {
    let result = Cart::delete_by_id(cart_id.to_string()).exec(db).await?;
    Ok(result.rows_affected > 0)
}

/// Reads a cart by id.
pub async fn get_cart(db: &DatabaseConnection, cart_id: &str) -> Result<Option<cart::Model>> {
    Cart::find_by_id(cart_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Reads every cart, ordered by id.
pub async fn get_all_carts(db: &DatabaseConnection) -> Result<Vec<cart::Model>> {
    Cart::find()
        .order_by_asc(cart::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
