//! Stock adjustment - Decrements a product's stock after a purchase.
//!
//! The decrement is a plain read-modify-write of one product row. It is not
//! coordinated with order creation or with other decrements: concurrent buyers
//! of the same product race, and the last writer wins.

use crate::{
    core::catalog::get_product,
    entities::product,
    errors::{Error, Result},
    store::{self, ProductPath},
};
use sea_orm::{Set, prelude::*};
use tracing::{debug, instrument, warn};

/// Takes `quantity` units out of the product at `path`.
///
/// Returns the remaining stock.
///
/// # Errors
/// Returns an error if:
/// - `quantity` is negative
/// - The product does not exist
/// - The product has fewer than `quantity` units; nothing is written
/// - The database update fails
#[instrument(skip(db), fields(path = %path))]
pub async fn update_product_stock(
    db: &DatabaseConnection,
    path: &ProductPath,
    quantity: i64,
) -> Result<i64> {
    if quantity < 0 {
        return Err(Error::InvalidQuantity { quantity });
    }

    let product = get_product(db, path)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            path: path.to_string(),
        })?;

    let current_stock = product.stock;
    let new_stock = current_stock - quantity;
    if new_stock < 0 {
        warn!(current_stock, quantity, "Rejected stock decrement");
        return Err(Error::InsufficientStock {
            path: path.to_string(),
            available: current_stock,
            requested: quantity,
        });
    }

    let mut product: product::ActiveModel = product.into();
    product.stock = Set(new_stock);
    product.updated_at = Set(store::server_timestamp());
    product.update(db).await?;

    debug!(new_stock, "Stock decremented");
    Ok(new_stock)
}
