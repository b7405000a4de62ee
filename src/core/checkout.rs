//! Checkout orchestration - Turns the session's cart into an order.
//!
//! Checkout is three independent steps: create the order record, decrement stock
//! for each line, delete the cart. There is no enclosing database transaction
//! and no compensation. If a stock decrement fails, the order stays `pending`,
//! decrements already applied stay applied, and the cart is left in place.
//! [`CheckoutReport`] records exactly how far checkout got so the caller can
//! show or repair the partial state.

use crate::{
    auth::{IdentityProvider, require_user},
    core::{
        cart::{clear_cart, get_cart},
        session::Session,
        stock::update_product_stock,
        transaction::create_transaction,
    },
    entities::transaction,
    errors::{Error, Result},
    store::ProductPath,
};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};

/// One applied stock decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockUpdate {
    /// Product that was decremented
    pub path: ProductPath,
    /// Units taken
    pub quantity: i64,
    /// Stock left afterwards
    pub remaining: i64,
}

/// Step at which checkout stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    /// A stock decrement failed
    StockUpdate,
    /// Deleting the cart failed
    ClearCart,
}

/// Why checkout stopped after the order was created.
#[derive(Debug)]
pub struct CheckoutFailure {
    /// Step that failed
    pub stage: CheckoutStage,
    /// Product being decremented, for [`CheckoutStage::StockUpdate`]
    pub product: Option<ProductPath>,
    /// Underlying error
    pub error: Error,
}

/// Everything checkout applied.
#[derive(Debug)]
pub struct CheckoutReport {
    /// The order record, always created when a report exists
    pub transaction: transaction::Model,
    /// Decrements applied, in cart order
    pub stock_updates: Vec<StockUpdate>,
    /// Whether the cart document was deleted
    pub cart_cleared: bool,
    /// Set when checkout stopped part-way
    pub failure: Option<CheckoutFailure>,
}

impl CheckoutReport {
    /// Whether every step succeeded.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Checks out the session's cart for the current user.
///
/// The order total is recomputed from the cart lines rather than taken from
/// the stored cart total.
///
/// # Errors
/// Returns an error, with nothing written, if:
/// - Nobody is signed in
/// - The cart does not exist or has no lines
/// - A line's quantity is below one
/// - Creating the order fails
///
/// Failures after the order exists are returned inside the report.
#[instrument(skip(db, identity), fields(cart_id = session.cart_id()))]
pub async fn checkout<I: IdentityProvider>(
    db: &DatabaseConnection,
    identity: &I,
    session: &Session,
) -> Result<CheckoutReport> {
    let cart_id = session.cart_id();
    let user = require_user(identity)?;

    let cart = get_cart(db, cart_id)
        .await?
        .ok_or_else(|| Error::CartNotFound {
            cart_id: cart_id.to_string(),
        })?;
    if cart.items.is_empty() {
        return Err(Error::EmptyCart {
            cart_id: cart_id.to_string(),
        });
    }
    if let Some(line) = cart.items.iter().find(|line| line.quantity < 1) {
        return Err(Error::InvalidQuantity {
            quantity: line.quantity,
        });
    }

    let total = cart.items.total();
    let transaction = create_transaction(db, identity, cart.items.as_slice(), total).await?;

    let mut report = CheckoutReport {
        transaction,
        stock_updates: Vec::with_capacity(cart.items.len()),
        cart_cleared: false,
        failure: None,
    };

    for line in &cart.items {
        let path = line.product.path();
        match update_product_stock(db, &path, line.quantity).await {
            Ok(remaining) => report.stock_updates.push(StockUpdate {
                path,
                quantity: line.quantity,
                remaining,
            }),
            Err(error) => {
                warn!(
                    transaction_id = %report.transaction.id,
                    applied = report.stock_updates.len(),
                    "Checkout stopped at {}: {}", path, error
                );
                report.failure = Some(CheckoutFailure {
                    stage: CheckoutStage::StockUpdate,
                    product: Some(path),
                    error,
                });
                return Ok(report);
            }
        }
    }

    match clear_cart(db, cart_id).await {
        Ok(_) => report.cart_cleared = true,
        Err(error) => {
            warn!(
                transaction_id = %report.transaction.id,
                "Checkout could not clear the cart: {}", error
            );
            report.failure = Some(CheckoutFailure {
                stage: CheckoutStage::ClearCart,
                product: None,
                error,
            });
            return Ok(report);
        }
    }

    info!(
        user_id = %user.uid,
        transaction_id = %report.transaction.id,
        total,
        "Checkout complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::auth::LocalIdentityProvider;
    use crate::core::{
        cart::add_to_cart,
        catalog::get_product,
        transaction::{TransactionStatus, get_transaction},
    };
    use crate::entities::{Transaction, cart::ProductSnapshot};
    use sea_orm::EntityTrait;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_checkout_end_to_end() -> Result<()> {
        let (db, shirt, tote) = setup_with_products().await?;
        let identity = signed_in_identity().await?;
        let session = Session::new("checkout-cart");

        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&shirt), 2).await?;
        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&tote), 1).await?;

        let report = checkout(&db, &identity, &session).await?;
        assert!(report.is_complete());
        assert!(report.cart_cleared);
        assert_eq!(report.transaction.total_amount, 1297.0);
        assert_eq!(report.stock_updates.len(), 2);
        assert_eq!(report.stock_updates[0].remaining, 8);
        assert_eq!(report.stock_updates[1].remaining, 4);

        let stored = get_transaction(&db, &report.transaction.id).await?.unwrap();
        assert_eq!(stored.status()?, TransactionStatus::Pending);
        assert_eq!(stored.total_amount, 1297.0);
        assert_eq!(stored.items.0.len(), 2);

        assert!(get_cart(&db, session.cart_id()).await?.is_none());
        assert_eq!(get_product(&db, &product_path(&shirt)).await?.unwrap().stock, 8);
        assert_eq!(get_product(&db, &product_path(&tote)).await?.unwrap().stock, 4);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_partial_failure_is_reported() -> Result<()> {
        let (db, shirt, tote) = setup_with_products().await?;
        let identity = signed_in_identity().await?;
        let session = Session::new("checkout-cart");

        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&shirt), 2).await?;
        // Tote bag has 5 in stock
        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&tote), 6).await?;

        let report = checkout(&db, &identity, &session).await?;
        assert!(!report.is_complete());
        assert!(!report.cart_cleared);
        assert_eq!(report.stock_updates.len(), 1);

        let failure = report.failure.as_ref().unwrap();
        assert_eq!(failure.stage, CheckoutStage::StockUpdate);
        assert_eq!(failure.product, Some(product_path(&tote)));
        assert!(matches!(
            failure.error,
            Error::InsufficientStock {
                available: 5,
                requested: 6,
                ..
            }
        ));

        // The order stays pending
        let stored = get_transaction(&db, &report.transaction.id).await?.unwrap();
        assert_eq!(stored.status()?, TransactionStatus::Pending);

        // The first decrement is not rolled back
        assert_eq!(get_product(&db, &product_path(&shirt)).await?.unwrap().stock, 8);
        assert_eq!(get_product(&db, &product_path(&tote)).await?.unwrap().stock, 5);

        // The cart is left in place
        let cart = get_cart(&db, session.cart_id()).await?.unwrap();
        assert_eq!(cart.items.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_missing_product_is_reported() -> Result<()> {
        let (db, shirt, _) = setup_with_products().await?;
        let identity = signed_in_identity().await?;
        let session = Session::demo();

        add_to_cart(&db, session.cart_id(), test_snapshot("gone", 10.0), 1).await?;
        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&shirt), 1).await?;

        let report = checkout(&db, &identity, &session).await?;
        assert!(report.stock_updates.is_empty());
        assert!(matches!(
            report.failure.unwrap().error,
            Error::ProductNotFound { path: _ }
        ));
        assert_eq!(get_product(&db, &product_path(&shirt)).await?.unwrap().stock, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_rejects_non_positive_lines() -> Result<()> {
        let (db, shirt, tote) = setup_with_products().await?;
        let identity = signed_in_identity().await?;
        let session = Session::new("checkout-cart");

        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&tote), 1).await?;
        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&shirt), 1).await?;
        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&shirt), -2).await?;

        let result = checkout(&db, &identity, &session).await;
        assert!(matches!(result, Err(Error::InvalidQuantity { quantity: -1 })));

        // Nothing was written
        assert!(Transaction::find().all(&db).await?.is_empty());
        assert_eq!(get_product(&db, &product_path(&tote)).await?.unwrap().stock, 5);
        assert_eq!(get_cart(&db, session.cart_id()).await?.unwrap().items.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_requires_authentication() -> Result<()> {
        let (db, shirt, _) = setup_with_products().await?;
        let identity = LocalIdentityProvider::new();
        let session = Session::demo();
        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&shirt), 1).await?;

        let result = checkout(&db, &identity, &session).await;
        assert!(matches!(result, Err(Error::NotAuthenticated)));
        assert!(get_cart(&db, session.cart_id()).await?.is_some());
        assert_eq!(get_product(&db, &product_path(&shirt)).await?.unwrap().stock, 10);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_missing_or_empty_cart() -> Result<()> {
        let (db, shirt, _) = setup_with_products().await?;
        let identity = signed_in_identity().await?;
        let session = Session::demo();

        let result = checkout(&db, &identity, &session).await;
        assert!(matches!(result, Err(Error::CartNotFound { cart_id: _ })));

        add_to_cart(&db, session.cart_id(), ProductSnapshot::from(&shirt), 1).await?;
        crate::core::cart::remove_from_cart(&db, session.cart_id(), &shirt.id).await?;

        let result = checkout(&db, &identity, &session).await;
        assert!(matches!(result, Err(Error::EmptyCart { cart_id: _ })));
        Ok(())
    }
}
