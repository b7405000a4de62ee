//! Transaction business logic - Order records created at checkout.
//!
//! A transaction is an immutable copy of what was bought, who bought it and the
//! total that was charged. Only its status changes afterwards:
//! `pending` → `completed` when the buyer confirms receipt. `confirmed` is a
//! valid stored value but no operation moves an order into it.
//!
//! The total passed to [`create_transaction`] is stored as given; it is not
//! checked against the items. Status updates are not checked against the
//! current status either.

use std::{fmt, str::FromStr};

use crate::{
    auth::{IdentityProvider, require_user},
    entities::{
        Transaction,
        cart::CartLine,
        transaction::{self, TransactionItem, TransactionItems},
    },
    errors::{Error, Result},
    store,
};
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Placed, awaiting pickup
    Pending,
    /// Acknowledged by the store
    Confirmed,
    /// Buyer confirmed receipt
    Completed,
}

impl TransactionStatus {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            other => Err(Error::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

impl transaction::Model {
    /// Parsed status of this order.
    pub fn status(&self) -> Result<TransactionStatus> {
        self.status.parse()
    }
}

impl From<&CartLine> for TransactionItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            price: line.product.price,
            quantity: line.quantity,
            college: line.product.college.clone(),
            category: line.product.category.clone(),
        }
    }
}

/// Creates a `pending` order for the current user from cart lines.
///
/// Cart-specific fields (line id, image) are dropped. `total_amount` is stored
/// exactly as supplied.
///
/// # Errors
/// Returns an error if:
/// - Nobody is signed in
/// - The database insert fails
#[instrument(skip(db, identity, items), fields(items = items.len()))]
pub async fn create_transaction<I: IdentityProvider>(
    db: &DatabaseConnection,
    identity: &I,
    items: &[CartLine],
    total_amount: f64,
) -> Result<transaction::Model> {
    let user = require_user(identity)?;
    let now = store::server_timestamp();

    let transaction_model = transaction::ActiveModel {
        id: Set(store::generate_id()),
        user_id: Set(user.uid),
        items: Set(TransactionItems(items.iter().map(TransactionItem::from).collect())),
        total_amount: Set(total_amount),
        status: Set(TransactionStatus::Pending.as_str().to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let result = transaction_model.insert(db).await?;
    info!("Created {}", store::transaction_path(&result.id));
    Ok(result)
}

/// Retrieves the current user's orders, newest first, optionally filtered by status.
///
/// # Errors
/// Returns an error if nobody is signed in or the query fails.
pub async fn get_user_transactions<I: IdentityProvider>(
    db: &DatabaseConnection,
    identity: &I,
    status: Option<TransactionStatus>,
) -> Result<Vec<transaction::Model>> {
    let user = require_user(identity)?;

    let mut query = Transaction::find().filter(transaction::Column::UserId.eq(user.uid));
    if let Some(status) = status {
        query = query.filter(transaction::Column::Status.eq(status.as_str()));
    }

    query
        .order_by_desc(transaction::Column::CreatedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves one order by id.
pub async fn get_transaction(
    db: &DatabaseConnection,
    transaction_id: &str,
) -> Result<Option<transaction::Model>> {
    Transaction::find_by_id(transaction_id.to_string())
        .one(db)
        .await
        .map_err(Into::into)
}

/// Overwrites an order's status and re-stamps `updated_at`.
///
/// Any status may replace any other.
///
/// # Errors
/// Returns [`Error::TransactionNotFound`] if the order does not exist.
#[instrument(skip(db))]
pub async fn update_transaction_status(
    db: &DatabaseConnection,
    transaction_id: &str,
    status: TransactionStatus,
) -> Result<transaction::Model> {
    let mut transaction: transaction::ActiveModel = get_transaction(db, transaction_id)
        .await?
        .ok_or_else(|| Error::TransactionNotFound {
            id: transaction_id.to_string(),
        })?
        .into();

    transaction.status = Set(status.as_str().to_string());
    transaction.updated_at = Set(store::server_timestamp());
    transaction.update(db).await.map_err(Into::into)
}

/// Marks an order as received by the buyer.
pub async fn confirm_receipt(
    db: &DatabaseConnection,
    transaction_id: &str,
) -> Result<transaction::Model> {
    update_transaction_status(db, transaction_id, TransactionStatus::Completed).await
}
