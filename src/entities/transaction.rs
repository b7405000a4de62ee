//! Transaction entity - An order record created at checkout.
//!
//! Holds the `user_id` of the buyer, a JSON copy of the purchased items, the
//! `total_amount` supplied at creation, and a `status` string
//! (`"pending"`, `"confirmed"` or `"completed"`).
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Generated document id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Uid of the user who placed the order
    pub user_id: String,
    /// Purchased items
    #[sea_orm(column_type = "Json")]
    pub items: TransactionItems,
    /// Order total as supplied by the caller
    pub total_amount: f64,
    /// Order status: `"pending"`, `"confirmed"` or `"completed"`
    pub status: String,
    /// When the order was placed
    pub created_at: DateTimeUtc,
    /// When the status last changed
    pub updated_at: DateTimeUtc,
}

/// One purchased product inside an order record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionItem {
    /// Product document id
    pub product_id: String,
    /// Product name at purchase time
    pub name: String,
    /// Unit price at purchase time
    pub price: f64,
    /// Units purchased
    pub quantity: i64,
    /// College segment of the product path
    pub college: String,
    /// Category segment of the product path
    pub category: String,
}

/// Items of an order record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct TransactionItems(pub Vec<TransactionItem>);

/// Order records are standalone documents
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
