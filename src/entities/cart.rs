//! Cart entity - One cart document holding an ordered list of lines.
//!
//! Lines are stored as a JSON array in the `items` column, mirroring the
//! document layout `carts/{cartId} = { items: [...], totalPrice, ... }`.
//! `total_price` is derived from the lines and rewritten on every write.

use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Cart database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    /// Cart id supplied by the session (e.g. `"demo-cart-id"`)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Ordered cart lines
    #[sea_orm(column_type = "Json")]
    pub items: CartLines,
    /// Sum of `price * quantity` over all lines at the time of the last write
    pub total_price: f64,
    /// When the cart was first created
    pub created_at: DateTimeUtc,
    /// When the cart was last written
    pub updated_at: DateTimeUtc,
}

/// Copy of the product fields a cart line needs, taken when the line is added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product document id
    pub id: String,
    /// Display name
    pub name: String,
    /// Unit price at the time the line was added
    pub price: f64,
    /// College segment of the product path
    pub college: String,
    /// Category segment of the product path
    pub category: String,
    /// Optional product image
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One product/quantity entry in a cart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Synthetic line id, `{productId}-{unixMillis}`
    pub id: String,
    /// Product snapshot
    pub product: ProductSnapshot,
    /// Units of the product in the cart
    pub quantity: i64,
}

/// Ordered collection of cart lines, keyed by product id.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct CartLines(pub Vec<CartLine>);

/// Carts are standalone documents
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
