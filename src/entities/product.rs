//! Product entity - Merchandise stored under `colleges/{collegeId}/{categoryId}`.
//!
//! The college and category segments are kept as columns so a product can be
//! addressed by its full document path. Both are stored lower-case.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Generated document id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// College segment (e.g. `"circuits"`)
    pub college_id: String,
    /// Category segment (e.g. `"shirts"`)
    pub category_id: String,
    /// Name of the product (e.g. "CSC Shirt")
    pub name: String,
    /// Unit selling price in pesos
    pub price: f64,
    /// Units on hand, never negative
    pub stock: i64,
    /// Unit cost in pesos
    pub cost: f64,
    /// Optional description shown on the product card
    pub description: Option<String>,
    /// Optional image location
    pub image_url: Option<String>,
    /// When the product was created
    pub created_at: DateTimeUtc,
    /// When the product was last modified
    pub updated_at: DateTimeUtc,
}

/// Products reference nothing; carts and transactions copy what they need
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
