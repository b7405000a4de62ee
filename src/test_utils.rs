//! Shared test utilities for the storefront.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    auth::{IdentityProvider, LocalIdentityProvider},
    core::catalog::{self, NewProduct},
    entities::{
        cart::{CartLine, ProductSnapshot},
        product,
    },
    errors::Result,
    store::ProductPath,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a product with custom fields and returns the stored model.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    college: &str,
    category: &str,
    name: &str,
    price: f64,
    stock: i64,
    cost: f64,
) -> Result<product::Model> {
    let id = catalog::add_product(
        db,
        college,
        category,
        NewProduct {
            name: name.to_string(),
            price,
            stock,
            cost,
            description: None,
            image_url: None,
        },
    )
    .await?;

    let path = ProductPath::new(college, category, &id);
    catalog::get_product(db, &path)
        .await?
        .ok_or(crate::errors::Error::ProductNotFound {
            path: path.to_string(),
        })
}

/// Sets up a database with two products in the `circuits` college.
///
/// Returns (db, shirt, tote bag):
/// * shirt: `circuits/shirts`, ₱499, stock 10, cost 250
/// * tote bag: `circuits/tote bags`, ₱299, stock 5, cost 150
pub async fn setup_with_products() -> Result<(DatabaseConnection, product::Model, product::Model)>
{
    let db = setup_test_db().await?;
    let shirt = create_custom_product(&db, "circuits", "shirts", "CSC Shirt", 499.0, 10, 250.0)
        .await?;
    let tote =
        create_custom_product(&db, "circuits", "tote bags", "Tote Bag 1", 299.0, 5, 150.0).await?;
    Ok((db, shirt, tote))
}

/// Path of a stored product.
pub fn product_path(product: &product::Model) -> ProductPath {
    ProductPath::new(&product.college_id, &product.category_id, &product.id)
}

/// A product snapshot under `circuits/shirts` that need not exist in the database.
pub fn test_snapshot(id: &str, price: f64) -> ProductSnapshot {
    ProductSnapshot {
        id: id.to_string(),
        name: format!("Product {id}"),
        price,
        college: "circuits".to_string(),
        category: "shirts".to_string(),
        image_url: None,
    }
}

/// A cart line built from [`test_snapshot`].
pub fn test_line(id: &str, price: f64, quantity: i64) -> CartLine {
    CartLine {
        id: format!("{id}-0"),
        product: test_snapshot(id, price),
        quantity,
    }
}

/// An in-memory product model that was never stored.
pub fn test_product_model(id: &str, price: f64, stock: i64) -> product::Model {
    let now = chrono::Utc::now();
    product::Model {
        id: id.to_string(),
        college_id: "circuits".to_string(),
        category_id: "shirts".to_string(),
        name: format!("Product {id}"),
        price,
        stock,
        cost: 0.0,
        description: None,
        image_url: None,
        created_at: now,
        updated_at: now,
    }
}

/// An identity provider with `buyer@example.com` / `secret1` signed in.
pub async fn signed_in_identity() -> Result<LocalIdentityProvider> {
    let identity = LocalIdentityProvider::new();
    identity.sign_up("buyer@example.com", "secret1").await?;
    Ok(identity)
}
