//! Database configuration module for the storefront.
//!
//! This module handles the `SQLite` connection and table creation using `SeaORM`.
//! Each table stands in for one document collection (`carts`, `products`,
//! `transactions`, `users`). Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust models.

use crate::entities::{Cart, Product, Transaction, User};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Default location of the local database file.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/cshop.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to [`DEFAULT_DATABASE_URL`].
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Creates the directory holding a file-backed `SQLite` database, if any.
///
/// `SQLite` creates the file itself (`mode=rwc`) but not missing directories.
pub fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(location) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = location.split('?').next().unwrap_or(location);
    if let Some(parent) = Path::new(file).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    ensure_database_dir(&database_url)?;
    debug!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates every storefront table from its entity definition.
///
/// Uses `IF NOT EXISTS` so it is safe to call on every start-up.
#[instrument(skip(db))]
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut cart_table = schema.create_table_from_entity(Cart);
    let mut product_table = schema.create_table_from_entity(Product);
    let mut transaction_table = schema.create_table_from_entity(Transaction);
    let mut user_table = schema.create_table_from_entity(User);

    cart_table.if_not_exists();
    product_table.if_not_exists();
    transaction_table.if_not_exists();
    user_table.if_not_exists();

    db.execute(builder.build(&cart_table)).await?;
    db.execute(builder.build(&product_table)).await?;
    db.execute(builder.build(&transaction_table)).await?;
    db.execute(builder.build(&user_table)).await?;

    info!("Storefront tables ensured.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{
        cart::Model as CartModel, product::Model as ProductModel,
        transaction::Model as TransactionModel, user::Model as UserModel,
    };
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<CartModel> = Cart::find().limit(1).all(&db).await?;
        let _: Vec<ProductModel> = Product::find().limit(1).all(&db).await?;
        let _: Vec<TransactionModel> = Transaction::find().limit(1).all(&db).await?;
        let _: Vec<UserModel> = User::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[test]
    fn test_ensure_database_dir_ignores_memory_urls() -> Result<()> {
        ensure_database_dir("sqlite::memory:")?;
        ensure_database_dir("sqlite://local.sqlite?mode=rwc")?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }
}
