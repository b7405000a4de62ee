//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each table stands in for one document collection of the storefront.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cart;
pub mod product;
pub mod transaction;
pub mod user;

// Re-export specific types to avoid conflicts
pub use cart::{Column as CartColumn, Entity as Cart, Model as CartModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use transaction::{
    Column as TransactionColumn, Entity as Transaction, Model as TransactionModel,
};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
