//! Document-store conventions layered over the SQL tables.
//!
//! Every record keeps the address it would have in a document database
//! (`carts/{cartId}`, `colleges/{collegeId}/{categoryId}/{productId}`,
//! `transactions/{id}`, `users/{uid}`). Repositories use these paths for
//! logging and error reporting; ids and timestamps are generated here so that
//! every write stamps them the same way.

use std::fmt;

use sea_orm::prelude::DateTimeUtc;
use serde::{Deserialize, Serialize};

/// Collection holding cart documents
pub const CARTS: &str = "carts";
/// Root collection of the college → category → product hierarchy
pub const COLLEGES: &str = "colleges";
/// Collection holding order records
pub const TRANSACTIONS: &str = "transactions";
/// Collection holding user profiles
pub const USERS: &str = "users";

/// Generates a new document id.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Timestamp stamped on `created_at` / `updated_at` fields.
#[must_use]
pub fn server_timestamp() -> DateTimeUtc {
    chrono::Utc::now()
}

/// Lower-cases and trims a college or category segment.
///
/// Products are always addressed through normalised segments so that
/// `"Circuits"` and `"circuits"` resolve to the same collection.
#[must_use]
pub fn normalize_segment(segment: &str) -> String {
    segment.trim().to_lowercase()
}

/// Address of a product collection: `colleges/{collegeId}/{categoryId}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryPath {
    /// Normalised college segment
    pub college: String,
    /// Normalised category segment
    pub category: String,
}

impl CategoryPath {
    /// Builds a collection path, normalising both segments.
    #[must_use]
    pub fn new(college: &str, category: &str) -> Self {
        Self {
            college: normalize_segment(college),
            category: normalize_segment(category),
        }
    }

    /// Address of a product document inside this collection.
    #[must_use]
    pub fn product(&self, product_id: &str) -> ProductPath {
        ProductPath {
            college: self.college.clone(),
            category: self.category.clone(),
            product_id: product_id.to_string(),
        }
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{COLLEGES}/{}/{}", self.college, self.category)
    }
}

/// Address of a product document:
/// `colleges/{collegeId}/{categoryId}/{productId}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductPath {
    /// Normalised college segment
    pub college: String,
    /// Normalised category segment
    pub category: String,
    /// Generated product id
    pub product_id: String,
}

impl ProductPath {
    /// Builds a product path, normalising the college and category segments.
    #[must_use]
    pub fn new(college: &str, category: &str, product_id: &str) -> Self {
        CategoryPath::new(college, category).product(product_id)
    }

    /// The collection this product lives in.
    #[must_use]
    pub fn collection(&self) -> CategoryPath {
        CategoryPath {
            college: self.college.clone(),
            category: self.category.clone(),
        }
    }
}

impl fmt::Display for ProductPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{COLLEGES}/{}/{}/{}",
            self.college, self.category, self.product_id
        )
    }
}

/// Renders `carts/{cartId}`.
#[must_use]
pub fn cart_path(cart_id: &str) -> String {
    format!("{CARTS}/{cart_id}")
}

/// Renders `transactions/{id}`.
#[must_use]
pub fn transaction_path(id: &str) -> String {
    format!("{TRANSACTIONS}/{id}")
}

/// Renders `users/{uid}`.
#[must_use]
pub fn user_path(uid: &str) -> String {
    format!("{USERS}/{uid}")
}
