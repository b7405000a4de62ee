//! Catalog business logic - Products under the college → category hierarchy.
//!
//! Products live at `colleges/{collegeId}/{categoryId}/{productId}`. This module
//! provides creation, partial updates, hard deletes and collection reads, plus
//! the closed college/category enumeration used by the admin screens. College
//! and category segments are lower-cased on every call.

use crate::{
    config::catalog::CatalogLayout,
    entities::{Product, product},
    errors::{Error, Result},
    store::{self, CategoryPath, ProductPath},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument, warn};

/// Fields of a product to create.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProduct {
    /// Display name, must not be blank
    pub name: String,
    /// Unit price, finite and non-negative
    pub price: f64,
    /// Initial stock, non-negative
    pub stock: i64,
    /// Unit cost, finite and non-negative
    pub cost: f64,
    /// Optional description
    pub description: Option<String>,
    /// Optional image location
    pub image_url: Option<String>,
}

/// Raw admin form input before numeric coercion.
///
/// Stock and cost may be left blank, in which case they default to zero.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    /// Display name
    pub name: String,
    /// Price as typed, currency symbols allowed (e.g. `"₱499"`)
    pub price: String,
    /// Stock as typed
    pub stock: Option<String>,
    /// Cost as typed
    pub cost: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Optional image location
    pub image_url: Option<String>,
}

/// Partial product update; only `Some` fields are written.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductUpdate {
    /// New display name
    pub name: Option<String>,
    /// New unit price
    pub price: Option<f64>,
    /// New stock level
    pub stock: Option<i64>,
    /// New unit cost
    pub cost: Option<f64>,
    /// New description
    pub description: Option<String>,
    /// New image location
    pub image_url: Option<String>,
}

/// Parses a money amount, ignoring everything but digits, the sign and the
/// decimal point. Negative amounts are rejected.
fn parse_amount(field: &'static str, raw: &str) -> Result<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    let amount = digits.parse().map_err(|_| Error::InvalidInput {
        field,
        value: raw.to_string(),
    })?;
    validate_amount(amount)?;
    Ok(amount)
}

fn parse_stock(raw: &str) -> Result<i64> {
    raw.trim().parse().map_err(|_| Error::InvalidInput {
        field: "stock",
        value: raw.to_string(),
    })
}

fn blank_to_none(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}

impl TryFrom<ProductForm> for NewProduct {
    type Error = Error;

    fn try_from(form: ProductForm) -> Result<Self> {
        let price = parse_amount("price", &form.price)?;
        let stock = blank_to_none(form.stock)
            .map(|raw| parse_stock(&raw))
            .transpose()?
            .unwrap_or(0);
        let cost = blank_to_none(form.cost)
            .map(|raw| parse_amount("cost", &raw))
            .transpose()?
            .unwrap_or(0.0);

        Ok(Self {
            name: form.name,
            price,
            stock,
            cost,
            description: blank_to_none(form.description),
            image_url: blank_to_none(form.image_url),
        })
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidInput {
            field: "name",
            value: name.to_string(),
        });
    }
    Ok(())
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn validate_stock(stock: i64) -> Result<()> {
    if stock < 0 {
        return Err(Error::InvalidQuantity { quantity: stock });
    }
    Ok(())
}

/// Creates a product under `colleges/{college_id}/{category_id}`.
///
/// Returns the generated product id.
///
/// # Errors
/// Returns an error if:
/// - The name is blank
/// - The price or cost is negative or not finite
/// - The stock is negative
/// - The database insert fails
#[instrument(skip(db, new_product), fields(name = %new_product.name))]
pub async fn add_product(
    db: &DatabaseConnection,
    college_id: &str,
    category_id: &str,
    new_product: NewProduct,
) -> Result<String> {
    validate_name(&new_product.name)?;
    validate_amount(new_product.price)?;
    validate_amount(new_product.cost)?;
    validate_stock(new_product.stock)?;

    let collection = CategoryPath::new(college_id, category_id);
    let id = store::generate_id();
    let now = store::server_timestamp();

    let product = product::ActiveModel {
        id: Set(id.clone()),
        college_id: Set(collection.college.clone()),
        category_id: Set(collection.category.clone()),
        name: Set(new_product.name.trim().to_string()),
        price: Set(new_product.price),
        stock: Set(new_product.stock),
        cost: Set(new_product.cost),
        description: Set(new_product.description),
        image_url: Set(new_product.image_url),
        created_at: Set(now),
        updated_at: Set(now),
    };
    product.insert(db).await?;

    info!("Product added with ID {} to {}", id, collection);
    Ok(id)
}

/// Applies a partial update to a product and re-stamps `updated_at`.
///
/// Only fields present in `update` are validated and written.
///
/// # Errors
/// Returns an error if:
/// - A present field fails validation
/// - The product does not exist
/// - The database update fails
#[instrument(skip(db, update), fields(path = %path))]
pub async fn update_product(
    db: &DatabaseConnection,
    path: &ProductPath,
    update: ProductUpdate,
) -> Result<product::Model> {
    if let Some(name) = &update.name {
        validate_name(name)?;
    }
    if let Some(price) = update.price {
        validate_amount(price)?;
    }
    if let Some(cost) = update.cost {
        validate_amount(cost)?;
    }
    if let Some(stock) = update.stock {
        validate_stock(stock)?;
    }

    let mut product: product::ActiveModel = get_product(db, path)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            path: path.to_string(),
        })?
        .into();

    if let Some(name) = update.name {
        product.name = Set(name.trim().to_string());
    }
    if let Some(price) = update.price {
        product.price = Set(price);
    }
    if let Some(stock) = update.stock {
        product.stock = Set(stock);
    }
    if let Some(cost) = update.cost {
        product.cost = Set(cost);
    }
    if let Some(description) = update.description {
        product.description = Set(Some(description));
    }
    if let Some(image_url) = update.image_url {
        product.image_url = Set(Some(image_url));
    }
    product.updated_at = Set(store::server_timestamp());

    let updated = product.update(db).await?;
    debug!("Product updated");
    Ok(updated)
}

/// Permanently deletes a product.
///
/// # Errors
/// Returns [`Error::ProductNotFound`] if nothing exists at `path`.
#[instrument(skip(db), fields(path = %path))]
pub async fn delete_product(db: &DatabaseConnection, path: &ProductPath) -> Result<()> {
    let result = Product::delete_many()
        .filter(product::Column::Id.eq(path.product_id.as_str()))
        .filter(product::Column::CollegeId.eq(path.college.as_str()))
        .filter(product::Column::CategoryId.eq(path.category.as_str()))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ProductNotFound {
            path: path.to_string(),
        });
    }
    info!("Product deleted");
    Ok(())
}

/// Reads one product by its full path.
pub async fn get_product(
    db: &DatabaseConnection,
    path: &ProductPath,
) -> Result<Option<product::Model>> {
    Product::find_by_id(path.product_id.clone())
        .filter(product::Column::CollegeId.eq(path.college.as_str()))
        .filter(product::Column::CategoryId.eq(path.category.as_str()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Reads every product in `colleges/{college_id}/{category_id}`, ordered by name.
pub async fn fetch_products(
    db: &DatabaseConnection,
    college_id: &str,
    category_id: &str,
) -> Result<Vec<product::Model>> {
    let collection = CategoryPath::new(college_id, category_id);
    let products = Product::find()
        .filter(product::Column::CollegeId.eq(collection.college.as_str()))
        .filter(product::Column::CategoryId.eq(collection.category.as_str()))
        .order_by_asc(product::Column::Name)
        .all(db)
        .await?;
    debug!("Fetched {} products from {}", products.len(), collection);
    Ok(products)
}

/// Categories offered by `college_id`.
///
/// Known colleges all offer the layout's category list; unknown colleges get
/// an empty list. Matching is case-insensitive.
#[must_use]
pub fn fetch_categories_for_college(layout: &CatalogLayout, college_id: &str) -> Vec<String> {
    let college = store::normalize_segment(college_id);
    if layout.colleges.contains(&college) {
        layout.categories.clone()
    } else {
        warn!("Categories requested for unknown college {college_id:?}");
        Vec::new()
    }
}

/// Every college in the layout.
#[must_use]
pub fn fetch_all_colleges(layout: &CatalogLayout) -> Vec<String> {
    layout.colleges.clone()
}

/// Inserts the layout's seed products that are not already present by name.
///
/// Returns how many products were inserted.
pub async fn seed_products(db: &DatabaseConnection, layout: &CatalogLayout) -> Result<usize> {
    let mut inserted = 0;
    for seed in &layout.seed {
        let existing = fetch_products(db, &seed.college, &seed.category).await?;
        if existing.iter().any(|p| p.name == seed.name) {
            continue;
        }
        add_product(
            db,
            &seed.college,
            &seed.category,
            NewProduct {
                name: seed.name.clone(),
                price: seed.price,
                stock: seed.stock,
                cost: seed.cost,
                description: seed.description.clone(),
                image_url: None,
            },
        )
        .await?;
        inserted += 1;
    }
    Ok(inserted)
}
