//! Inventory report generation for the admin screens.
//!
//! Units sold are inferred from how far each product's stock has dropped below
//! the layout's baseline stock. Revenue and cost are those units times the
//! product's current price and cost. All functions return structured data;
//! formatting helpers render peso amounts for display.

use crate::{
    config::catalog::CatalogLayout,
    core::catalog::{fetch_categories_for_college, fetch_products},
    entities::product,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Sales figures for one product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSales {
    /// Product id
    pub product_id: String,
    /// Product name
    pub name: String,
    /// Units sold relative to the baseline
    pub units_sold: i64,
    /// `units_sold * price`
    pub revenue: f64,
    /// `units_sold * cost`
    pub cost: f64,
}

/// Sales figures for a set of products.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InventorySummary {
    /// Per-product figures, in input order
    pub products: Vec<ProductSales>,
    /// Sum of revenue
    pub total_revenue: f64,
    /// Sum of cost
    pub total_cost: f64,
    /// `total_revenue - total_cost`
    pub total_profit: f64,
}

/// Summarises `products` against `baseline_stock`.
///
/// Products stocked above the baseline count as zero units sold.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize_inventory(products: &[product::Model], baseline_stock: i64) -> InventorySummary {
    let mut summary = InventorySummary::default();

    for product in products {
        let units_sold = (baseline_stock - product.stock).max(0);
        let revenue = product.price * units_sold as f64;
        let cost = product.cost * units_sold as f64;

        summary.total_revenue += revenue;
        summary.total_cost += cost;
        summary.products.push(ProductSales {
            product_id: product.id.clone(),
            name: product.name.clone(),
            units_sold,
            revenue,
            cost,
        });
    }

    summary.total_profit = summary.total_revenue - summary.total_cost;
    summary
}

/// Generates the inventory summary for every category of one college.
///
/// Unknown colleges produce an empty summary.
pub async fn generate_inventory_report(
    db: &DatabaseConnection,
    layout: &CatalogLayout,
    college_id: &str,
) -> Result<InventorySummary> {
    let mut products = Vec::new();
    for category in fetch_categories_for_college(layout, college_id) {
        products.extend(fetch_products(db, college_id, &category).await?);
    }
    Ok(summarize_inventory(&products, layout.baseline_stock))
}

/// Formats a peso amount.
///
/// # Returns
/// Formatted string like "₱1297.00" or "-₱25.50"
#[must_use]
pub fn format_amount(amount: f64) -> String {
    if amount < 0.0 {
        format!("-₱{:.2}", amount.abs())
    } else {
        format!("₱{amount:.2}")
    }
}

/// One-line summary such as `revenue ₱998.00, cost ₱500.00, profit ₱498.00`.
#[must_use]
pub fn format_summary(summary: &InventorySummary) -> String {
    format!(
        "revenue {}, cost {}, profit {}",
        format_amount(summary.total_revenue),
        format_amount(summary.total_cost),
        format_amount(summary.total_profit)
    )
}
