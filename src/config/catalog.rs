//! Catalog layout loading from catalog.toml
//!
//! The storefront sells under a closed set of colleges, each offering the
//! same closed set of product categories. The layout is built in and can be
//! overridden by a TOML file; optional `[[seed]]` entries describe products
//! inserted on start-up when they are missing.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Colleges known to the storefront when no layout file is present.
pub const DEFAULT_COLLEGES: [&str; 5] = ["circuits", "symbiosis", "access", "storm", "chess"];

/// Product categories every known college offers.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["shirts", "tote bags", "lanyards", "pins", "stickers"];

/// Stock level the inventory report treats as "nothing sold yet".
pub const DEFAULT_BASELINE_STOCK: i64 = 10;

/// The storefront's closed college/category layout.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CatalogLayout {
    /// Known colleges, lower-case
    #[serde(default = "default_colleges")]
    pub colleges: Vec<String>,
    /// Categories offered by every known college, lower-case
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Starting stock used by the inventory report
    #[serde(default = "default_baseline_stock")]
    pub baseline_stock: i64,
    /// Products to insert on start-up if absent
    #[serde(default)]
    pub seed: Vec<SeedProduct>,
}

/// A product listed in the layout file for seeding.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SeedProduct {
    /// College segment
    pub college: String,
    /// Category segment
    pub category: String,
    /// Product name, used to detect existing products
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Initial stock
    #[serde(default)]
    pub stock: i64,
    /// Unit cost
    #[serde(default)]
    pub cost: f64,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

fn default_colleges() -> Vec<String> {
    DEFAULT_COLLEGES.iter().map(ToString::to_string).collect()
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect()
}

const fn default_baseline_stock() -> i64 {
    DEFAULT_BASELINE_STOCK
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            colleges: default_colleges(),
            categories: default_categories(),
            baseline_stock: DEFAULT_BASELINE_STOCK,
            seed: Vec::new(),
        }
    }
}

impl CatalogLayout {
    fn normalized(mut self) -> Self {
        self.colleges = self
            .colleges
            .iter()
            .map(|c| crate::store::normalize_segment(c))
            .collect();
        self.categories = self
            .categories
            .iter()
            .map(|c| crate::store::normalize_segment(c))
            .collect();
        self
    }
}

/// Loads the catalog layout from a TOML file.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogLayout> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read catalog file: {e}"),
    })?;

    parse_config(&contents)
}

/// Parses a catalog layout from TOML text.
pub fn parse_config(contents: &str) -> Result<CatalogLayout> {
    toml::from_str::<CatalogLayout>(contents)
        .map(CatalogLayout::normalized)
        .map_err(|e| Error::Config {
            message: format!("Failed to parse catalog.toml: {e}"),
        })
}

/// Loads the layout from `path`, or the built-in layout if the file does not exist.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<CatalogLayout> {
    if path.as_ref().exists() {
        load_config(path)
    } else {
        info!(
            "No catalog file at {:?}, using the built-in layout.",
            path.as_ref()
        );
        Ok(CatalogLayout::default())
    }
}

/// Loads the layout from the default location (./catalog.toml), falling back
/// to the built-in layout.
pub fn load_default_config() -> Result<CatalogLayout> {
    load_or_default("catalog.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            colleges = ["Circuits", "storm"]
            categories = ["shirts", "Pins"]
            baseline_stock = 20

            [[seed]]
            college = "circuits"
            category = "shirts"
            name = "CSC Shirt"
            price = 499.0
            stock = 10
            cost = 250.0
        "#;

        let layout = parse_config(toml_str).unwrap();
        assert_eq!(layout.colleges, vec!["circuits", "storm"]);
        assert_eq!(layout.categories, vec!["shirts", "pins"]);
        assert_eq!(layout.baseline_stock, 20);
        assert_eq!(layout.seed.len(), 1);
        assert_eq!(layout.seed[0].name, "CSC Shirt");
        assert_eq!(layout.seed[0].stock, 10);
        assert!(layout.seed[0].description.is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let layout = parse_config("").unwrap();
        assert_eq!(layout, CatalogLayout::default());
        assert_eq!(layout.colleges.len(), 5);
        assert_eq!(layout.categories.len(), 5);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = parse_config("colleges = [");
        assert!(matches!(result, Err(Error::Config { message: _ })));
    }

    #[test]
    fn test_missing_file_falls_back_to_default() {
        let layout = load_or_default("does/not/exist/catalog.toml").unwrap();
        assert_eq!(layout, CatalogLayout::default());
    }
}
