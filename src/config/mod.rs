/// Database configuration and connection management
pub mod database;

/// College/category layout loading from catalog.toml
pub mod catalog;

/// Session defaults from environment variables
pub mod session;
