//! Core business logic - framework-agnostic storefront operations.
//!
//! Every function takes the database connection (and, where ownership matters,
//! the identity provider) explicitly and returns a crate [`Result`](crate::errors::Result).

/// Cart lines, merge-add, remove and clear
pub mod cart;
/// Product CRUD under the college/category hierarchy
pub mod catalog;
/// Transaction creation, stock decrements and cart clearing in sequence
pub mod checkout;
/// User profiles and account registration
pub mod profile;
/// Admin inventory summaries
pub mod report;
/// Request-scoped session context
pub mod session;
/// Stock decrements with over-sell rejection
pub mod stock;
/// Order records and their status
pub mod transaction;
