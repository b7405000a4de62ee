//! Unified error type for the storefront.
//!
//! Repository functions propagate these to the caller unchanged; nothing is
//! retried. Storage failures surface as [`Error::Database`].

use thiserror::Error;

/// Every failure the storefront core can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// The underlying store rejected a read or write
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure while preparing local storage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An environment variable was missing or not unicode
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// The operation needs a signed-in user and there is none
    #[error("User not authenticated")]
    NotAuthenticated,

    /// A stock decrement would take the product below zero
    #[error("Insufficient stock for {path}: {available} available, {requested} requested")]
    InsufficientStock {
        /// Document path of the product
        path: String,
        /// Stock on hand when the decrement was attempted
        available: i64,
        /// Quantity the caller tried to take
        requested: i64,
    },

    /// No cart document exists under this id
    #[error("Cart not found: {cart_id}")]
    CartNotFound {
        /// Cart id that was looked up
        cart_id: String,
    },

    /// Checkout was requested on a cart without lines
    #[error("Cart is empty: {cart_id}")]
    EmptyCart {
        /// Cart id that was checked out
        cart_id: String,
    },

    /// No product document exists at this path
    #[error("Product not found: {path}")]
    ProductNotFound {
        /// Document path of the product
        path: String,
    },

    /// No transaction document exists under this id
    #[error("Transaction not found: {id}")]
    TransactionNotFound {
        /// Transaction id that was looked up
        id: String,
    },

    /// No profile document exists for this user
    #[error("Profile not found: {uid}")]
    ProfileNotFound {
        /// User id that was looked up
        uid: String,
    },

    /// A stored status string is not one of the known statuses
    #[error("Unknown transaction status: {status}")]
    InvalidStatus {
        /// The offending value
        status: String,
    },

    /// Prices and costs must be finite and non-negative
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The offending value
        amount: f64,
    },

    /// Quantities and stock levels out of range
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// The offending value
        quantity: i64,
    },

    /// Free-form input that failed to parse or validate
    #[error("Invalid value for {field}: {value:?}")]
    InvalidInput {
        /// Name of the input field
        field: &'static str,
        /// Raw value as received
        value: String,
    },

    /// Sign-in with an unknown e-mail or a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Sign-up with an e-mail that already has an account
    #[error("Email already in use: {email}")]
    EmailInUse {
        /// The e-mail address
        email: String,
    },

    /// Sign-up with a password below the minimum length
    #[error("Password must be at least {min_length} characters")]
    WeakPassword {
        /// Minimum accepted length
        min_length: usize,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
