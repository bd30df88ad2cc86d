//! OpenSASE Storefront
//!
//! Self-hosted storefront backend for a single shop.
//!
//! ## Features
//! - Product catalog with category browsing
//! - Wishlist (favourites) and cart toggles
//! - Shipping addresses with a single delivery address per customer
//! - Cart to order checkout in one transaction
//! - Phone/password accounts with bearer tokens, or a shared no-login mode

use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;
pub mod services;
pub mod state;
pub mod store;

pub use config::{AccessMode, AppConfig};
pub use state::AppState;
pub use store::{MemoryStore, PgStore, Store, StoreError};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum EcommerceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for EcommerceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { field } => Self::Conflict(format!("This {field} is already registered.")),
            other => Self::Storage(other),
        }
    }
}

impl From<validator::ValidationErrors> for EcommerceError {
    fn from(err: validator::ValidationErrors) -> Self { Self::Validation(err.to_string()) }
}

impl From<domain::OrderError> for EcommerceError {
    fn from(err: domain::OrderError) -> Self { Self::Validation(err.to_string()) }
}

impl From<domain::value_objects::QuantityError> for EcommerceError {
    fn from(err: domain::value_objects::QuantityError) -> Self { Self::Validation(err.to_string()) }
}

pub type Result<T> = std::result::Result<T, EcommerceError>;
