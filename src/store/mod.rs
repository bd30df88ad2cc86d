//! Persistence for the storefront.
//!
//! [`Store`] is the document store seen by the services. Every method is one
//! atomic operation against the backend: toggles, the exclusive delivery flag
//! and order placement never leave a half-applied write behind. Owner-scoped
//! methods only ever see records whose owner matches the given [`OwnerScope`].
//!
//! Two backends ship with the crate:
//! - [`PgStore`]: PostgreSQL through sqlx, used in production
//! - [`MemoryStore`]: process-local, used by tests and for running without a database

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{
    Address, AddressPatch, CartEntry, CartItem, FavouriteItem, Membership, Order, OwnerScope,
    Product, Quantity, User, UserCredentials, UserPatch,
};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate {field}")]
    Duplicate { field: &'static str },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    async fn list_products(&self) -> StoreResult<Vec<Product>>;

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>>;

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>>;

    async fn insert_product(&self, product: Product) -> StoreResult<Product>;

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// Inserts a user. Fails with [`StoreError::Duplicate`] on a taken email
    /// or phone number.
    async fn insert_user(&self, user: User, password_hash: String) -> StoreResult<User>;

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_phone(&self, phone: &str) -> StoreResult<Option<User>>;

    async fn find_credentials_by_phone(&self, phone: &str) -> StoreResult<Option<UserCredentials>>;

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>>;

    // -------------------------------------------------------------------------
    // Favourites
    // -------------------------------------------------------------------------

    async fn list_favourites(&self, scope: OwnerScope) -> StoreResult<Vec<FavouriteItem>>;

    /// Removes the (scope, product) favourite if present, otherwise creates
    /// it, and mirrors the outcome onto the product's `is_favourite` flag.
    /// `Unchanged` when a concurrent toggle inserted the same row first.
    async fn toggle_favourite(&self, scope: OwnerScope, product_id: Uuid) -> StoreResult<Membership>;

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    async fn list_cart(&self, scope: OwnerScope) -> StoreResult<Vec<CartItem>>;

    /// Inserts a cart line unless one exists. `Unchanged` when it did.
    async fn add_to_cart(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Membership>;

    /// Deletes the cart line if present. `Unchanged` when there was none.
    async fn remove_from_cart(&self, scope: OwnerScope, product_id: Uuid) -> StoreResult<Membership>;

    /// Deletes the cart line if present, otherwise inserts one.
    async fn toggle_cart(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Membership>;

    async fn set_cart_quantity(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Option<CartEntry>>;

    // -------------------------------------------------------------------------
    // Addresses
    // -------------------------------------------------------------------------

    /// Addresses in creation order, oldest first.
    async fn list_addresses(&self, scope: OwnerScope) -> StoreResult<Vec<Address>>;

    async fn get_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Address>>;

    /// Inserts the address for its owner. It takes the delivery flag when
    /// `claim_delivery` is set or when no address of the owner holds it, and
    /// every other address of the owner loses the flag in the same step.
    async fn insert_address(&self, address: Address, claim_delivery: bool) -> StoreResult<Address>;

    async fn update_address(&self, scope: OwnerScope, id: Uuid, patch: AddressPatch) -> StoreResult<Option<Address>>;

    async fn delete_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Address>>;

    /// Sets the delivery flag on `id` and clears it on every other address of
    /// the scope, in one step. Returns the addresses whose flag changed; empty
    /// when `id` is not in scope.
    async fn mark_delivery_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Vec<Address>>;

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Persists the order, deletes the scope's cart lines for the ordered
    /// products and clears their `is_in_cart` flag, all or nothing.
    async fn place_order(&self, order: Order) -> StoreResult<Order>;

    /// Orders, newest first.
    async fn list_orders(&self, scope: OwnerScope) -> StoreResult<Vec<Order>>;

    async fn get_order(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Order>>;
}
