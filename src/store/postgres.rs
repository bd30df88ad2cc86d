//! PostgreSQL implementation of [`Store`].
//!
//! Queries are checked at runtime (`query_as` over private row structs), so
//! the crate builds without a live database. Multi-statement operations run
//! in a transaction; toggles lean on the `(owner_id, product_id)` unique
//! constraints so concurrent requests cannot create duplicate join rows.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{FromRow, Postgres, Transaction};
use std::collections::HashMap;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::domain::{
    Address, AddressPatch, CartEntry, CartItem, DeliveryAddress, Favourite, FavouriteItem,
    Membership, Order, OrderedItem, OwnerScope, Product, ProductImages, Quantity, User,
    UserCredentials, UserPatch,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    fn new(pool: PgPool) -> Self { Self { pool } }

    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new().max_connections(max_connections).connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool { &self.pool }

    /// Serialises delivery flag changes of one owner until the transaction ends.
    async fn lock_addresses(tx: &mut Transaction<'_, Postgres>, owner: Option<Uuid>) -> StoreResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended(COALESCE($1::uuid::text, 'shared'), 0))")
            .bind(owner).execute(&mut **tx).await?;
        Ok(())
    }

    async fn products_by_ids(&self, ids: &[Uuid]) -> StoreResult<HashMap<Uuid, Product>> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = ANY($1)")
            .bind(ids).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|r| (r.id, Product::from(r))).collect())
    }

    async fn cart_entry_for(&self, tx: &mut Transaction<'_, Postgres>, scope: OwnerScope, product_id: Uuid) -> StoreResult<Option<Uuid>> {
        let id: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM cart_items WHERE owner_id IS NOT DISTINCT FROM $1 AND product_id = $2 FOR UPDATE")
            .bind(scope.owner_id()).bind(product_id).fetch_optional(&mut **tx).await?;
        Ok(id.map(|(id,)| id))
    }
}

// =============================================================================
// Rows
// =============================================================================

#[derive(FromRow)]
struct ProductRow {
    id: Uuid, title: String, brand: String, sell_price: Decimal, mrp_price: Decimal, rating: f64,
    category: String, images_url: Json<ProductImages>, is_favourite: bool, is_in_cart: bool,
    is_cod: bool, is_free_delivery: bool, replace_policy: i32, description: Vec<String>,
    created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: r.id, title: r.title, brand: r.brand, sell_price: r.sell_price, mrp_price: r.mrp_price,
            rating: r.rating, category: r.category, images_url: r.images_url.0,
            is_favourite: r.is_favourite, is_in_cart: r.is_in_cart, is_cod: r.is_cod,
            is_free_delivery: r.is_free_delivery, replace_policy: r.replace_policy,
            description: r.description, created_at: r.created_at, updated_at: r.updated_at,
        }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid, full_name: String, date_of_birth: NaiveDate, gender: String, email: String,
    phone_number: String, password_hash: String, created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserCredentials {
    fn from(r: UserRow) -> Self {
        Self {
            user: User {
                id: r.id, full_name: r.full_name, date_of_birth: r.date_of_birth, gender: r.gender,
                email: r.email, phone_number: r.phone_number, created_at: r.created_at, updated_at: r.updated_at,
            },
            password_hash: r.password_hash,
        }
    }
}

#[derive(FromRow)]
struct FavouriteRow {
    id: Uuid, owner_id: Option<Uuid>, product_id: Uuid, created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
}

impl From<FavouriteRow> for Favourite {
    fn from(r: FavouriteRow) -> Self {
        Self { id: r.id, owner: r.owner_id, item: r.product_id, created_at: r.created_at, updated_at: r.updated_at }
    }
}

#[derive(FromRow)]
struct CartRow {
    id: Uuid, owner_id: Option<Uuid>, product_id: Uuid, cart_quantity: i32,
    created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
}

impl TryFrom<CartRow> for CartEntry {
    type Error = StoreError;
    fn try_from(r: CartRow) -> StoreResult<Self> {
        let cart_quantity = u32::try_from(r.cart_quantity)
            .map_err(|_| StoreError::Corrupt(format!("cart item {} has quantity {}", r.id, r.cart_quantity)))?;
        Ok(Self { id: r.id, owner: r.owner_id, item: r.product_id, cart_quantity, created_at: r.created_at, updated_at: r.updated_at })
    }
}

#[derive(FromRow)]
struct AddressRow {
    id: Uuid, owner_id: Option<Uuid>, user_full_name: String, mobile_number: String, pincode: String,
    locality: String, address: String, district: String, state: String, address_type: String,
    is_deliver: bool, is_default: bool, created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
}

impl TryFrom<AddressRow> for Address {
    type Error = StoreError;
    fn try_from(r: AddressRow) -> StoreResult<Self> {
        let address_type = r.address_type.parse().map_err(StoreError::Corrupt)?;
        Ok(Self {
            id: r.id, owner: r.owner_id, user_full_name: r.user_full_name, mobile_number: r.mobile_number,
            pincode: r.pincode, locality: r.locality, address: r.address, district: r.district, state: r.state,
            address_type, is_deliver: r.is_deliver, is_default: r.is_default,
            created_at: r.created_at, updated_at: r.updated_at,
        })
    }
}

fn addresses(rows: Vec<AddressRow>) -> StoreResult<Vec<Address>> {
    rows.into_iter().map(Address::try_from).collect()
}

#[derive(FromRow)]
struct OrderRow {
    id: Uuid, owner_id: Option<Uuid>, ordered_items: Json<Vec<OrderedItem>>,
    delivery_address: Json<DeliveryAddress>, created_at: DateTime<Utc>, updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(r: OrderRow) -> Self {
        Self {
            id: r.id, owner: r.owner_id, ordered_items: r.ordered_items.0,
            delivery_address: r.delivery_address.0, created_at: r.created_at, updated_at: r.updated_at,
        }
    }
}

/// Maps unique violations on the users table to [`StoreError::Duplicate`].
fn user_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some("users_phone_number_key") => "phone number",
                _ => "email",
            };
            return StoreError::Duplicate { field };
        }
    }
    StoreError::Database(err)
}

// Quantity is capped at Quantity::MAX, well inside i32.
fn quantity_param(quantity: Quantity) -> i32 { quantity.value() as i32 }

#[async_trait]
impl Store for PgStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products ORDER BY created_at, id")
            .fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(Product::from))
    }

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE category = $1 ORDER BY created_at, id")
            .bind(category).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn insert_product(&self, p: Product) -> StoreResult<Product> {
        sqlx::query("INSERT INTO products (id, title, brand, sell_price, mrp_price, rating, category, images_url, is_favourite, is_in_cart, is_cod, is_free_delivery, replace_policy, description, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)")
            .bind(p.id).bind(&p.title).bind(&p.brand).bind(p.sell_price).bind(p.mrp_price).bind(p.rating)
            .bind(&p.category).bind(Json(&p.images_url)).bind(p.is_favourite).bind(p.is_in_cart).bind(p.is_cod)
            .bind(p.is_free_delivery).bind(p.replace_policy).bind(p.description.as_slice())
            .bind(p.created_at).bind(p.updated_at)
            .execute(&self.pool).await?;
        Ok(p)
    }

    async fn insert_user(&self, user: User, password_hash: String) -> StoreResult<User> {
        sqlx::query("INSERT INTO users (id, full_name, date_of_birth, gender, email, phone_number, password_hash, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)")
            .bind(user.id).bind(&user.full_name).bind(user.date_of_birth).bind(&user.gender).bind(&user.email)
            .bind(&user.phone_number).bind(&password_hash).bind(user.created_at).bind(user.updated_at)
            .execute(&self.pool).await.map_err(user_write_error)?;
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| UserCredentials::from(r).user))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at, id")
            .fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(|r| UserCredentials::from(r).user).collect())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email).fetch_optional(&self.pool).await?;
        Ok(row.map(|r| UserCredentials::from(r).user))
    }

    async fn find_user_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        Ok(self.find_credentials_by_phone(phone).await?.map(|c| c.user))
    }

    async fn find_credentials_by_phone(&self, phone: &str) -> StoreResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE phone_number = $1")
            .bind(phone).fetch_optional(&self.pool).await?;
        Ok(row.map(UserCredentials::from))
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id).fetch_optional(&mut *tx).await?;
        let Some(row) = row else { return Ok(None) };
        let mut user = UserCredentials::from(row).user;
        user.apply(patch);
        sqlx::query("UPDATE users SET full_name = $2, date_of_birth = $3, gender = $4, email = $5, phone_number = $6, updated_at = $7 WHERE id = $1")
            .bind(user.id).bind(&user.full_name).bind(user.date_of_birth).bind(&user.gender)
            .bind(&user.email).bind(&user.phone_number).bind(user.updated_at)
            .execute(&mut *tx).await.map_err(user_write_error)?;
        tx.commit().await?;
        Ok(Some(user))
    }

    async fn list_favourites(&self, scope: OwnerScope) -> StoreResult<Vec<FavouriteItem>> {
        let rows = sqlx::query_as::<_, FavouriteRow>("SELECT * FROM favourites WHERE owner_id IS NOT DISTINCT FROM $1 ORDER BY created_at, id")
            .bind(scope.owner_id()).fetch_all(&self.pool).await?;
        let ids: Vec<Uuid> = rows.iter().map(|r| r.product_id).collect();
        let mut products = self.products_by_ids(&ids).await?;
        Ok(rows.into_iter()
            .filter_map(|r| products.remove(&r.product_id).map(|p| Favourite::from(r).populate(p)))
            .collect())
    }

    async fn toggle_favourite(&self, scope: OwnerScope, product_id: Uuid) -> StoreResult<Membership> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM favourites WHERE owner_id IS NOT DISTINCT FROM $1 AND product_id = $2")
            .bind(scope.owner_id()).bind(product_id).execute(&mut *tx).await?.rows_affected();
        let outcome = if removed > 0 {
            Membership::Removed
        } else {
            let fav = Favourite::create(scope, product_id);
            let inserted = sqlx::query("INSERT INTO favourites (id, owner_id, product_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5) ON CONFLICT DO NOTHING")
                .bind(fav.id).bind(fav.owner).bind(fav.item).bind(fav.created_at).bind(fav.updated_at)
                .execute(&mut *tx).await?.rows_affected();
            // A concurrent toggle committed the same row first.
            if inserted > 0 { Membership::Added } else { Membership::Unchanged }
        };
        if outcome != Membership::Unchanged {
            sqlx::query("UPDATE products SET is_favourite = $2, updated_at = NOW() WHERE id = $1")
                .bind(product_id).bind(outcome == Membership::Added).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(outcome)
    }

    async fn list_cart(&self, scope: OwnerScope) -> StoreResult<Vec<CartItem>> {
        let rows = sqlx::query_as::<_, CartRow>("SELECT * FROM cart_items WHERE owner_id IS NOT DISTINCT FROM $1 ORDER BY created_at, id")
            .bind(scope.owner_id()).fetch_all(&self.pool).await?;
        let ids: Vec<Uuid> = rows.iter().map(|r| r.product_id).collect();
        let mut products = self.products_by_ids(&ids).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(product) = products.remove(&row.product_id) {
                items.push(CartEntry::try_from(row)?.populate(product));
            }
        }
        Ok(items)
    }

    async fn add_to_cart(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Membership> {
        let mut tx = self.pool.begin().await?;
        let entry = CartEntry::create(scope, product_id, quantity);
        let inserted = sqlx::query("INSERT INTO cart_items (id, owner_id, product_id, cart_quantity, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING")
            .bind(entry.id).bind(entry.owner).bind(entry.item).bind(quantity_param(quantity))
            .bind(entry.created_at).bind(entry.updated_at)
            .execute(&mut *tx).await?.rows_affected();
        if inserted > 0 {
            sqlx::query("UPDATE products SET is_in_cart = TRUE, updated_at = NOW() WHERE id = $1")
                .bind(product_id).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(if inserted > 0 { Membership::Added } else { Membership::Unchanged })
    }

    async fn remove_from_cart(&self, scope: OwnerScope, product_id: Uuid) -> StoreResult<Membership> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query("DELETE FROM cart_items WHERE owner_id IS NOT DISTINCT FROM $1 AND product_id = $2")
            .bind(scope.owner_id()).bind(product_id).execute(&mut *tx).await?.rows_affected();
        if removed > 0 {
            sqlx::query("UPDATE products SET is_in_cart = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(product_id).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(if removed > 0 { Membership::Removed } else { Membership::Unchanged })
    }

    async fn toggle_cart(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Membership> {
        let mut tx = self.pool.begin().await?;
        let outcome = match self.cart_entry_for(&mut tx, scope, product_id).await? {
            Some(id) => {
                sqlx::query("DELETE FROM cart_items WHERE id = $1").bind(id).execute(&mut *tx).await?;
                Membership::Removed
            }
            None => {
                let entry = CartEntry::create(scope, product_id, quantity);
                sqlx::query("INSERT INTO cart_items (id, owner_id, product_id, cart_quantity, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT DO NOTHING")
                    .bind(entry.id).bind(entry.owner).bind(entry.item).bind(quantity_param(quantity))
                    .bind(entry.created_at).bind(entry.updated_at)
                    .execute(&mut *tx).await?;
                Membership::Added
            }
        };
        sqlx::query("UPDATE products SET is_in_cart = $2, updated_at = NOW() WHERE id = $1")
            .bind(product_id).bind(outcome == Membership::Added).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(outcome)
    }

    async fn set_cart_quantity(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Option<CartEntry>> {
        let row = sqlx::query_as::<_, CartRow>("UPDATE cart_items SET cart_quantity = $3, updated_at = NOW() WHERE owner_id IS NOT DISTINCT FROM $1 AND product_id = $2 RETURNING *")
            .bind(scope.owner_id()).bind(product_id).bind(quantity_param(quantity))
            .fetch_optional(&self.pool).await?;
        row.map(CartEntry::try_from).transpose()
    }

    async fn list_addresses(&self, scope: OwnerScope) -> StoreResult<Vec<Address>> {
        let rows = sqlx::query_as::<_, AddressRow>("SELECT * FROM addresses WHERE owner_id IS NOT DISTINCT FROM $1 ORDER BY created_at, id")
            .bind(scope.owner_id()).fetch_all(&self.pool).await?;
        addresses(rows)
    }

    async fn get_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Address>> {
        let row = sqlx::query_as::<_, AddressRow>("SELECT * FROM addresses WHERE id = $1 AND owner_id IS NOT DISTINCT FROM $2")
            .bind(id).bind(scope.owner_id()).fetch_optional(&self.pool).await?;
        row.map(Address::try_from).transpose()
    }

    async fn insert_address(&self, mut a: Address, claim_delivery: bool) -> StoreResult<Address> {
        let mut tx = self.pool.begin().await?;
        Self::lock_addresses(&mut tx, a.owner).await?;
        let (has_flagged,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM addresses WHERE owner_id IS NOT DISTINCT FROM $1 AND is_deliver)")
            .bind(a.owner).fetch_one(&mut *tx).await?;
        a.is_deliver = claim_delivery || !has_flagged;
        if a.is_deliver && has_flagged {
            sqlx::query("UPDATE addresses SET is_deliver = FALSE, updated_at = NOW() WHERE owner_id IS NOT DISTINCT FROM $1 AND is_deliver")
                .bind(a.owner).execute(&mut *tx).await?;
        }
        sqlx::query("INSERT INTO addresses (id, owner_id, user_full_name, mobile_number, pincode, locality, address, district, state, address_type, is_deliver, is_default, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)")
            .bind(a.id).bind(a.owner).bind(&a.user_full_name).bind(&a.mobile_number).bind(&a.pincode)
            .bind(&a.locality).bind(&a.address).bind(&a.district).bind(&a.state).bind(a.address_type.as_str())
            .bind(a.is_deliver).bind(a.is_default).bind(a.created_at).bind(a.updated_at)
            .execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(a)
    }

    async fn update_address(&self, scope: OwnerScope, id: Uuid, patch: AddressPatch) -> StoreResult<Option<Address>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, AddressRow>("SELECT * FROM addresses WHERE id = $1 AND owner_id IS NOT DISTINCT FROM $2 FOR UPDATE")
            .bind(id).bind(scope.owner_id()).fetch_optional(&mut *tx).await?;
        let Some(row) = row else { return Ok(None) };
        let mut a = Address::try_from(row)?;
        a.apply(patch);
        sqlx::query("UPDATE addresses SET user_full_name = $2, mobile_number = $3, pincode = $4, locality = $5, address = $6, district = $7, state = $8, address_type = $9, is_default = $10, updated_at = $11 WHERE id = $1")
            .bind(a.id).bind(&a.user_full_name).bind(&a.mobile_number).bind(&a.pincode).bind(&a.locality)
            .bind(&a.address).bind(&a.district).bind(&a.state).bind(a.address_type.as_str())
            .bind(a.is_default).bind(a.updated_at)
            .execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(Some(a))
    }

    async fn delete_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Address>> {
        let row = sqlx::query_as::<_, AddressRow>("DELETE FROM addresses WHERE id = $1 AND owner_id IS NOT DISTINCT FROM $2 RETURNING *")
            .bind(id).bind(scope.owner_id()).fetch_optional(&self.pool).await?;
        row.map(Address::try_from).transpose()
    }

    async fn mark_delivery_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Vec<Address>> {
        let mut tx = self.pool.begin().await?;
        Self::lock_addresses(&mut tx, scope.owner_id()).await?;
        // Flips every row whose flag differs from (id = target).
        let rows = sqlx::query_as::<_, AddressRow>(
            "UPDATE addresses SET is_deliver = (id = $2), updated_at = NOW() \
             WHERE owner_id IS NOT DISTINCT FROM $1 AND is_deliver <> (id = $2) \
             AND EXISTS (SELECT 1 FROM addresses t WHERE t.id = $2 AND t.owner_id IS NOT DISTINCT FROM $1) \
             RETURNING *")
            .bind(scope.owner_id()).bind(id).fetch_all(&mut *tx).await?;
        tx.commit().await?;
        addresses(rows)
    }

    async fn place_order(&self, order: Order) -> StoreResult<Order> {
        let ids = order.item_ids();
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO orders (id, owner_id, ordered_items, delivery_address, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6)")
            .bind(order.id).bind(order.owner).bind(Json(&order.ordered_items)).bind(Json(&order.delivery_address))
            .bind(order.created_at).bind(order.updated_at)
            .execute(&mut *tx).await?;
        sqlx::query("DELETE FROM cart_items WHERE owner_id IS NOT DISTINCT FROM $1 AND product_id = ANY($2)")
            .bind(order.owner).bind(ids.as_slice()).execute(&mut *tx).await?;
        sqlx::query("UPDATE products SET is_in_cart = FALSE, updated_at = NOW() WHERE id = ANY($1)")
            .bind(ids.as_slice()).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn list_orders(&self, scope: OwnerScope) -> StoreResult<Vec<Order>> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE owner_id IS NOT DISTINCT FROM $1 ORDER BY created_at DESC, id DESC")
            .bind(scope.owner_id()).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Order::from).collect())
    }

    async fn get_order(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Order>> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = $1 AND owner_id IS NOT DISTINCT FROM $2")
            .bind(id).bind(scope.owner_id()).fetch_optional(&self.pool).await?;
        Ok(row.map(Order::from))
    }
}
