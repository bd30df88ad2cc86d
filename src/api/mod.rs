//! HTTP surface: route table and handlers.

mod addresses;
mod auth;
mod cart;
mod error;
mod extract;
mod orders;
mod products;
mod profile;

pub use extract::{ApiJson, ApiPath, CurrentOwner};

use axum::{
    routing::{delete, get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "opensase-storefront"})) }))
        // Catalog
        .route("/products", get(products::list_products))
        .route("/products/:id", get(products::get_product))
        .route("/products/category/:name", get(products::products_by_category))
        // Wishlist and cart
        .route("/favouriteItems", get(cart::list_favourites))
        .route("/product/favourite/:id", post(cart::toggle_favourite))
        .route("/cartItems", get(cart::list_cart))
        .route("/product/cart/:id", post(cart::toggle_cart))
        .route("/product/cart_quantity", post(cart::set_cart_quantity))
        // Addresses
        .route("/shipping_addresses", get(addresses::list_addresses))
        .route("/add_ship_address", post(addresses::add_address))
        .route("/update_address_deliver", post(addresses::set_delivery_address))
        .route("/update_address_details", post(addresses::update_address_details))
        .route("/delete_address/:id", delete(addresses::delete_address))
        // Profile
        .route("/user_profile_info", get(profile::list_profiles))
        .route("/update_user_profile", post(profile::update_profile))
        // Orders
        .route("/order_items", get(orders::list_orders))
        .route("/order-details/:id", get(orders::get_order))
        .route("/move_cart_to_order", post(orders::place_order))
        // Accounts
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
        .with_state(state)
}
