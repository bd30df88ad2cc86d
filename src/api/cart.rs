//! Wishlist and cart handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, CurrentOwner};
use crate::domain::{CartEntry, CartItem, FavouriteItem, Membership};
use crate::state::AppState;
use crate::Result;

pub async fn list_favourites(State(s): State<AppState>, CurrentOwner(scope): CurrentOwner) -> Result<Json<Vec<FavouriteItem>>> {
    Ok(Json(s.checkout.list_favourites(scope).await?))
}

pub async fn toggle_favourite(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiPath(product_id): ApiPath<Uuid>,
) -> Result<(StatusCode, Json<Value>)> {
    let toggled = s.checkout.toggle_favourite(scope, product_id).await?;
    let (status, message) = if toggled.member {
        (StatusCode::CREATED, "Product added to wishlist")
    } else {
        (StatusCode::OK, "Product removed from wishlist")
    };
    Ok((status, Json(json!({ "message": message, "isFavourite": toggled.member, "updatedItem": toggled.product }))))
}

pub async fn list_cart(State(s): State<AppState>, CurrentOwner(scope): CurrentOwner) -> Result<Json<Vec<CartItem>>> {
    Ok(Json(s.checkout.list_cart(scope).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartToggleRequest {
    pub is_in_cart: Option<bool>,
}

pub async fn toggle_cart(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiPath(product_id): ApiPath<Uuid>,
    body: Option<ApiJson<CartToggleRequest>>,
) -> Result<(StatusCode, Json<Value>)> {
    let requested = body.and_then(|ApiJson(r)| r.is_in_cart);
    let toggled = s.checkout.toggle_cart(scope, product_id, requested).await?;
    let (status, message) = match (toggled.membership, toggled.member) {
        (Membership::Added, _) => (StatusCode::CREATED, "Product added to cart"),
        (Membership::Removed, _) => (StatusCode::OK, "Product removed from cart"),
        (Membership::Unchanged, true) => (StatusCode::OK, "Product already in cart"),
        (Membership::Unchanged, false) => (StatusCode::OK, "Product not in cart"),
    };
    Ok((status, Json(json!({ "message": message, "isInCart": toggled.member, "updatedItem": toggled.product }))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuantityRequest {
    pub product_id: Uuid,
    pub cart_quantity: u32,
}

pub async fn set_cart_quantity(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiJson(r): ApiJson<CartQuantityRequest>,
) -> Result<Json<CartEntry>> {
    Ok(Json(s.checkout.set_cart_quantity(scope, r.product_id, r.cart_quantity).await?))
}
