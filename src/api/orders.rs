use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, CurrentOwner};
use crate::domain::{DeliveryAddress, Order, OrderedItem};
use crate::state::AppState;
use crate::Result;

pub async fn list_orders(State(s): State<AppState>, CurrentOwner(scope): CurrentOwner) -> Result<Json<Vec<Order>>> {
    Ok(Json(s.checkout.list_orders(scope).await?))
}

pub async fn get_order(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Order>> {
    Ok(Json(s.checkout.get_order(scope, id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub ordered_items: Vec<OrderedItem>,
    pub delivery_address: DeliveryAddress,
}

pub async fn place_order(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiJson(r): ApiJson<PlaceOrderRequest>,
) -> Result<Json<Value>> {
    let order = s.checkout.place_order(scope, r.ordered_items, r.delivery_address).await?;
    Ok(Json(json!({ "message": "Order placed successfully.", "savedItems": order })))
}
