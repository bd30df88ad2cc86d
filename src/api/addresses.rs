//! Shipping address handlers.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, CurrentOwner};
use crate::domain::{Address, AddressPatch, NewAddress};
use crate::state::AppState;
use crate::Result;

pub async fn list_addresses(State(s): State<AppState>, CurrentOwner(scope): CurrentOwner) -> Result<Json<Vec<Address>>> {
    Ok(Json(s.addresses.list(scope).await?))
}

/// Clients send either the bare id or the whole previously selected address.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddressRef {
    Id(Uuid),
    Address {
        #[serde(rename = "_id")]
        id: Uuid,
    },
}

impl AddressRef {
    pub fn id(&self) -> Uuid {
        match self { Self::Id(id) | Self::Address { id } => *id }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAddressRequest {
    pub data: NewAddress,
    #[serde(default)]
    pub previous_selected_address: Option<AddressRef>,
}

pub async fn add_address(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiJson(r): ApiJson<AddAddressRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let previous = r.previous_selected_address.as_ref().map(AddressRef::id);
    let added = s.addresses.add_address(scope, r.data, previous).await?;
    Ok((StatusCode::CREATED, Json(json!({
        "message": "Address added successfully",
        "savedAddress": added.saved_address,
        "updatedAddress": added.updated_address,
    }))))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddressRequest {
    pub deliver_address_id: Uuid,
    pub not_deliver_address_id: Uuid,
}

pub async fn set_delivery_address(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiJson(r): ApiJson<DeliveryAddressRequest>,
) -> Result<Json<[Address; 2]>> {
    Ok(Json(s.addresses.set_delivery_address(scope, r.deliver_address_id, r.not_deliver_address_id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddressRequest {
    pub data_to_update: AddressPatch,
    pub address_id: Uuid,
}

pub async fn update_address_details(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiJson(r): ApiJson<UpdateAddressRequest>,
) -> Result<Json<Value>> {
    let updated = s.addresses.update_address_details(scope, r.address_id, r.data_to_update).await?;
    Ok(Json(json!({ "message": "Address updated successfully", "updatedAddress": updated })))
}

pub async fn delete_address(
    State(s): State<AppState>,
    CurrentOwner(scope): CurrentOwner,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Value>> {
    let deleted = s.addresses.delete_address(scope, id).await?;
    Ok(Json(json!({ "message": "Address deleted successfully", "deletedAddress": deleted })))
}
