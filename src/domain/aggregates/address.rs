//! Address Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::value_objects::{OwnerScope, PhoneNumber};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType { #[default] Home, Work }

impl AddressType {
    pub fn as_str(&self) -> &'static str {
        match self { Self::Home => "Home", Self::Work => "Work" }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for AddressType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Home" => Ok(Self::Home),
            "Work" => Ok(Self::Work),
            other => Err(format!("unknown address type: {other}")),
        }
    }
}

/// Shipping address owned by one user (or by nobody in shared mode).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Option<Uuid>,
    pub user_full_name: String,
    pub mobile_number: String,
    pub pincode: String,
    pub locality: String,
    pub address: String,
    pub district: String,
    pub state: String,
    pub address_type: AddressType,
    /// The delivery flag. At most one per owner.
    pub is_deliver: bool,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    #[validate(length(min = 1, max = 100, message = "full name is required"))]
    pub user_full_name: String,
    #[validate(custom = "validate_mobile")]
    pub mobile_number: String,
    #[validate(custom = "validate_pincode")]
    pub pincode: String,
    #[validate(length(min = 1, message = "locality is required"))]
    pub locality: String,
    #[validate(length(min = 1, max = 500, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "district is required"))]
    pub district: String,
    #[validate(length(min = 1, message = "state is required"))]
    pub state: String,
    pub address_type: AddressType,
    #[serde(default)]
    pub is_deliver: bool,
    #[serde(default)]
    pub is_default: bool,
}

/// Partial update of the descriptive fields. The delivery flag is managed by
/// the address book and is ignored here.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressPatch {
    #[validate(length(min = 1, max = 100))]
    pub user_full_name: Option<String>,
    #[validate(custom = "validate_mobile")]
    pub mobile_number: Option<String>,
    #[validate(custom = "validate_pincode")]
    pub pincode: Option<String>,
    #[validate(length(min = 1))]
    pub locality: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub address: Option<String>,
    #[validate(length(min = 1))]
    pub district: Option<String>,
    #[validate(length(min = 1))]
    pub state: Option<String>,
    pub address_type: Option<AddressType>,
    pub is_default: Option<bool>,
}

impl Address {
    /// Builds a new address for `scope`. The delivery flag starts cleared;
    /// the address book decides whether the address takes it.
    pub fn create(scope: OwnerScope, data: NewAddress) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(), owner: scope.owner_id(),
            user_full_name: data.user_full_name, mobile_number: data.mobile_number,
            pincode: data.pincode, locality: data.locality, address: data.address,
            district: data.district, state: data.state, address_type: data.address_type,
            is_deliver: false, is_default: data.is_default,
            created_at: now, updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: AddressPatch) {
        if let Some(v) = patch.user_full_name { self.user_full_name = v; }
        if let Some(v) = patch.mobile_number { self.mobile_number = v; }
        if let Some(v) = patch.pincode { self.pincode = v; }
        if let Some(v) = patch.locality { self.locality = v; }
        if let Some(v) = patch.address { self.address = v; }
        if let Some(v) = patch.district { self.district = v; }
        if let Some(v) = patch.state { self.state = v; }
        if let Some(v) = patch.address_type { self.address_type = v; }
        if let Some(v) = patch.is_default { self.is_default = v; }
        self.updated_at = Utc::now();
    }
}

pub(crate) fn validate_mobile(value: &str) -> Result<(), ValidationError> {
    PhoneNumber::parse(value).map(|_| ()).map_err(|_| ValidationError::new("mobile_number"))
}

fn validate_pincode(value: &str) -> Result<(), ValidationError> {
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_digit()) { Ok(()) }
    else { Err(ValidationError::new("pincode")) }
}
