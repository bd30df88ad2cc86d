//! Cart Aggregate

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::Product;
use crate::domain::value_objects::{OwnerScope, Quantity};

/// One (owner, product) line in the cart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Option<Uuid>,
    pub item: Uuid,
    pub cart_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart line with its product populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Option<Uuid>,
    pub item: Product,
    pub cart_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CartEntry {
    pub fn create(scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(), owner: scope.owner_id(), item: product_id,
            cart_quantity: quantity.value(), created_at: now, updated_at: now,
        }
    }

    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.cart_quantity = quantity.value();
        self.updated_at = Utc::now();
    }

    pub fn populate(self, item: Product) -> CartItem {
        CartItem {
            id: self.id, owner: self.owner, item, cart_quantity: self.cart_quantity,
            created_at: self.created_at, updated_at: self.updated_at,
        }
    }
}

/// Result of a membership change on a join collection (cart or favourites).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Membership {
    Added,
    Removed,
    /// The requested state already held; nothing was written.
    Unchanged,
}

impl Membership {
    /// Whether the product is a member after the change, given the state requested.
    pub fn is_member(&self, requested: bool) -> bool {
        match self { Self::Added => true, Self::Removed => false, Self::Unchanged => requested }
    }
}
