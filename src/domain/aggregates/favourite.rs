//! Favourite (wishlist) join entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::Product;
use crate::domain::value_objects::OwnerScope;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favourite {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Option<Uuid>,
    pub item: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wishlist entry with its product populated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavouriteItem {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Option<Uuid>,
    pub item: Product,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Favourite {
    pub fn create(scope: OwnerScope, product_id: Uuid) -> Self {
        let now = Utc::now();
        Self { id: Uuid::now_v7(), owner: scope.owner_id(), item: product_id, created_at: now, updated_at: now }
    }

    pub fn populate(self, item: Product) -> FavouriteItem {
        FavouriteItem { id: self.id, owner: self.owner, item, created_at: self.created_at, updated_at: self.updated_at }
    }
}
