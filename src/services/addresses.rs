//! Shipping addresses and the delivery address invariant.
//!
//! Per owner at most one address carries `is_deliver`; whenever the owner has
//! addresses, exactly one does once an add or delete settles.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{Address, AddressPatch, NewAddress, OwnerScope};
use crate::store::Store;
use crate::{EcommerceError, Result};

const ADDRESS_NOT_FOUND: &str = "Address not found.";

/// Which remaining address takes the delivery flag when the flagged one is
/// deleted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeliveryFallback {
    #[default]
    OldestRemaining,
    /// Prefer this address when it is among the remaining ones.
    Preferred(Uuid),
}

impl DeliveryFallback {
    /// `remaining` is expected oldest first.
    pub fn choose(&self, remaining: &[Address]) -> Option<Uuid> {
        if let Self::Preferred(id) = self {
            if remaining.iter().any(|a| a.id == *id) {
                return Some(*id);
            }
        }
        remaining.iter().min_by_key(|a| (a.created_at, a.id)).map(|a| a.id)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressAdded {
    pub saved_address: Address,
    /// The previously selected address as it stands afterwards.
    pub updated_address: Option<Address>,
}

#[derive(Clone)]
pub struct AddressBook {
    store: Arc<dyn Store>,
    fallback: DeliveryFallback,
}

impl AddressBook {
    pub fn new(store: Arc<dyn Store>, fallback: DeliveryFallback) -> Self { Self { store, fallback } }

    pub async fn list(&self, scope: OwnerScope) -> Result<Vec<Address>> {
        Ok(self.store.list_addresses(scope).await?)
    }

    pub async fn add_address(&self, scope: OwnerScope, data: NewAddress, previous: Option<Uuid>) -> Result<AddressAdded> {
        data.validate()?;
        if let Some(prev) = previous {
            self.require(scope, prev).await?;
        }

        let requested = data.is_deliver;
        let saved = self.store.insert_address(Address::create(scope, data), requested).await?;
        if previous.is_some() && !saved.is_deliver {
            tracing::warn!(%scope, previous = ?previous, "new address did not request delivery; previous address keeps the flag");
        }
        tracing::info!(%scope, address_id = %saved.id, is_deliver = saved.is_deliver, "address added");

        let updated_address = match previous {
            Some(prev) => self.store.get_address(scope, prev).await?,
            None => None,
        };
        Ok(AddressAdded { saved_address: saved, updated_address })
    }

    /// Deletes the address and, if no flagged address is left, promotes one
    /// of the remaining addresses by the configured fallback.
    pub async fn delete_address(&self, scope: OwnerScope, id: Uuid) -> Result<Address> {
        let deleted = self.store.delete_address(scope, id).await?
            .ok_or_else(|| EcommerceError::NotFound(ADDRESS_NOT_FOUND.into()))?;

        let remaining = self.store.list_addresses(scope).await?;
        if !remaining.iter().any(|a| a.is_deliver) {
            if let Some(target) = self.fallback.choose(&remaining) {
                self.store.mark_delivery_address(scope, target).await?;
                tracing::info!(%scope, address_id = %target, "promoted fallback delivery address");
            }
        }
        Ok(deleted)
    }

    /// Flags `deliver_id` and clears the flag everywhere else for the owner.
    /// Returns both addresses as they stand afterwards.
    pub async fn set_delivery_address(&self, scope: OwnerScope, deliver_id: Uuid, not_deliver_id: Uuid) -> Result<[Address; 2]> {
        if deliver_id == not_deliver_id {
            return Err(EcommerceError::Validation("deliverAddressId and notDeliverAddressId must differ".into()));
        }
        self.require(scope, deliver_id).await?;
        self.require(scope, not_deliver_id).await?;

        self.store.mark_delivery_address(scope, deliver_id).await?;
        let deliver = self.require(scope, deliver_id).await?;
        let not_deliver = self.require(scope, not_deliver_id).await?;
        Ok([deliver, not_deliver])
    }

    pub async fn update_address_details(&self, scope: OwnerScope, id: Uuid, patch: AddressPatch) -> Result<Address> {
        patch.validate()?;
        self.store.update_address(scope, id, patch).await?
            .ok_or_else(|| EcommerceError::NotFound(ADDRESS_NOT_FOUND.into()))
    }

    async fn require(&self, scope: OwnerScope, id: Uuid) -> Result<Address> {
        self.store.get_address(scope, id).await?
            .ok_or_else(|| EcommerceError::NotFound(ADDRESS_NOT_FOUND.into()))
    }
}
