//! Order Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::aggregates::AddressType;
use crate::domain::events::{DomainEvent, OrderEvent};
use crate::domain::value_objects::{OwnerScope, Quantity, QuantityError};

/// Placed order. Items and address are copies taken at placement time, so
/// later catalog or address edits never change a historical order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub owner: Option<Uuid>,
    pub ordered_items: Vec<OrderedItem>,
    pub delivery_address: DeliveryAddress,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedItem {
    pub item_id: Uuid,
    pub quantity: u32,
    pub item_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub user_full_name: String,
    pub mobile_number: String,
    pub pincode: String,
    pub locality: String,
    pub address: String,
    pub district: String,
    pub state: String,
    pub address_type: AddressType,
}

impl OrderedItem {
    pub fn line_total(&self) -> Option<Decimal> { self.price.checked_mul(Decimal::from(self.quantity)) }
}

impl Order {
    /// Validates every line and the order total before anything is persisted.
    pub fn place(scope: OwnerScope, items: Vec<OrderedItem>, address: DeliveryAddress) -> Result<Self, OrderError> {
        if items.is_empty() { return Err(OrderError::NoItems); }
        for item in &items {
            Quantity::new(item.quantity).map_err(|e| match e {
                QuantityError::Zero => OrderError::ZeroQuantity,
                QuantityError::TooLarge => OrderError::QuantityTooLarge,
            })?;
            if item.price < Decimal::ZERO { return Err(OrderError::NegativePrice); }
        }
        let now = Utc::now();
        let order = Self {
            id: Uuid::now_v7(), owner: scope.owner_id(), ordered_items: items,
            delivery_address: address, created_at: now, updated_at: now,
        };
        order.total()?;
        Ok(order)
    }

    /// Distinct product ids in the order, in first-seen order.
    pub fn item_ids(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = Vec::with_capacity(self.ordered_items.len());
        for item in &self.ordered_items {
            if !ids.contains(&item.item_id) { ids.push(item.item_id); }
        }
        ids
    }

    pub fn item_count(&self) -> u64 {
        self.ordered_items.iter().fold(0u64, |n, i| n.saturating_add(u64::from(i.quantity)))
    }

    pub fn total(&self) -> Result<Decimal, OrderError> {
        self.ordered_items.iter().try_fold(Decimal::ZERO, |sum, item| {
            item.line_total().and_then(|line| sum.checked_add(line)).ok_or(OrderError::TotalOverflow)
        })
    }

    pub fn placed_event(&self) -> Result<DomainEvent, OrderError> {
        Ok(DomainEvent::Order(OrderEvent::Placed {
            order_id: self.id, owner_id: self.owner, item_count: self.item_count(), total: self.total()?,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError { NoItems, ZeroQuantity, QuantityTooLarge, NegativePrice, TotalOverflow }
impl std::error::Error for OrderError {}
impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoItems => write!(f, "An order needs at least one item"),
            Self::ZeroQuantity => write!(f, "Ordered quantity must be at least 1"),
            Self::QuantityTooLarge => write!(f, "Ordered quantity cannot exceed {}", Quantity::MAX),
            Self::NegativePrice => write!(f, "Item price cannot be negative"),
            Self::TotalOverflow => write!(f, "Order total is too large"),
        }
    }
}
