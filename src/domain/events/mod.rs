//! Domain events
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum DomainEvent {
    Account(AccountEvent),
    Order(OrderEvent),
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AccountEvent {
    Registered { user_id: Uuid },
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrderEvent {
    Placed { order_id: Uuid, owner_id: Option<Uuid>, item_count: u64, total: Decimal },
}

impl DomainEvent {
    /// Message subject the event is published on.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Account(AccountEvent::Registered { .. }) => "storefront.users.registered",
            Self::Order(OrderEvent::Placed { .. }) => "storefront.orders.placed",
        }
    }
}
