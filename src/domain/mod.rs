//! Storefront domain model
pub mod aggregates;
pub mod events;
pub mod value_objects;

pub use aggregates::*;
pub use events::{AccountEvent, DomainEvent, OrderEvent};
pub use value_objects::{OwnerScope, PhoneNumber, Quantity};
