//! Application services.
//!
//! Each service wraps the shared [`Store`](crate::store::Store) and owns the
//! policy for one area of the storefront. Handlers call services; services
//! never see HTTP types.

pub mod addresses;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod events;
pub mod profile;

pub use addresses::{AddressBook, DeliveryFallback};
pub use auth::{AuthService, Claims};
pub use catalog::Catalog;
pub use checkout::CheckoutService;
pub use events::EventPublisher;
pub use profile::ProfileService;
