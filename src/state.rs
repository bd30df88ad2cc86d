//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::{AccessMode, AppConfig};
use crate::services::{AddressBook, AuthService, Catalog, CheckoutService, EventPublisher, ProfileService};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Catalog,
    pub auth: AuthService,
    pub addresses: AddressBook,
    pub checkout: CheckoutService,
    pub profiles: ProfileService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>, events: EventPublisher) -> Self {
        Self {
            auth: AuthService::new(store.clone(), events.clone(), &config.jwt_secret, config.token_ttl),
            catalog: Catalog::new(store.clone()),
            addresses: AddressBook::new(store.clone(), config.delivery_fallback),
            checkout: CheckoutService::new(store.clone(), events),
            profiles: ProfileService::new(store),
            config: Arc::new(config),
        }
    }

    pub fn access_mode(&self) -> AccessMode { self.config.access_mode }
}
