//! Wishlist and cart toggles, cart quantity and cart to order checkout.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{
    CartEntry, CartItem, DeliveryAddress, FavouriteItem, Membership, Order, OrderedItem, OwnerScope,
    Product, Quantity,
};
use crate::services::EventPublisher;
use crate::store::Store;
use crate::{EcommerceError, Result};

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Outcome of a wishlist or cart change.
#[derive(Debug)]
pub struct Toggled {
    pub membership: Membership,
    /// Whether the product is in the collection afterwards.
    pub member: bool,
    pub product: Product,
}

#[derive(Clone)]
pub struct CheckoutService {
    store: Arc<dyn Store>,
    events: EventPublisher,
}

impl CheckoutService {
    pub fn new(store: Arc<dyn Store>, events: EventPublisher) -> Self { Self { store, events } }

    // -------------------------------------------------------------------------
    // Wishlist
    // -------------------------------------------------------------------------

    pub async fn list_favourites(&self, scope: OwnerScope) -> Result<Vec<FavouriteItem>> {
        Ok(self.store.list_favourites(scope).await?)
    }

    pub async fn toggle_favourite(&self, scope: OwnerScope, product_id: Uuid) -> Result<Toggled> {
        self.require_product(product_id).await?;
        let membership = self.store.toggle_favourite(scope, product_id).await?;
        tracing::debug!(%scope, %product_id, ?membership, "wishlist toggled");
        let product = self.require_product(product_id).await?;
        // `Unchanged` means a concurrent toggle added the same row first.
        Ok(Toggled { membership, member: membership.is_member(true), product })
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    pub async fn list_cart(&self, scope: OwnerScope) -> Result<Vec<CartItem>> {
        Ok(self.store.list_cart(scope).await?)
    }

    /// `Some(true)` adds (idempotent), `Some(false)` removes (no-op when
    /// absent), `None` flips by existence. New lines start at quantity 1.
    pub async fn toggle_cart(&self, scope: OwnerScope, product_id: Uuid, requested: Option<bool>) -> Result<Toggled> {
        self.require_product(product_id).await?;
        let (membership, member) = match requested {
            Some(true) => (self.store.add_to_cart(scope, product_id, Quantity::ONE).await?, true),
            Some(false) => (self.store.remove_from_cart(scope, product_id).await?, false),
            None => {
                let m = self.store.toggle_cart(scope, product_id, Quantity::ONE).await?;
                (m, m.is_member(false))
            }
        };
        tracing::debug!(%scope, %product_id, ?membership, "cart toggled");
        let product = self.require_product(product_id).await?;
        Ok(Toggled { membership, member, product })
    }

    pub async fn set_cart_quantity(&self, scope: OwnerScope, product_id: Uuid, quantity: u32) -> Result<CartEntry> {
        let quantity = Quantity::new(quantity)?;
        self.store.set_cart_quantity(scope, product_id, quantity).await?
            .ok_or_else(|| EcommerceError::NotFound(PRODUCT_NOT_FOUND.into()))
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// Persists the order and clears the ordered products from the cart in
    /// one store transaction. Nothing is written unless the order and its
    /// event are valid.
    pub async fn place_order(&self, scope: OwnerScope, items: Vec<OrderedItem>, address: DeliveryAddress) -> Result<Order> {
        let order = Order::place(scope, items, address)?;
        let event = order.placed_event()?;
        let order = self.store.place_order(order).await?;
        tracing::info!(%scope, order_id = %order.id, items = order.ordered_items.len(), "order placed");
        self.events.publish(&event).await;
        Ok(order)
    }

    pub async fn list_orders(&self, scope: OwnerScope) -> Result<Vec<Order>> {
        Ok(self.store.list_orders(scope).await?)
    }

    pub async fn get_order(&self, scope: OwnerScope, id: Uuid) -> Result<Order> {
        self.store.get_order(scope, id).await?
            .ok_or_else(|| EcommerceError::NotFound("Order details not found.".into()))
    }

    async fn require_product(&self, id: Uuid) -> Result<Product> {
        self.store.get_product(id).await?
            .ok_or_else(|| EcommerceError::NotFound(PRODUCT_NOT_FOUND.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AddressType, NewProduct, ProductImages};
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    async fn setup() -> (CheckoutService, Arc<dyn Store>, Product) {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let product = store.insert_product(Product::create(NewProduct {
            title: "Denim Jacket".into(), brand: "Loom".into(), sell_price: Decimal::new(1499, 0),
            mrp_price: Decimal::new(2499, 0), rating: 4.3, category: "Men".into(),
            images_url: ProductImages::default(), is_cod: true, is_free_delivery: true,
            replace_policy: 7, description: vec!["Cotton".into()],
        })).await.unwrap();
        (CheckoutService::new(store.clone(), EventPublisher::disabled()), store, product)
    }

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            user_full_name: "Asha Rao".into(), mobile_number: "9876543210".into(), pincode: "560001".into(),
            locality: "MG Road".into(), address: "12 Residency Rd".into(), district: "Bengaluru Urban".into(),
            state: "Karnataka".into(), address_type: AddressType::Home,
        }
    }

    #[tokio::test]
    async fn test_toggle_favourite_twice_restores_membership() {
        let (checkout, _, product) = setup().await;
        let scope = OwnerScope::User(Uuid::now_v7());

        let first = checkout.toggle_favourite(scope, product.id).await.unwrap();
        assert_eq!(first.membership, Membership::Added);
        assert!(first.product.is_favourite);

        let second = checkout.toggle_favourite(scope, product.id).await.unwrap();
        assert_eq!(second.membership, Membership::Removed);
        assert!(!second.member);
        assert!(checkout.list_favourites(scope).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_unknown_product() {
        let (checkout, _, _) = setup().await;
        let err = checkout.toggle_favourite(OwnerScope::Shared, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, EcommerceError::NotFound(_)));
        let err = checkout.toggle_cart(OwnerScope::Shared, Uuid::now_v7(), Some(true)).await.unwrap_err();
        assert!(matches!(err, EcommerceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_cart_explicit_flags() {
        let (checkout, _, product) = setup().await;
        let scope = OwnerScope::User(Uuid::now_v7());

        let added = checkout.toggle_cart(scope, product.id, Some(true)).await.unwrap();
        assert_eq!(added.membership, Membership::Added);
        assert!(added.product.is_in_cart);
        let again = checkout.toggle_cart(scope, product.id, Some(true)).await.unwrap();
        assert_eq!(again.membership, Membership::Unchanged);
        assert!(again.member);

        let cart = checkout.list_cart(scope).await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].cart_quantity, 1);

        let removed = checkout.toggle_cart(scope, product.id, Some(false)).await.unwrap();
        assert_eq!(removed.membership, Membership::Removed);
        let noop = checkout.toggle_cart(scope, product.id, Some(false)).await.unwrap();
        assert_eq!(noop.membership, Membership::Unchanged);
        assert!(!noop.member);
        assert!(checkout.list_cart(scope).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_cart_without_flag_flips() {
        let (checkout, _, product) = setup().await;
        let scope = OwnerScope::Shared;
        assert!(checkout.toggle_cart(scope, product.id, None).await.unwrap().member);
        assert!(!checkout.toggle_cart(scope, product.id, None).await.unwrap().member);
    }

    #[tokio::test]
    async fn test_set_cart_quantity() {
        let (checkout, _, product) = setup().await;
        let scope = OwnerScope::User(Uuid::now_v7());

        let err = checkout.set_cart_quantity(scope, product.id, 2).await.unwrap_err();
        assert!(matches!(err, EcommerceError::NotFound(_)));

        checkout.toggle_cart(scope, product.id, Some(true)).await.unwrap();
        assert_eq!(checkout.set_cart_quantity(scope, product.id, 3).await.unwrap().cart_quantity, 3);
        let err = checkout.set_cart_quantity(scope, product.id, 0).await.unwrap_err();
        assert!(matches!(err, EcommerceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_place_order_clears_cart() {
        let (checkout, store, product) = setup().await;
        let scope = OwnerScope::User(Uuid::now_v7());
        let other = OwnerScope::User(Uuid::now_v7());
        checkout.toggle_cart(scope, product.id, Some(true)).await.unwrap();
        checkout.toggle_cart(other, product.id, Some(true)).await.unwrap();

        let item = OrderedItem {
            item_id: product.id, quantity: 2, item_name: product.title.clone(),
            price: product.sell_price, image_url: String::new(),
        };
        let order = checkout.place_order(scope, vec![item.clone()], address()).await.unwrap();

        assert!(checkout.list_cart(scope).await.unwrap().is_empty());
        assert_eq!(checkout.list_cart(other).await.unwrap().len(), 1);
        assert!(!store.get_product(product.id).await.unwrap().unwrap().is_in_cart);

        let fetched = checkout.get_order(scope, order.id).await.unwrap();
        assert_eq!(fetched.ordered_items, vec![item]);
        assert_eq!(fetched.delivery_address, address());
        assert!(matches!(checkout.get_order(other, order.id).await, Err(EcommerceError::NotFound(_))));
        assert_eq!(checkout.list_orders(scope).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty() {
        let (checkout, _, _) = setup().await;
        let err = checkout.place_order(OwnerScope::Shared, vec![], address()).await.unwrap_err();
        assert!(matches!(err, EcommerceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_place_order_rejects_oversized_quantity_without_persisting() {
        let (checkout, _, product) = setup().await;
        let scope = OwnerScope::User(Uuid::now_v7());
        checkout.toggle_cart(scope, product.id, Some(true)).await.unwrap();

        let item = OrderedItem {
            item_id: product.id, quantity: 4_000_000_000, item_name: product.title.clone(),
            price: product.sell_price, image_url: String::new(),
        };
        let err = checkout.place_order(scope, vec![item.clone(), item], address()).await.unwrap_err();
        assert!(matches!(err, EcommerceError::Validation(_)));
        assert!(checkout.list_orders(scope).await.unwrap().is_empty());
        assert_eq!(checkout.list_cart(scope).await.unwrap().len(), 1);
    }
}
