//! In-memory implementation of [`Store`] for tests and database-less runs.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::domain::{
    Address, AddressPatch, CartEntry, CartItem, Favourite, FavouriteItem, Membership, Order,
    OwnerScope, Product, Quantity, User, UserCredentials, UserPatch,
};

/// Process-local store.
///
/// Collections are kept in insertion order, which doubles as creation order.
/// Every operation runs under a single lock, so each trait method is atomic
/// just like its transactional Postgres counterpart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<Collections>>,
}

#[derive(Default)]
struct Collections {
    products: Vec<Product>,
    users: Vec<UserCredentials>,
    favourites: Vec<Favourite>,
    cart: Vec<CartEntry>,
    addresses: Vec<Address>,
    orders: Vec<Order>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }
}

impl Collections {
    fn product(&self, id: Uuid) -> Option<&Product> { self.products.iter().find(|p| p.id == id) }

    fn update_product(&mut self, id: Uuid, f: impl FnOnce(&mut Product)) {
        if let Some(p) = self.products.iter_mut().find(|p| p.id == id) {
            f(p);
            p.updated_at = Utc::now();
        }
    }

    fn cart_position(&self, scope: OwnerScope, product_id: Uuid) -> Option<usize> {
        self.cart.iter().position(|c| scope.owns(c.owner) && c.item == product_id)
    }

    fn insert_cart_line(&mut self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) {
        self.cart.push(CartEntry::create(scope, product_id, quantity));
        self.update_product(product_id, |p| p.is_in_cart = true);
    }

    fn remove_cart_line(&mut self, index: usize) {
        let entry = self.cart.remove(index);
        self.update_product(entry.item, |p| p.is_in_cart = false);
    }

    fn check_user_unique(&self, except: Option<Uuid>, email: &str, phone: &str) -> StoreResult<()> {
        let others = self.users.iter().filter(|c| Some(c.user.id) != except);
        for other in others {
            if other.user.email == email { return Err(StoreError::Duplicate { field: "email" }); }
            if other.user.phone_number == phone { return Err(StoreError::Duplicate { field: "phone number" }); }
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        Ok(self.data.read().await.products.clone())
    }

    async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.data.read().await.product(id).cloned())
    }

    async fn products_in_category(&self, category: &str) -> StoreResult<Vec<Product>> {
        let data = self.data.read().await;
        Ok(data.products.iter().filter(|p| p.category == category).cloned().collect())
    }

    async fn insert_product(&self, product: Product) -> StoreResult<Product> {
        self.data.write().await.products.push(product.clone());
        Ok(product)
    }

    async fn insert_user(&self, user: User, password_hash: String) -> StoreResult<User> {
        let mut data = self.data.write().await;
        data.check_user_unique(None, &user.email, &user.phone_number)?;
        data.users.push(UserCredentials { user: user.clone(), password_hash });
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|c| c.user.id == id).map(|c| c.user.clone()))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.data.read().await.users.iter().map(|c| c.user.clone()).collect())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|c| c.user.email == email).map(|c| c.user.clone()))
    }

    async fn find_user_by_phone(&self, phone: &str) -> StoreResult<Option<User>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|c| c.user.phone_number == phone).map(|c| c.user.clone()))
    }

    async fn find_credentials_by_phone(&self, phone: &str) -> StoreResult<Option<UserCredentials>> {
        let data = self.data.read().await;
        Ok(data.users.iter().find(|c| c.user.phone_number == phone).cloned())
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut data = self.data.write().await;
        let Some(current) = data.users.iter().find(|c| c.user.id == id).map(|c| c.user.clone()) else {
            return Ok(None);
        };
        let mut updated = current;
        updated.apply(patch);
        data.check_user_unique(Some(id), &updated.email, &updated.phone_number)?;
        if let Some(slot) = data.users.iter_mut().find(|c| c.user.id == id) {
            slot.user = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn list_favourites(&self, scope: OwnerScope) -> StoreResult<Vec<FavouriteItem>> {
        let data = self.data.read().await;
        Ok(data.favourites.iter()
            .filter(|f| scope.owns(f.owner))
            .filter_map(|f| data.product(f.item).map(|p| f.clone().populate(p.clone())))
            .collect())
    }

    async fn toggle_favourite(&self, scope: OwnerScope, product_id: Uuid) -> StoreResult<Membership> {
        let mut data = self.data.write().await;
        let existing = data.favourites.iter().position(|f| scope.owns(f.owner) && f.item == product_id);
        let outcome = match existing {
            Some(index) => {
                data.favourites.remove(index);
                Membership::Removed
            }
            None => {
                data.favourites.push(Favourite::create(scope, product_id));
                Membership::Added
            }
        };
        let flag = outcome == Membership::Added;
        data.update_product(product_id, |p| p.is_favourite = flag);
        Ok(outcome)
    }

    async fn list_cart(&self, scope: OwnerScope) -> StoreResult<Vec<CartItem>> {
        let data = self.data.read().await;
        Ok(data.cart.iter()
            .filter(|c| scope.owns(c.owner))
            .filter_map(|c| data.product(c.item).map(|p| c.clone().populate(p.clone())))
            .collect())
    }

    async fn add_to_cart(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Membership> {
        let mut data = self.data.write().await;
        if data.cart_position(scope, product_id).is_some() { return Ok(Membership::Unchanged); }
        data.insert_cart_line(scope, product_id, quantity);
        Ok(Membership::Added)
    }

    async fn remove_from_cart(&self, scope: OwnerScope, product_id: Uuid) -> StoreResult<Membership> {
        let mut data = self.data.write().await;
        match data.cart_position(scope, product_id) {
            Some(index) => {
                data.remove_cart_line(index);
                Ok(Membership::Removed)
            }
            None => Ok(Membership::Unchanged),
        }
    }

    async fn toggle_cart(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Membership> {
        let mut data = self.data.write().await;
        match data.cart_position(scope, product_id) {
            Some(index) => {
                data.remove_cart_line(index);
                Ok(Membership::Removed)
            }
            None => {
                data.insert_cart_line(scope, product_id, quantity);
                Ok(Membership::Added)
            }
        }
    }

    async fn set_cart_quantity(&self, scope: OwnerScope, product_id: Uuid, quantity: Quantity) -> StoreResult<Option<CartEntry>> {
        let mut data = self.data.write().await;
        let entry = data.cart.iter_mut().find(|c| scope.owns(c.owner) && c.item == product_id);
        Ok(entry.map(|e| {
            e.set_quantity(quantity);
            e.clone()
        }))
    }

    async fn list_addresses(&self, scope: OwnerScope) -> StoreResult<Vec<Address>> {
        let data = self.data.read().await;
        Ok(data.addresses.iter().filter(|a| scope.owns(a.owner)).cloned().collect())
    }

    async fn get_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Address>> {
        let data = self.data.read().await;
        Ok(data.addresses.iter().find(|a| a.id == id && scope.owns(a.owner)).cloned())
    }

    async fn insert_address(&self, mut address: Address, claim_delivery: bool) -> StoreResult<Address> {
        let mut data = self.data.write().await;
        let scope = address.owner.map_or(OwnerScope::Shared, OwnerScope::User);
        address.is_deliver = claim_delivery || !data.addresses.iter().any(|a| scope.owns(a.owner) && a.is_deliver);
        if address.is_deliver {
            let now = Utc::now();
            for other in data.addresses.iter_mut().filter(|a| scope.owns(a.owner) && a.is_deliver) {
                other.is_deliver = false;
                other.updated_at = now;
            }
        }
        data.addresses.push(address.clone());
        Ok(address)
    }

    async fn update_address(&self, scope: OwnerScope, id: Uuid, patch: AddressPatch) -> StoreResult<Option<Address>> {
        let mut data = self.data.write().await;
        let address = data.addresses.iter_mut().find(|a| a.id == id && scope.owns(a.owner));
        Ok(address.map(|a| {
            a.apply(patch);
            a.clone()
        }))
    }

    async fn delete_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Address>> {
        let mut data = self.data.write().await;
        let index = data.addresses.iter().position(|a| a.id == id && scope.owns(a.owner));
        Ok(index.map(|i| data.addresses.remove(i)))
    }

    async fn mark_delivery_address(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Vec<Address>> {
        let mut data = self.data.write().await;
        if !data.addresses.iter().any(|a| a.id == id && scope.owns(a.owner)) {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let mut changed = Vec::new();
        for address in data.addresses.iter_mut().filter(|a| scope.owns(a.owner)) {
            let flag = address.id == id;
            if address.is_deliver != flag {
                address.is_deliver = flag;
                address.updated_at = now;
                changed.push(address.clone());
            }
        }
        Ok(changed)
    }

    async fn place_order(&self, order: Order) -> StoreResult<Order> {
        let mut data = self.data.write().await;
        let scope = order.owner.map_or(OwnerScope::Shared, OwnerScope::User);
        let ordered = order.item_ids();
        data.cart.retain(|c| !(scope.owns(c.owner) && ordered.contains(&c.item)));
        for id in &ordered {
            data.update_product(*id, |p| p.is_in_cart = false);
        }
        data.orders.push(order.clone());
        Ok(order)
    }

    async fn list_orders(&self, scope: OwnerScope) -> StoreResult<Vec<Order>> {
        let data = self.data.read().await;
        Ok(data.orders.iter().rev().filter(|o| scope.owns(o.owner)).cloned().collect())
    }

    async fn get_order(&self, scope: OwnerScope, id: Uuid) -> StoreResult<Option<Order>> {
        let data = self.data.read().await;
        Ok(data.orders.iter().find(|o| o.id == id && scope.owns(o.owner)).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AddressType, NewAddress, NewProduct, ProductImages};
    use rust_decimal::Decimal;
    use tokio::task::JoinSet;

    fn product(category: &str) -> Product {
        Product::create(NewProduct {
            title: "Kurta".into(), brand: "Loom".into(), sell_price: Decimal::new(799, 0), mrp_price: Decimal::new(999, 0),
            rating: 4.0, category: category.into(), images_url: ProductImages::default(), is_cod: true,
            is_free_delivery: false, replace_policy: 10, description: vec![],
        })
    }

    #[tokio::test]
    async fn test_toggle_favourite_mirrors_flag() {
        let store = MemoryStore::new();
        let p = store.insert_product(product("Women")).await.unwrap();
        let scope = OwnerScope::User(Uuid::now_v7());

        assert_eq!(store.toggle_favourite(scope, p.id).await.unwrap(), Membership::Added);
        assert!(store.get_product(p.id).await.unwrap().unwrap().is_favourite);
        assert_eq!(store.list_favourites(scope).await.unwrap().len(), 1);

        assert_eq!(store.toggle_favourite(scope, p.id).await.unwrap(), Membership::Removed);
        assert!(!store.get_product(p.id).await.unwrap().unwrap().is_favourite);
        assert!(store.list_favourites(scope).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cart_is_scoped_by_owner() {
        let store = MemoryStore::new();
        let p = store.insert_product(product("Men")).await.unwrap();
        let alice = OwnerScope::User(Uuid::now_v7());
        let bob = OwnerScope::User(Uuid::now_v7());

        assert_eq!(store.add_to_cart(alice, p.id, Quantity::ONE).await.unwrap(), Membership::Added);
        assert_eq!(store.add_to_cart(alice, p.id, Quantity::ONE).await.unwrap(), Membership::Unchanged);
        assert!(store.list_cart(bob).await.unwrap().is_empty());
        assert!(store.set_cart_quantity(bob, p.id, Quantity::ONE).await.unwrap().is_none());
        assert_eq!(store.remove_from_cart(bob, p.id).await.unwrap(), Membership::Unchanged);
        assert_eq!(store.list_cart(alice).await.unwrap().len(), 1);
        assert!(store.get_product(p.id).await.unwrap().unwrap().is_in_cart);
    }

    #[tokio::test]
    async fn test_concurrent_cart_adds_keep_one_line() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let id = store.insert_product(product("Men")).await.unwrap().id;
        let scope = OwnerScope::User(Uuid::now_v7());

        let mut tasks = JoinSet::new();
        for _ in 0..32 {
            let store = store.clone();
            tasks.spawn(async move { store.add_to_cart(scope, id, Quantity::ONE).await });
        }
        let mut added = 0;
        while let Some(outcome) = tasks.join_next().await {
            if outcome.unwrap().unwrap() == Membership::Added { added += 1; }
        }
        assert_eq!(added, 1);
        assert_eq!(store.list_cart(scope).await.unwrap().len(), 1);
        assert!(store.get_product(id).await.unwrap().unwrap().is_in_cart);
    }

    #[tokio::test]
    async fn test_concurrent_favourite_toggles_stay_consistent() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let id = store.insert_product(product("Women")).await.unwrap().id;

        let mut tasks = JoinSet::new();
        for _ in 0..33 {
            let store = store.clone();
            tasks.spawn(async move { store.toggle_favourite(OwnerScope::Shared, id).await });
        }
        let (mut added, mut removed) = (0, 0);
        while let Some(outcome) = tasks.join_next().await {
            match outcome.unwrap().unwrap() {
                Membership::Added => added += 1,
                Membership::Removed => removed += 1,
                Membership::Unchanged => {}
            }
        }
        assert_eq!(added, removed + 1);
        let rows = store.list_favourites(OwnerScope::Shared).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(store.get_product(id).await.unwrap().unwrap().is_favourite);
    }

    fn address(scope: OwnerScope) -> Address {
        Address::create(scope, NewAddress {
            user_full_name: "Asha Rao".into(), mobile_number: "9876543210".into(), pincode: "560001".into(),
            locality: "MG Road".into(), address: "12 Residency Rd".into(), district: "Bengaluru Urban".into(),
            state: "Karnataka".into(), address_type: AddressType::Home, is_deliver: false, is_default: false,
        })
    }

    #[tokio::test]
    async fn test_concurrent_first_addresses_flag_exactly_one() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let scope = OwnerScope::User(Uuid::now_v7());

        let mut tasks = JoinSet::new();
        for _ in 0..16 {
            let store = store.clone();
            tasks.spawn(async move { store.insert_address(address(scope), false).await });
        }
        while let Some(outcome) = tasks.join_next().await {
            outcome.unwrap().unwrap();
        }
        let all = store.list_addresses(scope).await.unwrap();
        assert_eq!(all.len(), 16);
        assert_eq!(all.iter().filter(|a| a.is_deliver).count(), 1);

        let claimed = store.insert_address(address(scope), true).await.unwrap();
        let flagged: Vec<Uuid> = store.list_addresses(scope).await.unwrap()
            .into_iter().filter(|a| a.is_deliver).map(|a| a.id).collect();
        assert_eq!(flagged, vec![claimed.id]);
    }

    #[tokio::test]
    async fn test_duplicate_user_rejected() {
        use chrono::NaiveDate;
        let store = MemoryStore::new();
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        let first = User::create("A".into(), dob, "Male".into(), "a@x.io".into(), "9999999999".into());
        let second = User::create("B".into(), dob, "Male".into(), "b@x.io".into(), "9999999999".into());
        store.insert_user(first, "hash".into()).await.unwrap();
        let err = store.insert_user(second, "hash".into()).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "phone number" }));
    }
}
