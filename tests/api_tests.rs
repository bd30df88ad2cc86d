//! HTTP round-trips over the full router, backed by the in-memory store.

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use opensase_storefront::{
    api, domain::NewProduct, services::EventPublisher, AccessMode, AppConfig, AppState, MemoryStore,
};

struct Harness {
    server: TestServer,
    products: Vec<String>,
}

async fn harness(mode: AccessMode) -> Harness {
    let config = AppConfig::new("integration-test-signing-key-0123456789").with_access_mode(mode);
    let state = AppState::new(config, Arc::new(MemoryStore::new()), EventPublisher::disabled());
    let catalog: Vec<NewProduct> = serde_json::from_value(json!([
        { "title": "Silk Saree", "brand": "Kanchi", "sellPrice": 2999.0, "mrpPrice": 4999.0, "rating": 4.6,
          "category": "Women", "imagesUrl": { "mainImage": "saree.jpg" } },
        { "title": "Linen Shirt", "brand": "Loom", "sellPrice": 899.0, "mrpPrice": 1299.0, "rating": 4.1,
          "category": "Men" }
    ])).unwrap();
    state.catalog.seed(catalog).await.unwrap();
    let products = state.catalog.list().await.unwrap().into_iter().map(|p| p.id.to_string()).collect();
    Harness { server: TestServer::new(api::router(state)).unwrap(), products }
}

fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

async fn register_and_login(server: &TestServer, email: &str, phone: &str) -> HeaderValue {
    let response = server.post("/auth/register").json(&json!({
        "fullName": "Test User", "dateOfBirth": "1994-02-03", "gender": "Female",
        "email": email, "phoneNumber": phone, "password": "p1"
    })).await;
    response.assert_status(StatusCode::CREATED);

    let response = server.post("/auth/login").json(&json!({ "phoneNumber": phone, "password": "p1" })).await;
    response.assert_status_ok();
    let body: Value = response.json();
    bearer(body["token"].as_str().unwrap())
}

fn address(locality: &str, is_deliver: bool) -> Value {
    json!({
        "userFullName": "Asha Rao", "mobileNumber": "9876543210", "pincode": "560001",
        "locality": locality, "address": "12 Residency Rd", "district": "Bengaluru Urban",
        "state": "Karnataka", "addressType": "Home", "isDeliver": is_deliver
    })
}

#[tokio::test]
async fn test_health_and_public_catalog() {
    let h = harness(AccessMode::Authenticated).await;
    let body: Value = h.server.get("/health").await.json();
    assert_eq!(body["status"], "healthy");

    let products: Vec<Value> = h.server.get("/products").await.json();
    assert_eq!(products.len(), 2);
    assert!(products[0]["_id"].is_string());
    assert!(products[0]["isCOD"].is_boolean());

    let response = h.server.get(&format!("/products/{}", h.products[0])).await;
    response.assert_status_ok();
    h.server.get(&format!("/products/{}", uuid::Uuid::now_v7())).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_register_login_and_errors() {
    let h = harness(AccessMode::Authenticated).await;
    let auth = register_and_login(&h.server, "asha@example.com", "9999999999").await;

    let duplicate = h.server.post("/auth/register").json(&json!({
        "fullName": "Other", "dateOfBirth": "1990-01-01", "gender": "Male",
        "email": "ASHA@example.com", "phoneNumber": "8888888888", "password": "x"
    })).await;
    duplicate.assert_status(StatusCode::CONFLICT);

    let wrong = h.server.post("/auth/login").json(&json!({ "phoneNumber": "9999999999", "password": "p2" })).await;
    wrong.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = wrong.json();
    assert_eq!(body["error"], "Invalid phone number or password");

    let profiles: Vec<Value> = h.server.get("/user_profile_info").add_header(AUTHORIZATION, auth).await.json();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["email"], "asha@example.com");
    assert!(profiles[0].get("password").is_none());
    assert!(profiles[0].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let h = harness(AccessMode::Authenticated).await;
    let response = h.server.get("/cartItems").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert!(body["error"].is_string());

    h.server.get("/products/category/Women").add_header(AUTHORIZATION, bearer("garbage")).await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_category_browse() {
    let h = harness(AccessMode::Authenticated).await;
    let auth = register_and_login(&h.server, "a@example.com", "9999999999").await;
    let women: Vec<Value> = h.server.get("/products/category/Women").add_header(AUTHORIZATION, auth.clone()).await.json();
    assert_eq!(women.len(), 1);
    h.server.get("/products/category/Kids").add_header(AUTHORIZATION, auth).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_favourite_toggle_twice_restores() {
    let h = harness(AccessMode::Authenticated).await;
    let auth = register_and_login(&h.server, "a@example.com", "9999999999").await;
    let path = format!("/product/favourite/{}", h.products[0]);

    let added = h.server.post(&path).add_header(AUTHORIZATION, auth.clone()).await;
    added.assert_status(StatusCode::CREATED);
    let favourites: Vec<Value> = h.server.get("/favouriteItems").add_header(AUTHORIZATION, auth.clone()).await.json();
    assert_eq!(favourites.len(), 1);
    assert_eq!(favourites[0]["item"]["_id"], h.products[0].as_str());

    h.server.post(&path).add_header(AUTHORIZATION, auth.clone()).await.assert_status_ok();
    let favourites: Vec<Value> = h.server.get("/favouriteItems").add_header(AUTHORIZATION, auth).await.json();
    assert!(favourites.is_empty());
}

#[tokio::test]
async fn test_cart_is_isolated_between_users() {
    let h = harness(AccessMode::Authenticated).await;
    let alice = register_and_login(&h.server, "alice@example.com", "9999999999").await;
    let bob = register_and_login(&h.server, "bob@example.com", "8888888888").await;
    let path = format!("/product/cart/{}", h.products[0]);

    h.server.post(&path).add_header(AUTHORIZATION, alice.clone()).json(&json!({ "isInCart": true })).await
        .assert_status(StatusCode::CREATED);
    h.server.post(&path).add_header(AUTHORIZATION, alice.clone()).json(&json!({ "isInCart": true })).await
        .assert_status_ok();

    let cart: Vec<Value> = h.server.get("/cartItems").add_header(AUTHORIZATION, alice.clone()).await.json();
    assert_eq!(cart.len(), 1);
    assert_eq!(cart[0]["cartQuantity"], 1);
    let cart: Vec<Value> = h.server.get("/cartItems").add_header(AUTHORIZATION, bob.clone()).await.json();
    assert!(cart.is_empty());

    let quantity = json!({ "productId": h.products[0], "cartQuantity": 3 });
    h.server.post("/product/cart_quantity").add_header(AUTHORIZATION, bob).json(&quantity).await
        .assert_status(StatusCode::NOT_FOUND);
    let entry: Value = h.server.post("/product/cart_quantity").add_header(AUTHORIZATION, alice.clone()).json(&quantity).await.json();
    assert_eq!(entry["cartQuantity"], 3);

    let removed = h.server.post(&path).add_header(AUTHORIZATION, alice.clone()).json(&json!({ "isInCart": false })).await;
    removed.assert_status_ok();
    let again: Value = h.server.post(&path).add_header(AUTHORIZATION, alice.clone()).json(&json!({ "isInCart": false })).await.json();
    assert_eq!(again["isInCart"], false);
    let cart: Vec<Value> = h.server.get("/cartItems").add_header(AUTHORIZATION, alice).await.json();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_delivery_address_invariant() {
    let h = harness(AccessMode::Authenticated).await;
    let auth = register_and_login(&h.server, "a@example.com", "9999999999").await;

    let first: Value = h.server.post("/add_ship_address").add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "data": address("MG Road", true) })).await.json();
    let first = first["savedAddress"].clone();
    assert_eq!(first["isDeliver"], true);

    let second = h.server.post("/add_ship_address").add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "data": address("Indiranagar", true), "previousSelectedAddress": first })).await;
    second.assert_status(StatusCode::CREATED);
    let second: Value = second.json();
    assert_eq!(second["savedAddress"]["isDeliver"], true);
    assert_eq!(second["updatedAddress"]["isDeliver"], false);
    let second_id = second["savedAddress"]["_id"].as_str().unwrap().to_string();

    h.server.delete(&format!("/delete_address/{second_id}")).add_header(AUTHORIZATION, auth.clone()).await.assert_status_ok();
    let remaining: Vec<Value> = h.server.get("/shipping_addresses").add_header(AUTHORIZATION, auth.clone()).await.json();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["isDeliver"], true);

    h.server.delete(&format!("/delete_address/{}", first["_id"].as_str().unwrap())).add_header(AUTHORIZATION, auth.clone()).await
        .assert_status_ok();
    let remaining: Vec<Value> = h.server.get("/shipping_addresses").add_header(AUTHORIZATION, auth.clone()).await.json();
    assert!(remaining.is_empty());

    h.server.delete(&format!("/delete_address/{second_id}")).add_header(AUTHORIZATION, auth).await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_switch_and_update_address() {
    let h = harness(AccessMode::Authenticated).await;
    let auth = register_and_login(&h.server, "a@example.com", "9999999999").await;
    let a: Value = h.server.post("/add_ship_address").add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "data": address("A", true) })).await.json();
    let b: Value = h.server.post("/add_ship_address").add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "data": address("B", false) })).await.json();
    let a_id = a["savedAddress"]["_id"].clone();
    let b_id = b["savedAddress"]["_id"].clone();

    let pair: Vec<Value> = h.server.post("/update_address_deliver").add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "deliverAddressId": b_id, "notDeliverAddressId": a_id })).await.json();
    assert_eq!(pair[0]["isDeliver"], true);
    assert_eq!(pair[1]["isDeliver"], false);

    let updated: Value = h.server.post("/update_address_details").add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "addressId": a_id, "dataToUpdate": { "locality": "Koramangala", "addressType": "Work" } })).await.json();
    assert_eq!(updated["updatedAddress"]["locality"], "Koramangala");
    assert_eq!(updated["updatedAddress"]["addressType"], "Work");

    let other = register_and_login(&h.server, "b@example.com", "8888888888").await;
    h.server.post("/update_address_details").add_header(AUTHORIZATION, other)
        .json(&json!({ "addressId": a_id, "dataToUpdate": { "locality": "X" } })).await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_place_order_round_trip() {
    let h = harness(AccessMode::Authenticated).await;
    let auth = register_and_login(&h.server, "a@example.com", "9999999999").await;
    let product = &h.products[0];
    h.server.post(&format!("/product/cart/{product}")).add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "isInCart": true })).await.assert_status(StatusCode::CREATED);

    let items = json!([{ "itemId": product, "quantity": 2, "itemName": "Silk Saree", "price": 2999.0, "imageUrl": "saree.jpg" }]);
    let delivery = address("MG Road", true);
    let placed = h.server.post("/move_cart_to_order").add_header(AUTHORIZATION, auth.clone())
        .json(&json!({ "orderedItems": items, "deliveryAddress": delivery })).await;
    placed.assert_status_ok();
    let placed: Value = placed.json();
    let order_id = placed["savedItems"]["_id"].as_str().unwrap().to_string();

    let cart: Vec<Value> = h.server.get("/cartItems").add_header(AUTHORIZATION, auth.clone()).await.json();
    assert!(cart.is_empty());
    let product_body: Value = h.server.get(&format!("/products/{product}")).await.json();
    assert_eq!(product_body["isInCart"], false);

    let order: Value = h.server.get(&format!("/order-details/{order_id}")).add_header(AUTHORIZATION, auth.clone()).await.json();
    assert_eq!(order["orderedItems"], items);
    assert_eq!(order["deliveryAddress"]["locality"], "MG Road");
    let orders: Vec<Value> = h.server.get("/order_items").add_header(AUTHORIZATION, auth.clone()).await.json();
    assert_eq!(orders.len(), 1);

    let other = register_and_login(&h.server, "b@example.com", "8888888888").await;
    h.server.get(&format!("/order-details/{order_id}")).add_header(AUTHORIZATION, other).await
        .assert_status(StatusCode::NOT_FOUND);

    h.server.post("/move_cart_to_order").add_header(AUTHORIZATION, auth)
        .json(&json!({ "orderedItems": [], "deliveryAddress": delivery })).await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_shared_mode_needs_no_token() {
    let h = harness(AccessMode::Shared).await;
    let path = format!("/product/cart/{}", h.products[1]);
    h.server.post(&path).await.assert_status(StatusCode::CREATED);
    let cart: Vec<Value> = h.server.get("/cartItems").await.json();
    assert_eq!(cart.len(), 1);
    assert!(cart[0]["owner"].is_null());

    h.server.post(&path).await.assert_status_ok();
    let cart: Vec<Value> = h.server.get("/cartItems").await.json();
    assert!(cart.is_empty());

    h.server.post("/update_user_profile").json(&json!({ "dataToUpdate": { "gender": "Other" } })).await
        .assert_status(StatusCode::BAD_REQUEST);
}
