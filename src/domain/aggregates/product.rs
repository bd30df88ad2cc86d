//! Product Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog item.
///
/// `is_favourite` and `is_in_cart` mirror the most recent wishlist/cart change
/// for the product. They are informational only; the favourites and cart
/// collections are the source of truth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub mrp_price: Decimal,
    pub rating: f64,
    pub category: String,
    pub images_url: ProductImages,
    pub is_favourite: bool,
    pub is_in_cart: bool,
    #[serde(rename = "isCOD")]
    pub is_cod: bool,
    pub is_free_delivery: bool,
    /// Replacement window in days.
    pub replace_policy: i32,
    pub description: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImages {
    pub main_image: String,
    #[serde(default)]
    pub preview_images: Vec<PreviewImage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewImage { pub id: i32, pub img_url: String }

/// Catalog entry as it appears in a seed file.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    #[serde(default)]
    pub brand: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sell_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub mrp_price: Decimal,
    #[serde(default)]
    pub rating: f64,
    pub category: String,
    #[serde(default)]
    pub images_url: ProductImages,
    #[serde(default, rename = "isCOD")]
    pub is_cod: bool,
    #[serde(default)]
    pub is_free_delivery: bool,
    #[serde(default)]
    pub replace_policy: i32,
    #[serde(default)]
    pub description: Vec<String>,
}

impl Product {
    pub fn create(new: NewProduct) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(), title: new.title, brand: new.brand,
            sell_price: new.sell_price, mrp_price: new.mrp_price, rating: new.rating,
            category: new.category, images_url: new.images_url,
            is_favourite: false, is_in_cart: false,
            is_cod: new.is_cod, is_free_delivery: new.is_free_delivery,
            replace_policy: new.replace_policy, description: new.description,
            created_at: now, updated_at: now,
        }
    }
}
