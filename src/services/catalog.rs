//! Product catalog reads and seeding.

use std::path::Path;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewProduct, Product};
use crate::store::Store;
use crate::{EcommerceError, Result};

#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn Store>,
}

impl Catalog {
    pub fn new(store: Arc<dyn Store>) -> Self { Self { store } }

    pub async fn list(&self) -> Result<Vec<Product>> { Ok(self.store.list_products().await?) }

    pub async fn get(&self, id: Uuid) -> Result<Product> {
        self.store.get_product(id).await?
            .ok_or_else(|| EcommerceError::NotFound("Product not found".into()))
    }

    /// Products in `category`; an empty category is reported as not found.
    pub async fn by_category(&self, category: &str) -> Result<Vec<Product>> {
        let products = self.store.products_in_category(category).await?;
        if products.is_empty() {
            return Err(EcommerceError::NotFound("Selected category is not found".into()));
        }
        Ok(products)
    }

    /// Inserts every product from a JSON array, but only into an empty
    /// catalog. Returns how many products were inserted.
    pub async fn seed(&self, products: Vec<NewProduct>) -> Result<usize> {
        if !self.store.list_products().await?.is_empty() {
            tracing::info!("catalog already populated, skipping seed");
            return Ok(0);
        }
        let count = products.len();
        for new in products {
            self.store.insert_product(Product::create(new)).await?;
        }
        tracing::info!(count, "catalog seeded");
        Ok(count)
    }

    pub async fn seed_from_file(&self, path: &Path) -> Result<usize> {
        let raw = tokio::fs::read_to_string(path).await
            .map_err(|e| EcommerceError::Internal(format!("failed to read {}: {e}", path.display())))?;
        let products: Vec<NewProduct> = serde_json::from_str(&raw)
            .map_err(|e| EcommerceError::Internal(format!("invalid seed file {}: {e}", path.display())))?;
        self.seed(products).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn seed_products() -> Vec<NewProduct> {
        serde_json::from_value(json!([
            { "title": "Silk Saree", "brand": "Kanchi", "sellPrice": 2999.0, "mrpPrice": 4999.0,
              "rating": 4.6, "category": "Women", "isCOD": true,
              "imagesUrl": { "mainImage": "saree.jpg", "previewImages": [{ "id": 1, "imgUrl": "saree-1.jpg" }] } },
            { "title": "Linen Shirt", "sellPrice": 899.0, "mrpPrice": 1299.0, "category": "Men" }
        ])).unwrap()
    }

    #[tokio::test]
    async fn test_seed_only_into_empty_catalog() {
        let catalog = Catalog::new(Arc::new(MemoryStore::new()));
        assert_eq!(catalog.seed(seed_products()).await.unwrap(), 2);
        assert_eq!(catalog.seed(seed_products()).await.unwrap(), 0);
        assert_eq!(catalog.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_lookup() {
        let catalog = Catalog::new(Arc::new(MemoryStore::new()));
        catalog.seed(seed_products()).await.unwrap();

        let women = catalog.by_category("Women").await.unwrap();
        assert_eq!(women.len(), 1);
        assert_eq!(women[0].images_url.preview_images[0].img_url, "saree-1.jpg");
        assert_eq!(catalog.get(women[0].id).await.unwrap().title, "Silk Saree");

        assert!(matches!(catalog.by_category("Kids").await, Err(EcommerceError::NotFound(_))));
        assert!(matches!(catalog.get(Uuid::now_v7()).await, Err(EcommerceError::NotFound(_))));
    }
}
