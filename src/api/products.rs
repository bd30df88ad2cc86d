use axum::{extract::State, Json};
use uuid::Uuid;

use super::extract::{ApiPath, CurrentOwner};
use crate::domain::Product;
use crate::state::AppState;
use crate::Result;

pub async fn list_products(State(s): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(s.catalog.list().await?))
}

pub async fn get_product(State(s): State<AppState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<Product>> {
    Ok(Json(s.catalog.get(id).await?))
}

pub async fn products_by_category(
    State(s): State<AppState>,
    _owner: CurrentOwner,
    ApiPath(category): ApiPath<String>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(s.catalog.by_category(&category).await?))
}
