//! Product route handlers.
//!
//! Reads are public; writes require an administrator session.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use bagan_baskets_core::ProductId;

use crate::db::CatalogStore;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

/// `GET /api/products` - list active products.
///
/// Serves an empty catalog (not an error) when the store is unavailable.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = CatalogStore::new(state.store()).list_active().await?;
    Ok(Json(products))
}

/// `GET /api/products/{id}` - single product lookup.
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = CatalogStore::new(state.store())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// `GET /api/products/category/{category}` - exact category match.
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>> {
    let products = CatalogStore::new(state.store())
        .list_by_category(&category)
        .await?;
    Ok(Json(products))
}

/// `POST /api/products` - create a product (admin).
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(product): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let created = CatalogStore::new(state.store()).create(product).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PATCH /api/products/{id}` - partial update (admin).
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    let updated = CatalogStore::new(state.store())
        .update(ProductId::new(id), patch)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(updated))
}
