//! Catalog read handlers.
//!
//! Product *writes* are out of scope for this service; the storefront's
//! admin tooling owns catalog CRUD. These reads exist so the storefront can
//! render listings and product pages from the same store the settlement
//! engine decrements.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use verve_core::Product;

/// `GET /products` query parameters.
#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    /// Storefront category filter ("Beauty", "Fashion", ...).
    #[serde(rename = "type")]
    pub product_type: Option<String>,
}

/// Product-list response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

/// `GET /products` - active products, optionally filtered by category.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<Json<ProductListResponse>> {
    let products = state
        .db
        .products()
        .list_active(query.product_type.as_deref())
        .await?;
    Ok(Json(ProductListResponse { products }))
}

/// `GET /products/{id}` - a single product.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let product = state
        .db
        .products()
        .get_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "Product",
            id,
        })?;
    Ok(Json(product))
}

// =============================================================================
// Unit Tests
// =============================================================================
