// HTTP handlers for product endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::auth::middleware::BusinessAccess;
use crate::products::error::ProductError;
use crate::products::models::{
    CreateProductData, Product, ProductListQuery, ProductListResponse, UpdateProductData,
    UploadImageResponse,
};
use crate::AppState;

/// Handler for POST /api/products
/// Creates a product under the caller's business
pub async fn create_product_handler(
    State(state): State<AppState>,
    BusinessAccess(user): BusinessAccess,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Product>), ProductError> {
    let form = state.uploads.read_form(multipart).await?;
    let data =
        CreateProductData::from_fields(&form.fields).map_err(ProductError::ValidationError)?;

    let product = state
        .product_service
        .create_product(&user, data, form.image_url)
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// Handler for GET /api/products
/// Public listing with optional category/search filters
#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("category" = Option<String>, Query, description = "Case-insensitive substring match on category"),
        ("search" = Option<String>, Query, description = "Case-insensitive substring match on name or category"),
        ("page" = Option<i64>, Query, description = "1-indexed page, defaults to 1"),
        ("limit" = Option<i64>, Query, description = "Page size, defaults to 20, max 100")
    ),
    responses(
        (status = 200, description = "Products with their selling business", body = ProductListResponse),
        (status = 400, description = "Invalid pagination parameters")
    ),
    tag = "products"
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>, ProductError> {
    tracing::debug!("Listing products with filters: {:?}", query);

    let products = state.product_service.list_products(query).await?;
    Ok(Json(ProductListResponse { products }))
}

/// Handler for GET /api/products/:id
/// Public single-product lookup
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>, ProductError> {
    let product = state.product_service.get_product(id).await?;
    Ok(Json(product))
}

/// Handler for PUT /api/products/:id
/// Owner-only partial update
pub async fn update_product_handler(
    State(state): State<AppState>,
    BusinessAccess(user): BusinessAccess,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<Product>, ProductError> {
    let form = state.uploads.read_form(multipart).await?;
    let patch =
        UpdateProductData::from_fields(&form.fields).map_err(ProductError::ValidationError)?;

    let product = state
        .product_service
        .update_product(&user, id, patch, form.image_url)
        .await?;

    Ok(Json(product))
}

/// Handler for DELETE /api/products/:id
/// Owner-only delete
pub async fn delete_product_handler(
    State(state): State<AppState>,
    BusinessAccess(user): BusinessAccess,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ProductError> {
    state.product_service.delete_product(&user, id).await?;
    Ok(Json(json!({ "message": "Product deleted" })))
}

/// Handler for POST /api/products/:id/upload-image
/// Owner-only; stores the image and persists its reference
pub async fn upload_product_image_handler(
    State(state): State<AppState>,
    BusinessAccess(user): BusinessAccess,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<UploadImageResponse>, ProductError> {
    let form = state.uploads.read_form(multipart).await?;

    let image_url = state
        .product_service
        .set_product_image(&user, id, form.image_url)
        .await?;

    Ok(Json(UploadImageResponse { image_url }))
}
