// HTTP handlers for business endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::auth::middleware::{AuthenticatedUser, BusinessAccess};
use crate::businesses::models::{
    BusinessListResponse, BusinessProductsResponse, CreateBusinessData, DeleteBusinessRequest,
    OwnBusinessListResponse, UpdateBusinessData,
};
use crate::businesses::repository::BusinessRepository;
use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::AppState;

/// Handler for POST /api/businesses
/// Creates a business owned by the authenticated user
pub async fn create_business_handler(
    State(state): State<AppState>,
    BusinessAccess(user): BusinessAccess,
    multipart: Multipart,
) -> Result<(StatusCode, Json<crate::businesses::models::Business>), ApiError> {
    let form = state.uploads.read_form(multipart).await?;

    let name = form
        .field("name")
        .ok_or_else(|| ApiError::BadRequest("Business name and email are required".to_string()))?;
    let email = form
        .field("email")
        .ok_or_else(|| ApiError::BadRequest("Business name and email are required".to_string()))?;

    let repo = BusinessRepository::new(state.db.clone());

    // One business per contact email per owner
    if repo.exists_for_owner_email(user.user_id, &email).await? {
        return Err(ApiError::Conflict {
            message: "A business with this email already exists".to_string(),
        });
    }

    let data = CreateBusinessData {
        name,
        email,
        description: form.field("description"),
        address: form.field("address"),
        phone: form.field("phone"),
    };

    let business = repo.create(user.user_id, &data, form.image_url).await?;
    info!("User {} created business {}", user.user_id, business.id);

    Ok((StatusCode::CREATED, Json(business)))
}

/// Handler for PUT /api/businesses/update-self
/// The email field doubles as the ownership key alongside the identity
pub async fn update_own_business_handler(
    State(state): State<AppState>,
    BusinessAccess(user): BusinessAccess,
    multipart: Multipart,
) -> Result<Json<crate::businesses::models::Business>, ApiError> {
    let form = state.uploads.read_form(multipart).await?;

    let email = form
        .field("email")
        .ok_or_else(|| ApiError::BadRequest("Email is required".to_string()))?;

    let repo = BusinessRepository::new(state.db.clone());

    // Missing and not-owned are reported identically
    let existing = repo
        .find_by_owner_and_email(user.user_id, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Business".to_string(),
            id: email.clone(),
        })?;

    let patch = UpdateBusinessData {
        name: form.field("name"),
        description: form.field("description"),
        address: form.field("address"),
        phone: form.field("phone"),
    };

    let business = repo.update(&existing, &patch, form.image_url).await?;
    info!("User {} updated business {}", user.user_id, business.id);

    Ok(Json(business))
}

/// Handler for DELETE /api/businesses/delete-self
pub async fn delete_own_business_handler(
    State(state): State<AppState>,
    BusinessAccess(user): BusinessAccess,
    Json(request): Json<DeleteBusinessRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.email.trim().is_empty() {
        return Err(ApiError::BadRequest("Email is required".to_string()));
    }

    let repo = BusinessRepository::new(state.db.clone());

    let existing = repo
        .find_by_owner_and_email(user.user_id, &request.email)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Business".to_string(),
            id: request.email.clone(),
        })?;

    repo.delete(existing.id).await?;
    info!("User {} deleted business {}", user.user_id, existing.id);

    Ok(Json(json!({ "message": "Business deleted" })))
}

/// Handler for GET /api/businesses
/// The caller's own businesses
pub async fn list_own_businesses_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<OwnBusinessListResponse>, ApiError> {
    let businesses = BusinessRepository::new(state.db.clone())
        .list_by_owner(user.user_id)
        .await?;

    Ok(Json(OwnBusinessListResponse { businesses }))
}

/// Handler for GET /api/businesses/all
/// Public, paginated listing with a fixed projection
#[utoipa::path(
    get,
    path = "/api/businesses/all",
    params(
        ("page" = Option<i64>, Query, description = "1-indexed page, defaults to 1"),
        ("limit" = Option<i64>, Query, description = "Page size, defaults to 20, max 100")
    ),
    responses(
        (status = 200, description = "Businesses", body = BusinessListResponse),
        (status = 400, description = "Invalid pagination parameters")
    ),
    tag = "businesses"
)]
pub async fn list_all_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<BusinessListResponse>, ApiError> {
    let (page, limit) = query.resolve().map_err(ApiError::BadRequest)?;

    let businesses = BusinessRepository::new(state.db.clone())
        .list_public(page, limit)
        .await?;

    tracing::debug!("Public business listing returned {} rows", businesses.len());
    Ok(Json(BusinessListResponse { businesses }))
}

/// Handler for GET /api/businesses/:business_id/products
/// Public; an unknown business id yields an empty list
#[utoipa::path(
    get,
    path = "/api/businesses/{business_id}/products",
    params(
        ("business_id" = i32, Path, description = "Business ID")
    ),
    responses(
        (status = 200, description = "Products of the business", body = BusinessProductsResponse)
    ),
    tag = "businesses"
)]
pub async fn list_business_products_handler(
    State(state): State<AppState>,
    Path(business_id): Path<i32>,
) -> Result<Json<BusinessProductsResponse>, ApiError> {
    let products = BusinessRepository::new(state.db.clone())
        .list_products(business_id)
        .await?;

    Ok(Json(BusinessProductsResponse { products }))
}
