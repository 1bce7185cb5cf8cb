// HTTP handlers for the admin back office
// Gated by AdminAccess; no ownership filters apply here

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::json;
use tracing::info;

use crate::admin::models::{
    AdminBusinessListResponse, AdminBusinessUpdate, AdminProductListResponse, AdminProductUpdate,
    AdminUserRow, BusinessWithOwner, ProductAdminRow, UpdateRoleRequest, UserListResponse,
};
use crate::auth::middleware::AdminAccess;
use crate::auth::models::Role;
use crate::businesses::models::Business;
use crate::error::ApiError;
use crate::pagination::PageQuery;
use crate::products::models::Product;
use crate::AppState;

const ADMIN_USER_COLUMNS: &str =
    "id, full_name, email, user_type, status, created_at, updated_at";

/// Handler for GET /api/admin/users
/// Paginated, newest first, password column never selected
pub async fn list_users_handler(
    State(state): State<AppState>,
    AdminAccess(_admin): AdminAccess,
    Query(query): Query<PageQuery>,
) -> Result<Json<UserListResponse>, ApiError> {
    let (page, limit) = query.resolve().map_err(ApiError::BadRequest)?;

    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.db)
        .await?;

    let users_query = format!(
        "SELECT {} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        ADMIN_USER_COLUMNS
    );
    let users = sqlx::query_as::<_, AdminUserRow>(&users_query)
        .bind(limit)
        .bind(PageQuery::offset(page, limit))
        .fetch_all(&state.db)
        .await?;

    Ok(Json(UserListResponse {
        total_users,
        total_pages: (total_users + limit - 1) / limit,
        current_page: page,
        users,
    }))
}

/// Handler for PUT /api/admin/users/:id/role
/// Admins may never change their own role
pub async fn update_user_role_handler(
    State(state): State<AppState>,
    AdminAccess(admin): AdminAccess,
    Path(id): Path<i32>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<AdminUserRow>, ApiError> {
    let role = Role::from_str(&request.role)
        .map_err(|_| ApiError::BadRequest("Invalid user type".to_string()))?;

    if admin.user_id == id {
        return Err(ApiError::BadRequest(
            "You cannot change your own role".to_string(),
        ));
    }

    let query = format!(
        "UPDATE users SET user_type = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
        ADMIN_USER_COLUMNS
    );
    let user = sqlx::query_as::<_, AdminUserRow>(&query)
        .bind(role)
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "User".to_string(),
            id: id.to_string(),
        })?;

    info!("Admin {} set role of user {} to {}", admin.user_id, id, role);
    Ok(Json(user))
}

/// Handler for DELETE /api/admin/users/:id
/// Admins may never delete their own account here
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AdminAccess(admin): AdminAccess,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if admin.user_id == id {
        return Err(ApiError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "User".to_string(),
            id: id.to_string(),
        });
    }

    info!("Admin {} deleted user {}", admin.user_id, id);
    Ok(Json(json!({ "message": "User deleted" })))
}

/// Handler for GET /api/admin/businesses
pub async fn list_businesses_handler(
    State(state): State<AppState>,
    AdminAccess(_admin): AdminAccess,
    Query(query): Query<PageQuery>,
) -> Result<Json<AdminBusinessListResponse>, ApiError> {
    let (page, limit) = query.resolve().map_err(ApiError::BadRequest)?;

    let businesses = sqlx::query_as::<_, BusinessWithOwner>(
        "SELECT b.id, b.name, b.description, b.address, b.phone, b.email, b.user_id, \
         b.image_url, b.created_at, b.updated_at, \
         u.full_name AS owner_name, u.email AS owner_email \
         FROM businesses b JOIN users u ON u.id = b.user_id \
         ORDER BY b.created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(PageQuery::offset(page, limit))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(AdminBusinessListResponse { businesses }))
}

/// Handler for PUT /api/admin/businesses/:id
/// Any business may be targeted by id
pub async fn update_business_handler(
    State(state): State<AppState>,
    AdminAccess(admin): AdminAccess,
    Path(id): Path<i32>,
    Json(patch): Json<AdminBusinessUpdate>,
) -> Result<Json<Business>, ApiError> {
    let existing = sqlx::query_as::<_, Business>(
        "SELECT id, name, description, address, phone, email, user_id, image_url, \
         created_at, updated_at FROM businesses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Business".to_string(),
        id: id.to_string(),
    })?;

    let business = sqlx::query_as::<_, Business>(
        "UPDATE businesses SET name = $1, description = $2, address = $3, phone = $4, \
         email = $5, updated_at = NOW() WHERE id = $6 \
         RETURNING id, name, description, address, phone, email, user_id, image_url, \
         created_at, updated_at",
    )
    .bind(patch.name.unwrap_or(existing.name))
    .bind(patch.description.or(existing.description))
    .bind(patch.address.or(existing.address))
    .bind(patch.phone.or(existing.phone))
    .bind(patch.email.unwrap_or(existing.email))
    .bind(id)
    .fetch_one(&state.db)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ApiError::Conflict {
                    message: "A business with this email already exists".to_string(),
                };
            }
        }
        ApiError::DatabaseError(e)
    })?;

    info!("Admin {} updated business {}", admin.user_id, id);
    Ok(Json(business))
}

/// Handler for DELETE /api/admin/businesses/:id
pub async fn delete_business_handler(
    State(state): State<AppState>,
    AdminAccess(admin): AdminAccess,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Business".to_string(),
            id: id.to_string(),
        });
    }

    info!("Admin {} deleted business {}", admin.user_id, id);
    Ok(Json(json!({ "message": "Business deleted" })))
}

/// Handler for GET /api/admin/products
pub async fn list_products_handler(
    State(state): State<AppState>,
    AdminAccess(_admin): AdminAccess,
    Query(query): Query<PageQuery>,
) -> Result<Json<AdminProductListResponse>, ApiError> {
    let (page, limit) = query.resolve().map_err(ApiError::BadRequest)?;

    let products = sqlx::query_as::<_, ProductAdminRow>(
        "SELECT p.id, p.name, p.description, p.price, p.discounted_price, p.quantity, \
         p.category, p.expiration_date, p.business_id, p.image_url, p.created_at, \
         p.updated_at, b.name AS business_name \
         FROM products p JOIN businesses b ON b.id = p.business_id \
         ORDER BY p.created_at DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(PageQuery::offset(page, limit))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(AdminProductListResponse { products }))
}

/// Handler for PUT /api/admin/products/:id
pub async fn update_product_handler(
    State(state): State<AppState>,
    AdminAccess(admin): AdminAccess,
    Path(id): Path<i32>,
    Json(patch): Json<AdminProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    let existing = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price, discounted_price, quantity, category, \
         expiration_date, business_id, image_url, created_at, updated_at \
         FROM products WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Product".to_string(),
        id: id.to_string(),
    })?;

    // The discount rule holds on the merged state for admins too
    let price = patch.price.unwrap_or(existing.price);
    let discounted = patch.discounted_price.or(existing.discounted_price);
    crate::validation::discount_below_price(price, discounted).map_err(ApiError::BadRequest)?;

    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET name = $1, description = $2, price = $3, discounted_price = $4, \
         quantity = $5, category = $6, expiration_date = $7, updated_at = NOW() \
         WHERE id = $8 \
         RETURNING id, name, description, price, discounted_price, quantity, category, \
         expiration_date, business_id, image_url, created_at, updated_at",
    )
    .bind(patch.name.unwrap_or(existing.name))
    .bind(patch.description.or(existing.description))
    .bind(price)
    .bind(discounted)
    .bind(patch.quantity.unwrap_or(existing.quantity))
    .bind(patch.category.unwrap_or(existing.category))
    .bind(patch.expiration_date.unwrap_or(existing.expiration_date))
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    info!("Admin {} updated product {}", admin.user_id, id);
    Ok(Json(product))
}

/// Handler for DELETE /api/admin/products/:id
pub async fn delete_product_handler(
    State(state): State<AppState>,
    AdminAccess(admin): AdminAccess,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Product".to_string(),
            id: id.to_string(),
        });
    }

    info!("Admin {} deleted product {}", admin.user_id, id);
    Ok(Json(json!({ "message": "Product deleted" })))
}
