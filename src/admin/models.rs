// Admin back-office DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::models::{Role, UserStatus};

/// User row for the admin listing; the password column is never selected
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminUserRow {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    #[sqlx(rename = "user_type")]
    #[serde(rename = "user_type")]
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub total_users: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub users: Vec<AdminUserRow>,
}

/// Role change request; the raw string is validated against the role set
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    #[serde(rename = "user_type")]
    pub role: String,
}

/// Business joined with its owner for the admin listing
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BusinessWithOwner {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub user_id: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
}

#[derive(Debug, Serialize)]
pub struct AdminBusinessListResponse {
    pub businesses: Vec<BusinessWithOwner>,
}

/// Unrestricted partial update for any business. Ownership is immutable;
/// there is deliberately no user_id field here.
#[derive(Debug, Deserialize, Default)]
pub struct AdminBusinessUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Product joined with its business name for the admin listing
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductAdminRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub quantity: i32,
    pub category: String,
    pub expiration_date: NaiveDate,
    pub business_id: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub business_name: String,
}

#[derive(Debug, Serialize)]
pub struct AdminProductListResponse {
    pub products: Vec<ProductAdminRow>,
}

/// Unrestricted partial update for any product
#[derive(Debug, Deserialize, Default)]
pub struct AdminProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub category: Option<String>,
    pub expiration_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_role_request_wire_name() {
        let request: UpdateRoleRequest =
            serde_json::from_str(r#"{"user_type":"business"}"#).unwrap();
        assert_eq!(request.role, "business");
    }

    #[test]
    fn test_admin_business_update_ignores_owner_field() {
        // A client-supplied owner id must not be deserialized into anything
        let patch: AdminBusinessUpdate =
            serde_json::from_str(r#"{"name":"New Name","user_id":99}"#).unwrap();
        assert_eq!(patch.name.as_deref(), Some("New Name"));
    }
}
