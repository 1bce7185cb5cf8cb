// Business data models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Business database model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Business {
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
}

/// Public projection served by the unauthenticated listing
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BusinessSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: String,
    pub image_url: Option<String>,
}

/// Fields accepted when creating a business. The owner comes from the
/// authenticated identity, never from the request.
#[derive(Debug, Clone)]
pub struct CreateBusinessData {
    pub name: String,
    pub email: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Partial update for the owner-scoped endpoint. The business email is the
/// lookup key there and is not updatable through it.
#[derive(Debug, Clone, Default)]
pub struct UpdateBusinessData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Body of the owner-scoped delete request
#[derive(Debug, Deserialize)]
pub struct DeleteBusinessRequest {
    pub email: String,
}

/// Product projection for a business's public product listing
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BusinessProductRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub quantity: i32,
    pub category: String,
    pub expiration_date: NaiveDate,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BusinessListResponse {
    pub businesses: Vec<BusinessSummary>,
}

#[derive(Debug, Serialize)]
pub struct OwnBusinessListResponse {
    pub businesses: Vec<Business>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BusinessProductsResponse {
    pub products: Vec<BusinessProductRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_projection_has_no_owner() {
        let summary = BusinessSummary {
            id: 1,
            name: "Ada Bakery".to_string(),
            description: None,
            address: Some("1 Main St".to_string()),
            phone: None,
            email: "ada@x.com".to_string(),
            image_url: None,
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"name\":\"Ada Bakery\""));
        assert!(!json.contains("user_id"));
    }

    #[test]
    fn test_delete_request_deserialization() {
        let request: DeleteBusinessRequest =
            serde_json::from_str(r#"{"email":"ada@x.com"}"#).unwrap();
        assert_eq!(request.email, "ada@x.com");
    }
}
