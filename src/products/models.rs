// Product data models and DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::validation;

/// Product database model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Product {
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
}

/// A product joined with the minimal projection of its selling business,
/// as returned by the public listing
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ProductWithBusiness {
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
    pub business_address: Option<String>,
    pub business_phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductListResponse {
    pub products: Vec<ProductWithBusiness>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadImageResponse {
    pub image_url: String,
}

/// Query parameters for the public product listing
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    /// Case-insensitive substring match on category
    pub category: Option<String>,
    /// Case-insensitive substring match on name OR category
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Validated fields for product creation, parsed from a multipart form
#[derive(Debug, Clone)]
pub struct CreateProductData {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discounted_price: Option<Decimal>,
    pub quantity: i32,
    pub category: String,
    pub expiration_date: NaiveDate,
}

impl CreateProductData {
    /// Build from multipart text fields. All of name, price, quantity,
    /// category and expiration_date are required.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, String> {
        let name = required(fields, "name")?;
        let price = parse_decimal("price", &required(fields, "price")?)?;
        let quantity = parse_quantity(&required(fields, "quantity")?)?;
        let category = required(fields, "category")?;
        let expiration_date = parse_date(&required(fields, "expiration_date")?)?;

        let discounted_price = match optional(fields, "discounted_price") {
            Some(raw) => Some(parse_decimal("discounted_price", &raw)?),
            None => None,
        };

        let data = Self {
            name,
            description: optional(fields, "description"),
            price,
            discounted_price,
            quantity,
            category,
            expiration_date,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), String> {
        validation::bounded_text("name", &self.name, 100)?;
        validation::bounded_text("category", &self.category, 50)?;
        validation::positive_price("price", self.price)?;
        if let Some(d) = self.discounted_price {
            validation::positive_price("discounted_price", d)?;
        }
        validation::non_negative_quantity(self.quantity)?;
        validation::discount_below_price(self.price, self.discounted_price)?;
        Ok(())
    }
}

/// Partial update for a product, parsed from a multipart form.
/// The discount-below-price rule is checked against the merged state in the
/// service, since either side may be absent here.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductData {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub category: Option<String>,
    pub expiration_date: Option<NaiveDate>,
}

impl UpdateProductData {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, String> {
        let price = match optional(fields, "price") {
            Some(raw) => Some(parse_decimal("price", &raw)?),
            None => None,
        };
        let discounted_price = match optional(fields, "discounted_price") {
            Some(raw) => Some(parse_decimal("discounted_price", &raw)?),
            None => None,
        };
        let quantity = match optional(fields, "quantity") {
            Some(raw) => Some(parse_quantity(&raw)?),
            None => None,
        };
        let expiration_date = match optional(fields, "expiration_date") {
            Some(raw) => Some(parse_date(&raw)?),
            None => None,
        };

        let data = Self {
            name: optional(fields, "name"),
            description: optional(fields, "description"),
            price,
            discounted_price,
            quantity,
            category: optional(fields, "category"),
            expiration_date,
        };
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validation::bounded_text("name", name, 100)?;
        }
        if let Some(category) = &self.category {
            validation::bounded_text("category", category, 50)?;
        }
        if let Some(price) = self.price {
            validation::positive_price("price", price)?;
        }
        if let Some(d) = self.discounted_price {
            validation::positive_price("discounted_price", d)?;
        }
        if let Some(quantity) = self.quantity {
            validation::non_negative_quantity(quantity)?;
        }
        Ok(())
    }
}

fn required(fields: &HashMap<String, String>, name: &str) -> Result<String, String> {
    optional(fields, name).ok_or_else(|| {
        "name, price, quantity, category and expiration_date are required".to_string()
    })
}

fn optional(fields: &HashMap<String, String>, name: &str) -> Option<String> {
    fields
        .get(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(raw).map_err(|_| format!("{} must be a valid number", field))
}

fn parse_quantity(raw: &str) -> Result<i32, String> {
    raw.parse::<i32>()
        .map_err(|_| "quantity must be a whole number".to_string())
}

/// Accepts a plain date or a full RFC 3339 timestamp
fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| "expiration_date must be a valid date".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn base_fields() -> HashMap<String, String> {
        let mut fields = HashMap::new();
        fields.insert("name".to_string(), "Bread".to_string());
        fields.insert("price".to_string(), "10".to_string());
        fields.insert("quantity".to_string(), "5".to_string());
        fields.insert("category".to_string(), "Bakery".to_string());
        fields.insert("expiration_date".to_string(), "2025-01-01".to_string());
        fields
    }

    #[test]
    fn test_create_from_complete_fields() {
        let data = CreateProductData::from_fields(&base_fields()).unwrap();
        assert_eq!(data.name, "Bread");
        assert_eq!(data.price, dec!(10));
        assert_eq!(data.quantity, 5);
        assert_eq!(data.category, "Bakery");
        assert_eq!(
            data.expiration_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert!(data.discounted_price.is_none());
    }

    #[test]
    fn test_create_missing_required_field() {
        for missing in ["name", "price", "quantity", "category", "expiration_date"] {
            let mut fields = base_fields();
            fields.remove(missing);
            assert!(
                CreateProductData::from_fields(&fields).is_err(),
                "expected failure without {}",
                missing
            );
        }
    }

    #[test]
    fn test_create_rejects_non_positive_price() {
        let mut fields = base_fields();
        fields.insert("price".to_string(), "0".to_string());
        assert!(CreateProductData::from_fields(&fields).is_err());

        fields.insert("price".to_string(), "-3".to_string());
        assert!(CreateProductData::from_fields(&fields).is_err());
    }

    #[test]
    fn test_create_rejects_negative_quantity() {
        let mut fields = base_fields();
        fields.insert("quantity".to_string(), "-1".to_string());
        assert!(CreateProductData::from_fields(&fields).is_err());
    }

    #[test]
    fn test_create_accepts_valid_discount() {
        let mut fields = base_fields();
        fields.insert("discounted_price".to_string(), "7.50".to_string());
        let data = CreateProductData::from_fields(&fields).unwrap();
        assert_eq!(data.discounted_price, Some(dec!(7.50)));
    }

    #[test]
    fn test_create_rejects_discount_at_or_above_price() {
        let mut fields = base_fields();
        fields.insert("discounted_price".to_string(), "10".to_string());
        assert!(CreateProductData::from_fields(&fields).is_err());

        fields.insert("discounted_price".to_string(), "12".to_string());
        assert!(CreateProductData::from_fields(&fields).is_err());
    }

    #[test]
    fn test_create_accepts_rfc3339_expiration() {
        let mut fields = base_fields();
        fields.insert(
            "expiration_date".to_string(),
            "2025-06-15T00:00:00Z".to_string(),
        );
        let data = CreateProductData::from_fields(&fields).unwrap();
        assert_eq!(
            data.expiration_date,
            NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
        );
    }

    #[test]
    fn test_update_all_fields_optional() {
        let fields = HashMap::new();
        let data = UpdateProductData::from_fields(&fields).unwrap();
        assert!(data.name.is_none());
        assert!(data.price.is_none());
    }

    #[test]
    fn test_update_rejects_bad_values() {
        let mut fields = HashMap::new();
        fields.insert("price".to_string(), "free".to_string());
        assert!(UpdateProductData::from_fields(&fields).is_err());

        let mut fields = HashMap::new();
        fields.insert("quantity".to_string(), "-2".to_string());
        assert!(UpdateProductData::from_fields(&fields).is_err());
    }
}
