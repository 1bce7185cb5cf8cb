// Database access for businesses

use sqlx::PgPool;

use crate::businesses::models::{
    Business, BusinessProductRow, BusinessSummary, CreateBusinessData, UpdateBusinessData,
};
use crate::error::ApiError;
use crate::pagination::PageQuery;

const BUSINESS_COLUMNS: &str =
    "id, name, description, address, phone, email, user_id, image_url, created_at, updated_at";

/// Repository for business operations
#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new business owned by the given user
    pub async fn create(
        &self,
        owner_id: i32,
        data: &CreateBusinessData,
        image_url: Option<String>,
    ) -> Result<Business, ApiError> {
        let query = format!(
            "INSERT INTO businesses (name, description, address, phone, email, user_id, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            BUSINESS_COLUMNS
        );

        sqlx::query_as::<_, Business>(&query)
            .bind(&data.name)
            .bind(&data.description)
            .bind(&data.address)
            .bind(&data.phone)
            .bind(&data.email)
            .bind(owner_id)
            .bind(image_url)
            .fetch_one(&self.pool)
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
            })
    }

    /// Check whether the owner already registered a business under this email
    pub async fn exists_for_owner_email(
        &self,
        owner_id: i32,
        email: &str,
    ) -> Result<bool, ApiError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM businesses WHERE user_id = $1 AND email = $2)",
        )
        .bind(owner_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Owner-scoped lookup: the business must match both the owner id and
    /// the email supplied in the request
    pub async fn find_by_owner_and_email(
        &self,
        owner_id: i32,
        email: &str,
    ) -> Result<Option<Business>, ApiError> {
        let query = format!(
            "SELECT {} FROM businesses WHERE user_id = $1 AND email = $2",
            BUSINESS_COLUMNS
        );

        let business = sqlx::query_as::<_, Business>(&query)
            .bind(owner_id)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(business)
    }

    /// First business owned by the user, for the profile payload
    pub async fn find_first_by_owner(&self, owner_id: i32) -> Result<Option<Business>, ApiError> {
        let query = format!(
            "SELECT {} FROM businesses WHERE user_id = $1 ORDER BY id LIMIT 1",
            BUSINESS_COLUMNS
        );

        let business = sqlx::query_as::<_, Business>(&query)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(business)
    }

    /// All businesses owned by the user
    pub async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Business>, ApiError> {
        let query = format!(
            "SELECT {} FROM businesses WHERE user_id = $1 ORDER BY id",
            BUSINESS_COLUMNS
        );

        let businesses = sqlx::query_as::<_, Business>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(businesses)
    }

    /// Public listing, bounded by pagination
    pub async fn list_public(&self, page: i64, limit: i64) -> Result<Vec<BusinessSummary>, ApiError> {
        let summaries = sqlx::query_as::<_, BusinessSummary>(
            "SELECT id, name, description, address, phone, email, image_url \
             FROM businesses ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(PageQuery::offset(page, limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    /// Public product listing for one business. A nonexistent business id
    /// simply yields an empty list.
    pub async fn list_products(&self, business_id: i32) -> Result<Vec<BusinessProductRow>, ApiError> {
        let products = sqlx::query_as::<_, BusinessProductRow>(
            "SELECT id, name, description, price, discounted_price, quantity, category, \
             expiration_date, image_url FROM products WHERE business_id = $1 ORDER BY id",
        )
        .bind(business_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Apply a partial update, keeping existing values for omitted fields
    pub async fn update(
        &self,
        existing: &Business,
        patch: &UpdateBusinessData,
        image_url: Option<String>,
    ) -> Result<Business, ApiError> {
        let query = format!(
            "UPDATE businesses SET name = $1, description = $2, address = $3, phone = $4, \
             image_url = $5, updated_at = NOW() WHERE id = $6 RETURNING {}",
            BUSINESS_COLUMNS
        );

        let business = sqlx::query_as::<_, Business>(&query)
            .bind(patch.name.clone().unwrap_or_else(|| existing.name.clone()))
            .bind(patch.description.clone().or_else(|| existing.description.clone()))
            .bind(patch.address.clone().or_else(|| existing.address.clone()))
            .bind(patch.phone.clone().or_else(|| existing.phone.clone()))
            .bind(image_url.or_else(|| existing.image_url.clone()))
            .bind(existing.id)
            .fetch_one(&self.pool)
            .await?;

        Ok(business)
    }

    /// Hard-delete a business; its products cascade in the schema
    pub async fn delete(&self, id: i32) -> Result<u64, ApiError> {
        let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
