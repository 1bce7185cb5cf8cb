// Database access for products

use sqlx::PgPool;

use crate::products::error::ProductError;
use crate::products::models::{CreateProductData, Product, ProductWithBusiness, UpdateProductData};
use crate::products::query::ProductQueryBuilder;

const PRODUCT_COLUMNS: &str = "id, name, description, price, discounted_price, quantity, \
     category, expiration_date, business_id, image_url, created_at, updated_at";

/// Repository for product operations
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new product under the given business
    pub async fn insert(
        &self,
        business_id: i32,
        data: &CreateProductData,
        image_url: Option<String>,
    ) -> Result<Product, ProductError> {
        let query = format!(
            "INSERT INTO products (name, description, price, discounted_price, quantity, \
             category, expiration_date, business_id, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {}",
            PRODUCT_COLUMNS
        );

        let product = sqlx::query_as::<_, Product>(&query)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.price)
            .bind(data.discounted_price)
            .bind(data.quantity)
            .bind(&data.category)
            .bind(data.expiration_date)
            .bind(business_id)
            .bind(image_url)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    /// Find a product by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Product>, ProductError> {
        let query = format!("SELECT {} FROM products WHERE id = $1", PRODUCT_COLUMNS);

        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Run the filtered public listing built by ProductQueryBuilder
    pub async fn list(
        &self,
        builder: &ProductQueryBuilder,
    ) -> Result<Vec<ProductWithBusiness>, ProductError> {
        let (query_str, params) = builder.build();

        let mut query = sqlx::query_as::<_, ProductWithBusiness>(&query_str);
        for param in params {
            query = query.bind(param);
        }

        let products = query.fetch_all(&self.pool).await?;
        Ok(products)
    }

    /// ID of the business owned by the user, if any
    pub async fn find_owner_business(&self, user_id: i32) -> Result<Option<i32>, ProductError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT id FROM businesses WHERE user_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(id,)| id))
    }

    /// Whether the given business belongs to the given user
    pub async fn is_business_owned_by(
        &self,
        business_id: i32,
        user_id: i32,
    ) -> Result<bool, ProductError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM businesses WHERE id = $1 AND user_id = $2)",
        )
        .bind(business_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Apply a partial update, keeping existing values for omitted fields
    pub async fn update(
        &self,
        existing: &Product,
        patch: &UpdateProductData,
        image_url: Option<String>,
    ) -> Result<Product, ProductError> {
        let query = format!(
            "UPDATE products SET name = $1, description = $2, price = $3, \
             discounted_price = $4, quantity = $5, category = $6, expiration_date = $7, \
             image_url = $8, updated_at = NOW() WHERE id = $9 RETURNING {}",
            PRODUCT_COLUMNS
        );

        let product = sqlx::query_as::<_, Product>(&query)
            .bind(patch.name.clone().unwrap_or_else(|| existing.name.clone()))
            .bind(patch.description.clone().or_else(|| existing.description.clone()))
            .bind(patch.price.unwrap_or(existing.price))
            .bind(patch.discounted_price.or(existing.discounted_price))
            .bind(patch.quantity.unwrap_or(existing.quantity))
            .bind(patch.category.clone().unwrap_or_else(|| existing.category.clone()))
            .bind(patch.expiration_date.unwrap_or(existing.expiration_date))
            .bind(image_url.or_else(|| existing.image_url.clone()))
            .bind(existing.id)
            .fetch_one(&self.pool)
            .await?;

        Ok(product)
    }

    /// Replace only the stored image reference
    pub async fn set_image(&self, id: i32, image_url: &str) -> Result<(), ProductError> {
        sqlx::query("UPDATE products SET image_url = $1, updated_at = NOW() WHERE id = $2")
            .bind(image_url)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Hard-delete a product
    pub async fn delete(&self, id: i32) -> Result<u64, ProductError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
