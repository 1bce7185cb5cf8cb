// Product service - ownership checks and listing logic

use tracing::info;

use crate::auth::middleware::AuthenticatedUser;
use crate::pagination::PageQuery;
use crate::products::error::ProductError;
use crate::products::models::{
    CreateProductData, Product, ProductListQuery, ProductWithBusiness, UpdateProductData,
};
use crate::products::query::ProductQueryBuilder;
use crate::products::repository::ProductRepository;

/// Service for product operations. Every mutation re-derives ownership from
/// the authenticated identity; client-supplied owner ids are never trusted.
#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
}

impl ProductService {
    pub fn new(repo: ProductRepository) -> Self {
        Self { repo }
    }

    /// Create a product under the business owned by the caller.
    /// A caller without a business cannot hold products.
    pub async fn create_product(
        &self,
        identity: &AuthenticatedUser,
        data: CreateProductData,
        image_url: Option<String>,
    ) -> Result<Product, ProductError> {
        let business_id = self
            .repo
            .find_owner_business(identity.user_id)
            .await?
            .ok_or(ProductError::BusinessNotFound)?;

        let product = self.repo.insert(business_id, &data, image_url).await?;
        info!(
            "User {} created product {} under business {}",
            identity.user_id, product.id, business_id
        );

        Ok(product)
    }

    /// Public listing with optional category/search filters, paginated
    pub async fn list_products(
        &self,
        query: ProductListQuery,
    ) -> Result<Vec<ProductWithBusiness>, ProductError> {
        let (page, limit) = PageQuery {
            page: query.page,
            limit: query.limit,
        }
        .resolve()
        .map_err(ProductError::ValidationError)?;

        let mut builder = ProductQueryBuilder::new();
        if let Some(category) = normalize(query.category) {
            builder.add_category_filter(&category);
        }
        if let Some(search) = normalize(query.search) {
            builder.add_search_filter(&search);
        }
        builder.set_pagination(page, limit);

        self.repo.list(&builder).await
    }

    /// Public single-product lookup
    pub async fn get_product(&self, id: i32) -> Result<Product, ProductError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)
    }

    /// Update a product owned by the caller
    pub async fn update_product(
        &self,
        identity: &AuthenticatedUser,
        id: i32,
        patch: UpdateProductData,
        image_url: Option<String>,
    ) -> Result<Product, ProductError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)?;
        self.ensure_owner(identity, &existing).await?;

        // The discount rule holds on the merged state, whichever side the
        // patch supplies
        let price = patch.price.unwrap_or(existing.price);
        let discounted = patch.discounted_price.or(existing.discounted_price);
        crate::validation::discount_below_price(price, discounted)
            .map_err(ProductError::ValidationError)?;

        let product = self.repo.update(&existing, &patch, image_url).await?;
        info!("User {} updated product {}", identity.user_id, id);

        Ok(product)
    }

    /// Delete a product owned by the caller
    pub async fn delete_product(
        &self,
        identity: &AuthenticatedUser,
        id: i32,
    ) -> Result<(), ProductError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)?;
        self.ensure_owner(identity, &existing).await?;

        self.repo.delete(id).await?;
        info!("User {} deleted product {}", identity.user_id, id);

        Ok(())
    }

    /// Store a new image reference on a product owned by the caller.
    /// Ownership is enforced exactly as on update and delete.
    pub async fn set_product_image(
        &self,
        identity: &AuthenticatedUser,
        id: i32,
        image_url: Option<String>,
    ) -> Result<String, ProductError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ProductError::NotFound)?;
        self.ensure_owner(identity, &existing).await?;

        let image_url = image_url.ok_or_else(|| {
            ProductError::ValidationError("An image file is required".to_string())
        })?;

        self.repo.set_image(id, &image_url).await?;
        info!("User {} updated image of product {}", identity.user_id, id);

        Ok(image_url)
    }

    async fn ensure_owner(
        &self,
        identity: &AuthenticatedUser,
        product: &Product,
    ) -> Result<(), ProductError> {
        let owned = self
            .repo
            .is_business_owned_by(product.business_id, identity.user_id)
            .await?;

        if owned {
            Ok(())
        } else {
            Err(ProductError::Forbidden(
                "You do not have permission to modify this product".to_string(),
            ))
        }
    }
}

fn normalize(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_drops_empty() {
        assert_eq!(normalize(Some("  ekmek ".to_string())), Some("ekmek".to_string()));
        assert_eq!(normalize(Some("   ".to_string())), None);
        assert_eq!(normalize(None), None);
    }
}
