// SQL query builder for the public product listing
// Builds a single parameterized query joining each product with its business

use crate::pagination::{PageQuery, DEFAULT_LIMIT};

const LIST_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.discounted_price, \
     p.quantity, p.category, p.expiration_date, p.business_id, p.image_url, \
     p.created_at, p.updated_at, \
     b.name AS business_name, b.address AS business_address, b.phone AS business_phone";

/// Builds the filtered, paginated listing query. Filters compose with AND;
/// matching is case-insensitive via ILIKE.
pub struct ProductQueryBuilder {
    where_clauses: Vec<String>,
    params: Vec<String>,
    limit: i64,
    offset: i64,
}

impl ProductQueryBuilder {
    pub fn new() -> Self {
        Self {
            where_clauses: Vec::new(),
            params: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// Case-insensitive substring filter on category
    pub fn add_category_filter(&mut self, category: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses
            .push(format!("p.category ILIKE ${}", param_index));
        self.params.push(format!("%{}%", category));
    }

    /// Case-insensitive substring filter matching name OR category
    pub fn add_search_filter(&mut self, search: &str) {
        let name_index = self.params.len() + 1;
        let category_index = self.params.len() + 2;
        self.where_clauses.push(format!(
            "(p.name ILIKE ${} OR p.category ILIKE ${})",
            name_index, category_index
        ));
        let pattern = format!("%{}%", search);
        self.params.push(pattern.clone());
        self.params.push(pattern);
    }

    /// Sets pagination from a 1-indexed page and a page size
    pub fn set_pagination(&mut self, page: i64, limit: i64) {
        self.limit = limit;
        self.offset = PageQuery::offset(page, limit);
    }

    /// Builds the final SQL query string and its bind parameters.
    /// LIMIT and OFFSET are integers computed server-side and inlined.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut query = format!(
            "SELECT {} FROM products p JOIN businesses b ON b.id = p.business_id",
            LIST_COLUMNS
        );

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        query.push_str(" ORDER BY p.created_at DESC");
        query.push_str(&format!(" LIMIT {}", self.limit));
        query.push_str(&format!(" OFFSET {}", self.offset));

        (query, self.params.clone())
    }
}

impl Default for ProductQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_query() {
        let builder = ProductQueryBuilder::new();
        let (query, params) = builder.build();

        assert!(query.contains("FROM products p JOIN businesses b"));
        assert!(query.contains("ORDER BY p.created_at DESC"));
        assert!(query.contains("LIMIT"));
        assert!(query.contains("OFFSET"));
        assert!(!query.contains("WHERE"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_category_filter() {
        let mut builder = ProductQueryBuilder::new();
        builder.add_category_filter("ekmek");
        let (query, params) = builder.build();

        assert!(query.contains("WHERE"));
        assert!(query.contains("p.category ILIKE $1"));
        assert_eq!(params, vec!["%ekmek%"]);
    }

    #[test]
    fn test_search_filter_matches_name_or_category() {
        let mut builder = ProductQueryBuilder::new();
        builder.add_search_filter("ekmek");
        let (query, params) = builder.build();

        assert!(query.contains("(p.name ILIKE $1 OR p.category ILIKE $2)"));
        assert_eq!(params, vec!["%ekmek%", "%ekmek%"]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let mut builder = ProductQueryBuilder::new();
        builder.add_category_filter("bakery");
        builder.add_search_filter("bread");
        let (query, params) = builder.build();

        assert!(query.contains("p.category ILIKE $1 AND (p.name ILIKE $2 OR p.category ILIKE $3)"));
        assert_eq!(params, vec!["%bakery%", "%bread%", "%bread%"]);
    }

    #[test]
    fn test_pagination() {
        let mut builder = ProductQueryBuilder::new();
        builder.set_pagination(3, 25);
        let (query, _) = builder.build();

        assert!(query.contains("LIMIT 25"));
        assert!(query.contains("OFFSET 50"));
    }
}
