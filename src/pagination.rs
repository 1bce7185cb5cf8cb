// Pagination parameters shared by the listing endpoints
// Every list endpoint is bounded; "return everything" is not supported.

use serde::Deserialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Page/limit query parameters, both optional
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    /// Resolve to a concrete (page, limit) pair, applying defaults and the
    /// upper bound on page size.
    pub fn resolve(self) -> Result<(i64, i64), String> {
        let page = self.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err("page must be a positive number".to_string());
        }

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit < 1 {
            return Err("limit must be a positive number".to_string());
        }
        if limit > MAX_LIMIT {
            return Err(format!("limit cannot exceed {}", MAX_LIMIT));
        }

        Ok((page, limit))
    }

    /// Row offset for a 1-indexed page
    pub fn offset(page: i64, limit: i64) -> i64 {
        (page - 1) * limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let (page, limit) = PageQuery::default().resolve().unwrap();
        assert_eq!(page, DEFAULT_PAGE);
        assert_eq!(limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_explicit_values() {
        let query = PageQuery {
            page: Some(3),
            limit: Some(50),
        };
        assert_eq!(query.resolve().unwrap(), (3, 50));
    }

    #[test]
    fn test_zero_page_rejected() {
        let query = PageQuery {
            page: Some(0),
            limit: None,
        };
        assert!(query.resolve().is_err());
    }

    #[test]
    fn test_zero_limit_rejected() {
        let query = PageQuery {
            page: None,
            limit: Some(0),
        };
        assert!(query.resolve().is_err());
    }

    #[test]
    fn test_limit_capped() {
        let query = PageQuery {
            page: None,
            limit: Some(MAX_LIMIT + 1),
        };
        assert!(query.resolve().is_err());
    }

    #[test]
    fn test_offset() {
        assert_eq!(PageQuery::offset(1, 20), 0);
        assert_eq!(PageQuery::offset(2, 20), 20);
        assert_eq!(PageQuery::offset(5, 10), 40);
    }
}
