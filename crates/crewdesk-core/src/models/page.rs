use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One page of a list endpoint's results.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Page {
            items,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        let page = Page::new(vec![1, 2, 3], 41, 1, 20);
        assert_eq!(page.total_pages, 3);
        let page = Page::new(vec![1], 40, 2, 20);
        assert_eq!(page.total_pages, 2);
        let page: Page<i32> = Page::new(vec![], 0, 1, 20);
        assert_eq!(page.total_pages, 0);
    }
}
