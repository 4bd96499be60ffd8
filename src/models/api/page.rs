use serde::Serialize;

/// One page of an owner-scoped listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, limit: u32, total: i64) -> Self {
        let limit_i64 = i64::from(limit.max(1));
        Self {
            items,
            page,
            limit,
            total,
            pages: (total + limit_i64 - 1) / limit_i64,
        }
    }
}

/// Normalised `(limit, offset)` for a 1-based page number
pub(crate) fn limit_offset(page: u32, limit: u32) -> (i64, i64) {
    let limit = i64::from(limit.max(1));
    let page = i64::from(page.max(1));
    (limit, (page - 1) * limit)
}
