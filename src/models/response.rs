use serde::{Deserialize, Serialize};

/// Envelope for every successful API response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            count: None,
            pagination: None,
            data,
        }
    }

    pub fn counted(data: T, count: usize) -> Self {
        Self {
            success: true,
            count: Some(count),
            pagination: None,
            data,
        }
    }

    pub fn page(data: T, count: usize, pagination: Pagination) -> Self {
        Self {
            success: true,
            count: Some(count),
            pagination: Some(pagination),
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub page: i64,
    pub limit: i64,
}

/// Hints for the page before and after the current window. A side is absent
/// when no further page exists in that direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageRef>,
}

pub fn paginate(page: i64, limit: i64, total: i64) -> Pagination {
    let start_index = (page - 1) * limit;
    let end_index = page * limit;

    Pagination {
        next: (end_index < total).then_some(PageRef {
            page: page + 1,
            limit,
        }),
        prev: (start_index > 0).then_some(PageRef {
            page: page - 1,
            limit,
        }),
    }
}
