//! Shared HTTP building blocks: response envelope, pagination, error mapping

mod error;
mod identity;
mod validated_json;

pub use error::{domain_error, ApiError, ApiResult};
pub use identity::{CurrentCustomer, MaybeCustomer, CUSTOMER_ID_HEADER};
pub use validated_json::{BodyRejection, ValidatedJson};

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::types::{PaginatedResult, PaginationParams};

/// Standard API response envelope
///
/// Every REST endpoint answers with this wrapper.
/// On success: `{"success": true, "data": {...}}`,
/// on failure: `{"success": false, "data": null, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload. `null` on error
    pub data: Option<T>,
    /// Error description. Omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Pagination query parameters for list endpoints
#[derive(Debug, Default, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1. Default: 1
    pub page: Option<u32>,
    /// Items per page. Default and upper bound come from the `[booking]` config
    pub limit: Option<u32>,
}

impl From<PageQuery> for PaginationParams {
    fn from(q: PageQuery) -> Self {
        // A zero limit is replaced by the configured default downstream
        PaginationParams::new(q.page.unwrap_or(1), q.limit.unwrap_or(0))
    }
}

/// One page of a list together with its position metadata
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T> {
    /// Items on the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Total number of pages
    pub total_pages: u32,
}

impl<T> From<PaginatedResult<T>> for PaginatedResponse<T> {
    fn from(r: PaginatedResult<T>) -> Self {
        Self {
            items: r.items,
            total: r.total,
            page: r.page,
            limit: r.limit,
            total_pages: r.total_pages,
        }
    }
}
