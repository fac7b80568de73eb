//! Customer identity extractors
//!
//! Authentication happens upstream; the gateway forwards the authenticated
//! customer id in `X-Customer-Id`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;

use super::{ApiError, ApiResponse};

pub const CUSTOMER_ID_HEADER: &str = "x-customer-id";

/// The authenticated customer. Rejects with 401 when the header is absent
/// or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentCustomer(pub i32);

/// Identity for endpoints that also serve anonymous visitors.
/// A malformed header is still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeCustomer(pub Option<i32>);

fn unauthorized(message: &str) -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error(message)),
    )
}

fn customer_id(parts: &Parts) -> Result<Option<i32>, ApiError> {
    let Some(value) = parts.headers.get(CUSTOMER_ID_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|id| *id > 0)
        .map(Some)
        .ok_or_else(|| unauthorized("Invalid X-Customer-Id header"))
}

impl<S> FromRequestParts<S> for CurrentCustomer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        customer_id(parts)?
            .map(CurrentCustomer)
            .ok_or_else(|| unauthorized("Missing X-Customer-Id header"))
    }
}

impl<S> FromRequestParts<S> for MaybeCustomer
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        customer_id(parts).map(MaybeCustomer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header(CUSTOMER_ID_HEADER, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn current_customer_reads_header() {
        let mut p = parts(Some("42"));
        let id = CurrentCustomer::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(id, CurrentCustomer(42));
    }

    #[tokio::test]
    async fn current_customer_requires_header() {
        let mut p = parts(None);
        let (status, _) = CurrentCustomer::from_request_parts(&mut p, &())
            .await
            .unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_header_is_rejected_even_when_optional() {
        for bad in ["abc", "0", "-3"] {
            let mut p = parts(Some(bad));
            let (status, _) = MaybeCustomer::from_request_parts(&mut p, &())
                .await
                .unwrap_err();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[tokio::test]
    async fn anonymous_visitor_is_allowed_when_optional() {
        let mut p = parts(None);
        let who = MaybeCustomer::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(who, MaybeCustomer(None));
    }
}
