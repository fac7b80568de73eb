//! Reservation handlers
//!
//! Every endpoint acts on the calling customer's own reservations.
//! Another customer's reservation is reported as not found.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{PayRequest, PendingCountResponse, UpdateCountRequest};
use crate::application::BookingServices;
use crate::domain::reservation::{Reservation, StatusUpdateOutcome};
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, CurrentCustomer, PageQuery,
    PaginatedResponse, ValidatedJson,
};

#[utoipa::path(
    get,
    path = "/api/v1/reservations/pending",
    tag = "Reservations",
    params(
        PageQuery,
        ("X-Customer-Id" = i32, Header, description = "Authenticated customer")
    ),
    responses(
        (status = 200, description = "Unpaid reservations, oldest first", body = ApiResponse<PaginatedResponse<Reservation>>),
        (status = 401, description = "Missing customer identity")
    )
)]
pub async fn list_pending(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Query(page): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<Reservation>> {
    let result = services
        .availability
        .list_pending(customer_id, page.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/pending/count",
    tag = "Reservations",
    params(("X-Customer-Id" = i32, Header, description = "Authenticated customer")),
    responses(
        (status = 200, description = "Number of unpaid reservations", body = ApiResponse<PendingCountResponse>),
        (status = 401, description = "Missing customer identity")
    )
)]
pub async fn count_pending(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> ApiResult<PendingCountResponse> {
    let count = services
        .availability
        .count_pending(customer_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PendingCountResponse { count })))
}

#[utoipa::path(
    get,
    path = "/api/v1/reservations/history",
    tag = "Reservations",
    params(
        PageQuery,
        ("X-Customer-Id" = i32, Header, description = "Authenticated customer")
    ),
    responses(
        (status = 200, description = "All reservations of the customer", body = ApiResponse<PaginatedResponse<Reservation>>),
        (status = 401, description = "Missing customer identity")
    )
)]
pub async fn history(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Query(page): Query<PageQuery>,
) -> ApiResult<PaginatedResponse<Reservation>> {
    let result = services
        .availability
        .history(customer_id, page.into())
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID"),
        ("X-Customer-Id" = i32, Header, description = "Authenticated customer")
    ),
    request_body = UpdateCountRequest,
    responses(
        (status = 200, description = "Reservation updated", body = ApiResponse<Reservation>),
        (status = 401, description = "Missing customer identity"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Departure is fully booked"),
        (status = 422, description = "Invalid count")
    )
)]
pub async fn update_count(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Path(id): Path<i32>,
    ValidatedJson(body): ValidatedJson<UpdateCountRequest>,
) -> ApiResult<Reservation> {
    let reservation = services
        .ledger
        .update_count(id, customer_id, body.count)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(reservation)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(
        ("id" = i32, Path, description = "Reservation ID"),
        ("X-Customer-Id" = i32, Header, description = "Authenticated customer")
    ),
    responses(
        (status = 204, description = "Reservation deleted"),
        (status = 401, description = "Missing customer identity"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn delete_reservation(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    services
        .ledger
        .delete(id, customer_id)
        .await
        .map_err(domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/reservations/pay",
    tag = "Reservations",
    params(("X-Customer-Id" = i32, Header, description = "Authenticated customer")),
    request_body = PayRequest,
    responses(
        (status = 200, description = "Which reservations were paid, already paid or not eligible", body = ApiResponse<StatusUpdateOutcome>),
        (status = 401, description = "Missing customer identity"),
        (status = 422, description = "Empty id list")
    )
)]
pub async fn pay(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    ValidatedJson(body): ValidatedJson<PayRequest>,
) -> ApiResult<StatusUpdateOutcome> {
    let outcome = services
        .ledger
        .mark_paid(customer_id, &body.ids)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(outcome)))
}
