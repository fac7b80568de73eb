//! Tour handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{PopularQuery, ReserveRequest};
use crate::application::{BookingServices, TourFull};
use crate::domain::reservation::Reservation;
use crate::domain::tour::TourSummary;
use crate::interfaces::http::common::{
    domain_error, ApiError, ApiResponse, ApiResult, CurrentCustomer, ValidatedJson,
};

#[utoipa::path(
    get,
    path = "/api/v1/tours/popular",
    tag = "Tours",
    params(PopularQuery),
    responses(
        (status = 200, description = "Tours ordered by how many customers favourited them", body = ApiResponse<Vec<TourSummary>>),
        (status = 400, description = "Invalid limit")
    )
)]
pub async fn popular_tours(
    State(services): State<BookingServices>,
    Query(query): Query<PopularQuery>,
) -> ApiResult<Vec<TourSummary>> {
    let tours = services
        .availability
        .popular_tours(query.limit)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(tours)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tours/{slug}/full",
    tag = "Tours",
    params(("slug" = String, Path, description = "Tour slug")),
    responses(
        (status = 200, description = "Tour with details and its nearest departure", body = ApiResponse<TourFull>),
        (status = 404, description = "Unknown tour")
    )
)]
pub async fn tour_full(
    State(services): State<BookingServices>,
    Path(slug): Path<String>,
) -> ApiResult<TourFull> {
    let tour = services
        .availability
        .tour_full(&slug)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(tour)))
}

#[utoipa::path(
    post,
    path = "/api/v1/tours/{slug}/reservations",
    tag = "Tours",
    params(
        ("slug" = String, Path, description = "Tour slug"),
        ("X-Customer-Id" = i32, Header, description = "Authenticated customer")
    ),
    request_body(content = Option<ReserveRequest>, description = "Optional; an absent body books one seat"),
    responses(
        (status = 201, description = "Reservation created in `waiting`", body = ApiResponse<Reservation>),
        (status = 401, description = "Missing customer identity"),
        (status = 404, description = "Unknown tour or no departure scheduled"),
        (status = 409, description = "Departure is fully booked"),
        (status = 422, description = "Invalid count")
    )
)]
pub async fn reserve(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Path(slug): Path<String>,
    body: Option<ValidatedJson<ReserveRequest>>,
) -> Result<(StatusCode, Json<ApiResponse<Reservation>>), ApiError> {
    let count = body.and_then(|ValidatedJson(body)| body.count);
    let reservation = services
        .ledger
        .reserve(customer_id, &slug, count)
        .await
        .map_err(domain_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(reservation))))
}
