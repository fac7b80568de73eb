//! Status listing handler

use axum::{extract::State, Json};

use crate::application::{BookingServices, StatusView};
use crate::interfaces::http::common::ApiResponse;

#[utoipa::path(
    get,
    path = "/api/v1/reservation-statuses",
    tag = "Reservations",
    responses(
        (status = 200, description = "Every reservation status with its label", body = ApiResponse<Vec<StatusView>>)
    )
)]
pub async fn list_statuses(
    State(services): State<BookingServices>,
) -> Json<ApiResponse<Vec<StatusView>>> {
    Json(ApiResponse::success(services.availability.list_statuses()))
}
