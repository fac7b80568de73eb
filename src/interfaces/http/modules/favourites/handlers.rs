//! Favourite handlers

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{ClearFavouritesResponse, FavouriteStatusResponse};
use crate::application::BookingServices;
use crate::domain::favourite::FavouriteTour;
use crate::interfaces::http::common::{
    domain_error, ApiResponse, ApiResult, CurrentCustomer, MaybeCustomer,
};

fn status(is_favorite: bool) -> Json<ApiResponse<FavouriteStatusResponse>> {
    Json(ApiResponse::success(FavouriteStatusResponse { is_favorite }))
}

#[utoipa::path(
    get,
    path = "/api/v1/favourites",
    tag = "Favourites",
    params(("X-Customer-Id" = i32, Header, description = "Authenticated customer")),
    responses(
        (status = 200, description = "Favourite tours in the order they were added", body = ApiResponse<Vec<FavouriteTour>>),
        (status = 401, description = "Missing customer identity")
    )
)]
pub async fn list_favourites(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> ApiResult<Vec<FavouriteTour>> {
    let tours = services
        .favourites
        .list(customer_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(tours)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/favourites",
    tag = "Favourites",
    params(("X-Customer-Id" = i32, Header, description = "Authenticated customer")),
    responses(
        (status = 200, description = "All favourites removed", body = ApiResponse<ClearFavouritesResponse>),
        (status = 401, description = "Missing customer identity")
    )
)]
pub async fn clear_favourites(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> ApiResult<ClearFavouritesResponse> {
    let removed = services
        .favourites
        .clear(customer_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(ClearFavouritesResponse { removed })))
}

/// Anonymous visitors always get `false`.
#[utoipa::path(
    get,
    path = "/api/v1/favourites/{slug}",
    tag = "Favourites",
    params(
        ("slug" = String, Path, description = "Tour slug"),
        ("X-Customer-Id" = Option<i32>, Header, description = "Authenticated customer, if any")
    ),
    responses(
        (status = 200, description = "Whether the tour is a favourite", body = ApiResponse<FavouriteStatusResponse>)
    )
)]
pub async fn is_favourite(
    State(services): State<BookingServices>,
    MaybeCustomer(customer_id): MaybeCustomer,
    Path(slug): Path<String>,
) -> ApiResult<FavouriteStatusResponse> {
    let found = services
        .favourites
        .is_favourite(customer_id, &slug)
        .await
        .map_err(domain_error)?;
    Ok(status(found))
}

#[utoipa::path(
    put,
    path = "/api/v1/favourites/{slug}",
    tag = "Favourites",
    params(
        ("slug" = String, Path, description = "Tour slug"),
        ("X-Customer-Id" = i32, Header, description = "Authenticated customer")
    ),
    responses(
        (status = 200, description = "Tour is a favourite", body = ApiResponse<FavouriteStatusResponse>),
        (status = 401, description = "Missing customer identity"),
        (status = 404, description = "Unknown tour")
    )
)]
pub async fn add_favourite(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Path(slug): Path<String>,
) -> ApiResult<FavouriteStatusResponse> {
    services
        .favourites
        .add(customer_id, &slug)
        .await
        .map_err(domain_error)?;
    Ok(status(true))
}

#[utoipa::path(
    delete,
    path = "/api/v1/favourites/{slug}",
    tag = "Favourites",
    params(
        ("slug" = String, Path, description = "Tour slug"),
        ("X-Customer-Id" = i32, Header, description = "Authenticated customer")
    ),
    responses(
        (status = 200, description = "Tour is not a favourite", body = ApiResponse<FavouriteStatusResponse>),
        (status = 401, description = "Missing customer identity"),
        (status = 404, description = "Unknown tour")
    )
)]
pub async fn remove_favourite(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Path(slug): Path<String>,
) -> ApiResult<FavouriteStatusResponse> {
    services
        .favourites
        .remove(customer_id, &slug)
        .await
        .map_err(domain_error)?;
    Ok(status(false))
}

#[utoipa::path(
    post,
    path = "/api/v1/favourites/{slug}/toggle",
    tag = "Favourites",
    params(
        ("slug" = String, Path, description = "Tour slug"),
        ("X-Customer-Id" = i32, Header, description = "Authenticated customer")
    ),
    responses(
        (status = 200, description = "New favourite state", body = ApiResponse<FavouriteStatusResponse>),
        (status = 401, description = "Missing customer identity"),
        (status = 404, description = "Unknown tour")
    )
)]
pub async fn toggle_favourite(
    State(services): State<BookingServices>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Path(slug): Path<String>,
) -> ApiResult<FavouriteStatusResponse> {
    let now_favourite = services
        .favourites
        .toggle(customer_id, &slug)
        .await
        .map_err(domain_error)?;
    Ok(status(now_favourite))
}
