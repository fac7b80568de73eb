//! Tour DTOs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PopularQuery {
    /// Number of tours to return. Default: 5
    pub limit: Option<u64>,
}

/// Body of a booking request. `{}` books one place.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct ReserveRequest {
    /// Number of places, at least 1. Default: 1
    #[validate(range(min = 1))]
    #[serde(default)]
    pub count: Option<i32>,
}
