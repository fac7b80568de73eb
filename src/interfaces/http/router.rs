//! API Router with Swagger UI

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::{ApiResponse, PaginatedResponse};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::{favourites, health, reservations, statuses, tours};
use crate::application::{BookingServices, SpanAvailability, StatusView, TourFull};
use crate::domain::favourite::FavouriteTour;
use crate::domain::reservation::{Reservation, ReservationStatus, StatusUpdateOutcome};
use crate::domain::tour::{TourInfo, TourSummary};

/// Unified state of the API routes. Handlers pick their part via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub services: BookingServices,
    pub health: health::HealthState,
}

impl FromRef<ApiState> for BookingServices {
    fn from_ref(s: &ApiState) -> Self {
        s.services.clone()
    }
}

impl FromRef<ApiState> for health::HealthState {
    fn from_ref(s: &ApiState) -> Self {
        s.health.clone()
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Statuses
        statuses::list_statuses,
        // Tours
        tours::popular_tours,
        tours::tour_full,
        tours::reserve,
        // Reservations
        reservations::list_pending,
        reservations::count_pending,
        reservations::history,
        reservations::update_count,
        reservations::delete_reservation,
        reservations::pay,
        // Favourites
        favourites::list_favourites,
        favourites::clear_favourites,
        favourites::is_favourite,
        favourites::add_favourite,
        favourites::remove_favourite,
        favourites::toggle_favourite,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<Reservation>,
            health::HealthResponse,
            health::ComponentHealth,
            // Tours
            TourSummary,
            TourInfo,
            TourFull,
            SpanAvailability,
            tours::ReserveRequest,
            // Reservations
            Reservation,
            ReservationStatus,
            StatusView,
            StatusUpdateOutcome,
            reservations::UpdateCountRequest,
            reservations::PayRequest,
            reservations::PendingCountResponse,
            // Favourites
            FavouriteTour,
            favourites::FavouriteStatusResponse,
            favourites::ClearFavouritesResponse,
        )
    ),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Tours", description = "Tour pages, popular tours and booking"),
        (name = "Reservations", description = "Reservation lifecycle of the calling customer"),
        (name = "Favourites", description = "Favourite tours of the calling customer"),
    ),
    info(
        title = "Tourbook Booking API",
        version = "1.0.0",
        description = "Reservations, seat accounting and favourites for tour departures. \
                       The customer is identified by the `X-Customer-Id` header set by the auth gateway.",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is mounted only when a Prometheus recorder was installed.
pub fn create_api_router(state: ApiState, metrics: Option<MetricsState>) -> Router {
    let tour_routes = Router::new()
        .route("/popular", get(tours::popular_tours))
        .route("/{slug}/full", get(tours::tour_full))
        .route("/{slug}/reservations", post(tours::reserve));

    let reservation_routes = Router::new()
        .route("/pending", get(reservations::list_pending))
        .route("/pending/count", get(reservations::count_pending))
        .route("/history", get(reservations::history))
        .route("/pay", post(reservations::pay))
        .route(
            "/{id}",
            patch(reservations::update_count)
                .delete(reservations::delete_reservation),
        );

    let favourite_routes = Router::new()
        .route(
            "/",
            get(favourites::list_favourites).delete(favourites::clear_favourites),
        )
        .route(
            "/{slug}",
            get(favourites::is_favourite)
                .put(favourites::add_favourite)
                .delete(favourites::remove_favourite),
        )
        .route("/{slug}/toggle", post(favourites::toggle_favourite));

    let api = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/reservation-statuses", get(statuses::list_statuses))
        .nest("/api/v1/tours", tour_routes)
        .nest("/api/v1/reservations", reservation_routes)
        .nest("/api/v1/favourites", favourite_routes)
        .with_state(state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new().merge(swagger_routes).merge(api);
    if let Some(metrics_state) = metrics {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(metrics_state),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::Service;

    use crate::application::services::test_support::{Fixture, ALICE, BOB};
    use crate::interfaces::http::common::CUSTOMER_ID_HEADER;

    struct TestApp {
        fx: Fixture,
        router: Router,
    }

    impl TestApp {
        async fn new() -> Self {
            let fx = Fixture::new().await;
            let state = ApiState {
                services: fx.services.clone(),
                health: health::HealthState::new(None),
            };
            Self {
                router: create_api_router(state, None),
                fx,
            }
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            customer: Option<i32>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(id) = customer {
                builder = builder.header(CUSTOMER_ID_HEADER, id.to_string());
            }
            let req = match body {
                Some(body) => builder
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let mut svc = self.router.clone().into_service();
            let resp = svc.call(req).await.unwrap();
            let status = resp.status();
            let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, value)
        }
    }

    #[tokio::test]
    async fn health_reports_in_memory_store() {
        let app = TestApp::new().await;
        let (status, body) = app.call("GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"]["status"], "in_memory");
    }

    #[tokio::test]
    async fn statuses_are_listed_with_labels() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call("GET", "/api/v1/reservation-statuses", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 7);
        assert!(items.iter().any(|s| s["code"] == "paid_back"));
    }

    #[tokio::test]
    async fn booking_flow_over_http() {
        let app = TestApp::new().await;
        let tour = app.fx.tour("Alpha Tour").await;
        app.fx.span(&tour, "June", 1, 10).await;
        let reserve_uri = format!("/api/v1/tours/{}/reservations", tour.slug);

        let (status, body) = app
            .call("POST", &reserve_uri, Some(ALICE), Some(json!({"count": 2})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["status"], "waiting");
        assert_eq!(body["data"]["count"], 2);
        let first = body["data"]["id"].as_i64().unwrap();

        let (status, body) = app
            .call("POST", &reserve_uri, Some(ALICE), Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["count"], 1);

        let (_, body) = app
            .call("GET", "/api/v1/reservations/pending/count", Some(ALICE), None)
            .await;
        assert_eq!(body["data"]["count"], 2);

        let (status, body) = app
            .call(
                "POST",
                "/api/v1/reservations/pay",
                Some(ALICE),
                Some(json!({"ids": [first, 9999]})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated"], json!([first]));
        assert_eq!(body["data"]["unmatched"], json!([9999]));

        let (_, body) = app
            .call("GET", &format!("/api/v1/tours/{}/full", tour.slug), None, None)
            .await;
        assert_eq!(body["data"]["time_span"]["places_released"], 1);

        let (_, body) = app
            .call("GET", "/api/v1/reservations/pending?page=1&limit=10", Some(ALICE), None)
            .await;
        assert_eq!(body["data"]["total"], 1);

        let (_, body) = app
            .call("GET", "/api/v1/reservations/history", Some(ALICE), None)
            .await;
        assert_eq!(body["data"]["total"], 2);
    }

    #[tokio::test]
    async fn mutations_require_identity() {
        let app = TestApp::new().await;
        let tour = app.fx.tour("Alpha Tour").await;
        app.fx.span(&tour, "June", 1, 10).await;

        let (status, body) = app
            .call(
                "POST",
                &format!("/api/v1/tours/{}/reservations", tour.slug),
                None,
                Some(json!({})),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);

        let (status, _) = app
            .call("DELETE", "/api/v1/reservations/1", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn reserve_without_body_books_one_seat() {
        let app = TestApp::new().await;
        let tour = app.fx.tour("Alpha Tour").await;
        app.fx.span(&tour, "June", 1, 10).await;
        let reserve_uri = format!("/api/v1/tours/{}/reservations", tour.slug);

        let (status, body) = app.call("POST", &reserve_uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["count"], 1);

        let (status, _) = app
            .call("POST", &reserve_uri, Some(ALICE), Some(json!({"count": 0})))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn foreign_reservation_looks_missing() {
        let app = TestApp::new().await;
        let tour = app.fx.tour("Alpha Tour").await;
        app.fx.span(&tour, "June", 1, 10).await;
        let reservation = app
            .fx
            .services
            .ledger
            .reserve(ALICE, &tour.slug, None)
            .await
            .unwrap();
        let uri = format!("/api/v1/reservations/{}", reservation.id);

        let (status, _) = app
            .call("PATCH", &uri, Some(BOB), Some(json!({"count": 3})))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app.call("DELETE", &uri, Some(BOB), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .call("PATCH", &uri, Some(ALICE), Some(json!({"count": 3})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 3);

        let (status, _) = app.call("DELETE", &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = app.call("DELETE", &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_bodies_are_rejected() {
        let app = TestApp::new().await;
        let tour = app.fx.tour("Alpha Tour").await;
        app.fx.span(&tour, "June", 1, 10).await;

        let (status, _) = app
            .call(
                "POST",
                &format!("/api/v1/tours/{}/reservations", tour.slug),
                Some(ALICE),
                Some(json!({"count": 0})),
            )
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .call("POST", "/api/v1/reservations/pay", Some(ALICE), Some(json!({"ids": []})))
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = app
            .call("GET", "/api/v1/tours/popular?limit=0", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_tour_is_not_found() {
        let app = TestApp::new().await;
        let (status, body) = app
            .call("GET", "/api/v1/tours/nowhere/full", None, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn favourites_over_http() {
        let app = TestApp::new().await;
        let tour = app.fx.tour("Alpha Tour").await;
        let uri = format!("/api/v1/favourites/{}", tour.slug);

        let (status, body) = app.call("GET", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_favorite"], false);

        let (status, _) = app.call("PUT", &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (_, body) = app.call("PUT", &uri, Some(ALICE), None).await;
        assert_eq!(body["data"]["is_favorite"], true);
        let (_, body) = app.call("PUT", &uri, Some(ALICE), None).await;
        assert_eq!(body["data"]["is_favorite"], true);

        let (_, body) = app.call("GET", &uri, Some(ALICE), None).await;
        assert_eq!(body["data"]["is_favorite"], true);

        let (_, body) = app.call("GET", "/api/v1/tours/popular", None, None).await;
        assert_eq!(body["data"][0]["favourites_count"], 1);

        let (_, body) = app
            .call("POST", &format!("{uri}/toggle"), Some(ALICE), None)
            .await;
        assert_eq!(body["data"]["is_favorite"], false);

        let (status, body) = app.call("DELETE", &uri, Some(ALICE), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_favorite"], false);

        app.call("PUT", &uri, Some(ALICE), None).await;
        let (_, body) = app.call("GET", "/api/v1/favourites", Some(ALICE), None).await;
        assert_eq!(body["data"][0]["slug"], tour.slug.as_str());

        let (_, body) = app.call("DELETE", "/api/v1/favourites", Some(ALICE), None).await;
        assert_eq!(body["data"]["removed"], 1);

        let (status, _) = app
            .call("PUT", "/api/v1/favourites/nowhere", Some(ALICE), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn openapi_lists_booking_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/tours/{slug}/reservations"));
        assert!(doc.paths.paths.contains_key("/api/v1/reservations/pay"));
        assert!(doc.paths.paths.contains_key("/api/v1/favourites/{slug}/toggle"));
    }
}
