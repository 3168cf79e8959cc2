//! API router
//!
//! Thin shell over the programmatic operations; every engine decision is
//! made below this layer. OpenAPI documentation is generated with utoipa
//! and served at /api-docs/openapi.json.

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{get, patch, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::application::{AvailabilityService, IdempotencyService, ReservationService};
use crate::interfaces::http::error::ErrorBody;
use crate::interfaces::http::modules::availability::{self, AvailabilityAppState};
use crate::interfaces::http::modules::health;
use crate::interfaces::http::modules::reservations::{self, ReservationsAppState};

/// Unified state for all routes. Axum extracts the per-module state via
/// `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub reservations: Arc<ReservationService>,
    pub availability: Arc<AvailabilityService>,
    pub idempotency: Arc<IdempotencyService>,
}

impl FromRef<ApiState> for ReservationsAppState {
    fn from_ref(s: &ApiState) -> Self {
        ReservationsAppState {
            reservations: Arc::clone(&s.reservations),
            idempotency: Arc::clone(&s.idempotency),
        }
    }
}

impl FromRef<ApiState> for AvailabilityAppState {
    fn from_ref(s: &ApiState) -> Self {
        AvailabilityAppState {
            availability: Arc::clone(&s.availability),
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::health_check,
        availability::handlers::get_availability,
        reservations::handlers::create_reservation,
        reservations::handlers::update_reservation,
        reservations::handlers::cancel_reservation,
        reservations::handlers::day_view,
        reservations::handlers::approve_reservation,
        reservations::handlers::reject_reservation,
        reservations::handlers::expire_pending,
    ),
    components(schemas(
        ErrorBody,
        health::handlers::HealthResponse,
        availability::dto::SlotDto,
        availability::dto::AvailabilityResponse,
        reservations::dto::CustomerDto,
        reservations::dto::CreateReservationRequest,
        reservations::dto::UpdateReservationRequest,
        reservations::dto::ReservationDto,
        reservations::dto::DayViewResponse,
        reservations::dto::ExpireResponse,
    )),
    tags(
        (name = "Availability", description = "Per-slot feasibility reports"),
        (name = "Reservations", description = "Reservation lifecycle"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;

/// Build the API router.
pub fn create_api_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::handlers::health_check))
        .route("/availability", get(availability::handlers::get_availability))
        .route("/reservations", post(reservations::handlers::create_reservation))
        .route("/reservations/day", get(reservations::handlers::day_view))
        .route(
            "/reservations/expire-pending",
            post(reservations::handlers::expire_pending),
        )
        .route(
            "/reservations/:id",
            patch(reservations::handlers::update_reservation)
                .delete(reservations::handlers::cancel_reservation),
        )
        .route(
            "/reservations/:id/approve",
            post(reservations::handlers::approve_reservation),
        )
        .route(
            "/reservations/:id/reject",
            post(reservations::handlers::reject_reservation),
        )
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::locking::DEFAULT_LOCK_TTL;
    use crate::application::SlotLockManager;
    use crate::config::BookingConfig;
    use crate::domain::{
        DurationRule, RepositoryProvider, Restaurant, Sector, Shift, Table,
    };
    use crate::infrastructure::memory::{InMemoryLockStore, InMemoryRepositoryProvider};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn seeded_app() -> (Arc<InMemoryRepositoryProvider>, Router) {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        repos
            .restaurants()
            .save(Restaurant {
                id: "r1".into(),
                name: "La Parrilla".into(),
                timezone: "America/Argentina/Buenos_Aires".into(),
                shifts: vec![
                    Shift::new("12:00", "16:00").unwrap(),
                    Shift::new("20:00", "23:45").unwrap(),
                ],
                default_duration_minutes: 90,
                duration_rules: vec![
                    DurationRule { max_party_size: 2, duration_minutes: 75 },
                    DurationRule { max_party_size: 4, duration_minutes: 90 },
                    DurationRule { max_party_size: 8, duration_minutes: 120 },
                    DurationRule { max_party_size: 999, duration_minutes: 150 },
                ],
                advance_policy: None,
                large_group_threshold: Some(8),
                pending_hold_ttl_minutes: Some(30),
                max_guests_per_slot: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();
        repos
            .sectors()
            .save_sector(Sector {
                id: "s1".into(),
                restaurant_id: "r1".into(),
                name: "Main Hall".into(),
            })
            .await
            .unwrap();
        repos
            .sectors()
            .save_table(Table::new("t1", "s1", 2, 4).unwrap())
            .await
            .unwrap();
        repos
            .sectors()
            .save_table(Table::new("t2", "s1", 2, 4).unwrap())
            .await
            .unwrap();

        let locks = Arc::new(SlotLockManager::new(
            Arc::new(InMemoryLockStore::new()),
            DEFAULT_LOCK_TTL,
        ));
        let reservations = Arc::new(crate::application::ReservationService::new(
            repos.clone(),
            locks,
            BookingConfig::default(),
        ));
        let availability = Arc::new(crate::application::AvailabilityService::new(
            repos.clone(),
            BookingConfig::default(),
        ));
        let idempotency = Arc::new(crate::application::IdempotencyService::new(repos.clone()));

        let router = create_api_router(ApiState {
            reservations,
            availability,
            idempotency,
        });
        (repos, router)
    }

    fn create_body() -> Value {
        json!({
            "restaurantId": "r1",
            "sectorId": "s1",
            "partySize": 2,
            "startDateTime": "2031-09-08T20:00:00-03:00",
            "customer": {
                "name": "Ana",
                "phone": "+54 11 5555-0001",
                "email": "ana@example.com"
            }
        })
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: &Value, idempotency_key: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(key) = idempotency_key {
            builder = builder.header("Idempotency-Key", key);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn create_returns_201_with_camel_case_payload() {
        let (_, router) = seeded_app().await;
        let (status, body) = send(&router, post_json("/reservations", &create_body(), None)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "CONFIRMED");
        assert_eq!(body["partySize"], 2);
        assert!(body["id"].is_string());
        assert!(body["tableIds"].is_array());
        // 20:00 -03 plus 75 minutes
        let end: chrono::DateTime<Utc> = body["endDateTime"]
            .as_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(end, Utc.with_ymd_and_hms(2031, 9, 9, 0, 15, 0).unwrap());
    }

    #[tokio::test]
    async fn idempotent_create_replays_without_a_second_row() {
        let (repos, router) = seeded_app().await;

        let (s1, b1) = send(&router, post_json("/reservations", &create_body(), Some("k1"))).await;
        let (s2, b2) = send(&router, post_json("/reservations", &create_body(), Some("k1"))).await;

        assert_eq!(s1, StatusCode::CREATED);
        assert_eq!(s2, StatusCode::CREATED);
        assert_eq!(b1, b2);

        // Exactly one reservation was persisted
        let day_start = Utc.with_ymd_and_hms(2031, 9, 8, 3, 0, 0).unwrap();
        let rows = repos
            .reservations()
            .find_by_day("r1", day_start, day_start + ChronoDuration::hours(24), None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, b1["id"].as_str().unwrap());
    }

    #[tokio::test]
    async fn distinct_keys_create_distinct_reservations() {
        let (_, router) = seeded_app().await;
        let (_, b1) = send(&router, post_json("/reservations", &create_body(), Some("k1"))).await;
        let (_, b2) = send(&router, post_json("/reservations", &create_body(), Some("k2"))).await;
        assert_ne!(b1["id"], b2["id"]);
    }

    #[tokio::test]
    async fn full_slot_returns_409_no_capacity() {
        let (_, router) = seeded_app().await;
        send(&router, post_json("/reservations", &create_body(), None)).await;
        send(&router, post_json("/reservations", &create_body(), None)).await;
        let (status, body) = send(&router, post_json("/reservations", &create_body(), None)).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "no_capacity");
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn outside_shift_returns_422() {
        let (_, router) = seeded_app().await;
        let mut body = create_body();
        body["startDateTime"] = json!("2031-09-08T18:00:00-03:00");
        let (status, body) = send(&router, post_json("/reservations", &body, None)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "outside_service_window");
    }

    #[tokio::test]
    async fn unknown_restaurant_returns_404() {
        let (_, router) = seeded_app().await;
        let mut body = create_body();
        body["restaurantId"] = json!("nope");
        let (status, body) = send(&router, post_json("/reservations", &body, None)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn cancel_returns_204_then_404_for_unknown() {
        let (_, router) = seeded_app().await;
        let (_, created) = send(&router, post_json("/reservations", &create_body(), None)).await;
        let id = created["id"].as_str().unwrap();

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/reservations/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let request = Request::builder()
            .method("DELETE")
            .uri("/reservations/ghost")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn availability_reports_slots() {
        let (_, router) = seeded_app().await;
        let request = Request::builder()
            .uri("/availability?restaurantId=r1&sectorId=s1&date=2031-09-08&partySize=2")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slotMinutes"], 15);
        assert_eq!(body["durationMinutes"], 75);
        let slots = body["slots"].as_array().unwrap();
        assert_eq!(slots.len(), 13);
        assert_eq!(slots[0]["start"], "2031-09-08T15:00:00Z");
        assert_eq!(slots[0]["available"], true);
    }

    #[tokio::test]
    async fn malformed_date_returns_400() {
        let (_, router) = seeded_app().await;
        let request = Request::builder()
            .uri("/availability?restaurantId=r1&sectorId=s1&date=tomorrow&partySize=2")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_format");
    }

    #[tokio::test]
    async fn day_view_lists_created_reservations() {
        let (_, router) = seeded_app().await;
        send(&router, post_json("/reservations", &create_body(), None)).await;

        let request = Request::builder()
            .uri("/reservations/day?restaurantId=r1&date=2031-09-08")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["date"], "2031-09-08");
        assert_eq!(body["items"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn large_group_flows_through_approval() {
        let (_, router) = seeded_app().await;
        let mut body = create_body();
        body["partySize"] = json!(8);
        let (status, created) = send(&router, post_json("/reservations", &body, None)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "PENDING");
        assert!(created["expiresAt"].is_string());
        let id = created["id"].as_str().unwrap();

        let request = Request::builder()
            .method("POST")
            .uri(format!("/reservations/{}/approve", id))
            .body(Body::empty())
            .unwrap();
        let (status, approved) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(approved["status"], "CONFIRMED");
        assert!(approved.get("expiresAt").is_none());
    }

    #[tokio::test]
    async fn expire_sweep_reports_count() {
        let (_, router) = seeded_app().await;
        let request = Request::builder()
            .method("POST")
            .uri("/reservations/expire-pending")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["expiredCount"], 0);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (_, router) = seeded_app().await;
        let request = Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/reservations"].is_object());
    }
}
