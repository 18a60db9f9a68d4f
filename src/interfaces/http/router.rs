//! API router

use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::application::{AvailabilityService, ReservationService};
use crate::domain::RepositoryProvider;

use super::modules::availability::{self, AvailabilityAppState};
use super::modules::health::{self, HealthState};
use super::modules::metrics::{self, MetricsState};
use super::modules::reservations::{self, ReservationAppState};
use super::modules::tables::{self, TableAppState};

/// Everything the HTTP surface needs, wired up by the binary.
pub struct AppContext {
    pub repos: Arc<dyn RepositoryProvider>,
    pub reservations: Arc<ReservationService>,
    pub availability: Arc<AvailabilityService>,
    /// Prometheus render handle; `None` disables the `/metrics` route
    pub prometheus: Option<PrometheusHandle>,
}

/// Build the complete REST API router.
pub fn create_api_router(ctx: AppContext) -> Router {
    let reservation_state = ReservationAppState {
        service: ctx.reservations,
    };
    let table_state = TableAppState {
        repos: ctx.repos.clone(),
    };
    let availability_state = AvailabilityAppState {
        service: ctx.availability,
    };
    let health_state = HealthState {
        repos: ctx.repos,
        started_at: Arc::new(Instant::now()),
    };

    let reservation_routes = Router::new()
        .route(
            "/api/v1/reservations",
            post(reservations::create_reservation).get(reservations::list_reservations),
        )
        .route(
            "/api/v1/reservations/{id}",
            get(reservations::get_reservation).put(reservations::update_reservation),
        )
        .route(
            "/api/v1/reservations/code/{code}",
            get(reservations::get_reservation_by_code),
        )
        .route(
            "/api/v1/reservations/{id}/confirm",
            post(reservations::confirm_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/seat",
            post(reservations::seat_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/complete",
            post(reservations::complete_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/cancel",
            post(reservations::cancel_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/no-show",
            post(reservations::no_show_reservation),
        )
        .with_state(reservation_state);

    let table_routes = Router::new()
        .route(
            "/api/v1/tables",
            post(tables::register_table).get(tables::list_tables),
        )
        .route("/api/v1/tables/{id}", get(tables::get_table))
        .route("/api/v1/tables/{id}/status", put(tables::set_table_status))
        .with_state(table_state);

    let availability_routes = Router::new()
        .route("/api/v1/availability/slots", get(availability::get_time_slots))
        .route(
            "/api/v1/availability/calendar",
            get(availability::get_calendar),
        )
        .with_state(availability_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let mut router = Router::new()
        .merge(reservation_routes)
        .merge(table_routes)
        .merge(availability_routes)
        .merge(health_routes);

    if let Some(handle) = ctx.prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(metrics::prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use chrono::Duration;
    use serde_json::{json, Value};
    use tower::Service;

    use crate::application::booking::clock;
    use crate::application::booking::LoggingCustomerStats;
    use crate::config::BookingPolicy;
    use crate::infrastructure::InMemoryRepositoryProvider;
    use crate::notifications::{create_event_bus, EventBusNotificationScheduler};

    fn test_router() -> Router {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let bus = create_event_bus();
        let reservations = Arc::new(ReservationService::new(
            repos.clone(),
            BookingPolicy::default(),
            Arc::new(EventBusNotificationScheduler::new(bus.clone())),
            Arc::new(LoggingCustomerStats),
            bus,
        ));
        let availability = Arc::new(AvailabilityService::new(
            repos.clone(),
            BookingPolicy::default(),
        ));

        create_api_router(AppContext {
            repos,
            reservations,
            availability,
            prometheus: None,
        })
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut svc = router.clone().into_service();
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = svc.call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    fn future_date_string(days: i64) -> String {
        (clock::today() + Duration::days(days))
            .format("%Y-%m-%d")
            .to_string()
    }

    fn booking_body(date: &str, time: &str, party: u32, phone: &str) -> Value {
        json!({
            "contact": {"name": "Alice", "phone": phone},
            "date": date,
            "time": time,
            "party_size": party,
        })
    }

    #[tokio::test]
    async fn full_booking_flow_over_http() {
        let router = test_router();
        let date = future_date_string(3);

        // register a table
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/tables",
            Some(json!({"number": 1, "capacity": 4, "area": "Main Hall"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        // book it
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/reservations",
            Some(booking_body(&date, "20:00", 4, "+111")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let reservation_id = body["data"]["id"].as_str().unwrap().to_string();
        let code = body["data"]["confirmation_code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 6);
        assert_eq!(body["data"]["status"], "confirmed");

        // the table is now held
        let (_, body) = send(&router, Method::GET, "/api/v1/tables", None).await;
        assert_eq!(body["data"][0]["status"], "reserved");

        // overlapping second booking on the same table is a conflict
        let mut overlap = booking_body(&date, "19:00", 4, "+222");
        overlap["table_number"] = json!(1);
        let (status, _) = send(&router, Method::POST, "/api/v1/reservations", Some(overlap)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        // self-service lookup by code
        let (status, body) = send(
            &router,
            Method::GET,
            &format!("/api/v1/reservations/code/{}", code.to_lowercase()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["id"].as_str().unwrap(), reservation_id);

        // seat and complete
        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/api/v1/reservations/{}/seat", reservation_id),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "seated");

        let (status, body) = send(
            &router,
            Method::POST,
            &format!("/api/v1/reservations/{}/complete", reservation_id),
            Some(json!({"actual_spend": 74.2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "completed");

        // and the table is free again
        let (_, body) = send(&router, Method::GET, "/api/v1/tables", None).await;
        assert_eq!(body["data"][0]["status"], "available");
    }

    #[tokio::test]
    async fn invalid_party_size_is_rejected_by_the_extractor() {
        let router = test_router();
        let date = future_date_string(3);

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/v1/reservations",
            Some(booking_body(&date, "20:00", 0, "+111")),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn unknown_reservation_is_404() {
        let router = test_router();
        let (status, body) = send(
            &router,
            Method::GET,
            "/api/v1/reservations/nope",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn slots_and_calendar_are_served() {
        let router = test_router();
        let date = future_date_string(3);

        send(
            &router,
            Method::POST,
            "/api/v1/tables",
            Some(json!({"number": 1, "capacity": 4})),
        )
        .await;
        send(
            &router,
            Method::POST,
            "/api/v1/reservations",
            Some(booking_body(&date, "20:00", 2, "+111")),
        )
        .await;

        let (status, body) = send(
            &router,
            Method::GET,
            &format!(
                "/api/v1/availability/slots?date={}&duration_minutes=120&party_size=2",
                date
            ),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let slots = body["data"][0]["slots"].as_array().unwrap();
        assert_eq!(slots.len(), 28);
        // the booked 20:00 start is gone
        let booked = slots.iter().find(|s| s["time"] == "20:00:00").unwrap();
        assert_eq!(booked["available"], false);

        let (status, body) = send(&router, Method::GET, "/api/v1/availability/calendar", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 15);
    }

    #[tokio::test]
    async fn health_reports_inventory_counts() {
        let router = test_router();
        send(
            &router,
            Method::POST,
            "/api/v1/tables",
            Some(json!({"number": 1, "capacity": 4})),
        )
        .await;

        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["tables"], 1);
        assert_eq!(body["active_reservations"], 0);
    }

    #[tokio::test]
    async fn administrative_status_cannot_claim_lifecycle_states() {
        let router = test_router();
        let (_, body) = send(
            &router,
            Method::POST,
            "/api/v1/tables",
            Some(json!({"number": 1, "capacity": 4})),
        )
        .await;
        let table_id = body["data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &router,
            Method::PUT,
            &format!("/api/v1/tables/{}/status", table_id),
            Some(json!({"status": "occupied"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &router,
            Method::PUT,
            &format!("/api/v1/tables/{}/status", table_id),
            Some(json!({"status": "maintenance"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "maintenance");
    }
}
