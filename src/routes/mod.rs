use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, security_headers};
use crate::handlers::{bookings, events, health_check, notifications, tickets};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    let events_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/:id", get(events::get_event))
        .route("/:id/cancel", post(events::cancel_event))
        .route("/:id/bookings", get(events::event_bookings));

    let tickets_routes = Router::new()
        .route("/", post(tickets::create_ticket_type))
        .route("/event/:event_id", get(tickets::event_tickets))
        .route(
            "/:event_id/:category",
            put(tickets::update_ticket_type).delete(tickets::delete_ticket_type),
        );

    let bookings_routes = Router::new()
        .route("/", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/:id", get(bookings::get_booking))
        .route("/:id/cancel", put(bookings::cancel_booking));

    let notifications_routes = Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/read/all", put(notifications::mark_all_read))
        .route("/:id/read", put(notifications::mark_read));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/events", events_routes)
        .nest("/api/tickets", tickets_routes)
        .nest("/api/bookings", bookings_routes)
        .nest("/api/notifications", notifications_routes)
        .layer(middleware::from_fn(security_headers))
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
