use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{discounts, fleet, health_check, network, tickets};
use crate::state::{AppState, OperationsState};

/// Ticket and discount endpoints. Runs on any store implementation.
pub fn ticket_routes(state: AppState) -> Router {
    Router::new()
        .route("/api/tickets", get(tickets::list_tickets))
        .route("/api/tickets/purchase", post(tickets::purchase))
        .route("/api/tickets/:id", get(tickets::get_ticket))
        .route("/api/tickets/:id/mark", post(tickets::mark))
        .route("/api/tickets/:id/status", get(tickets::status))
        .route("/api/tickets/:id/validate", get(tickets::validate))
        .route(
            "/api/discounts",
            get(discounts::list_discounts).post(discounts::create_discount),
        )
        .route(
            "/api/discounts/:id",
            get(discounts::get_discount)
                .put(discounts::update_discount)
                .delete(discounts::delete_discount),
        )
        .with_state(state)
}

/// Fleet and network endpoints.
pub fn operations_routes(state: OperationsState) -> Router {
    Router::new()
        .route(
            "/api/vehicles",
            get(fleet::list_vehicles).post(fleet::create_vehicle),
        )
        .route(
            "/api/vehicles/:id",
            get(fleet::get_vehicle)
                .put(fleet::update_vehicle)
                .delete(fleet::delete_vehicle),
        )
        .route("/api/vehicles/:id/position", put(fleet::record_position))
        .route(
            "/api/vehicles/:id/fuel-logs",
            get(fleet::list_fuel_logs).post(fleet::create_fuel_log),
        )
        .route("/api/vehicles/:id/fuel-summary", get(fleet::fuel_summary))
        .route(
            "/api/malfunctions",
            get(fleet::list_malfunctions).post(fleet::report_malfunction),
        )
        .route("/api/malfunctions/:id", get(fleet::get_malfunction))
        .route(
            "/api/malfunctions/:id/resolve",
            post(fleet::resolve_malfunction),
        )
        .route(
            "/api/routes",
            get(network::list_routes).post(network::create_route),
        )
        .route(
            "/api/routes/:id",
            get(network::get_route)
                .put(network::update_route)
                .delete(network::delete_route),
        )
        .route(
            "/api/routes/:id/stops",
            get(network::route_stops).put(network::replace_route_stops),
        )
        .route(
            "/api/routes/:id/schedules",
            get(network::list_schedules).post(network::create_schedule),
        )
        .route(
            "/api/stops",
            get(network::list_stops).post(network::create_stop),
        )
        .route(
            "/api/stops/:id",
            put(network::update_stop).delete(network::delete_stop),
        )
        .route(
            "/api/schedules/:id",
            axum::routing::delete(network::delete_schedule),
        )
        .with_state(state)
}

/// Health check plus the given API routers, wrapped in the shared middleware stack.
pub fn create_routes(api: Router) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
}
