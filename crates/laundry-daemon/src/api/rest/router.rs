//! API Router configuration

use super::auth;
use super::handlers;
use super::state::AppState;
use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/status", get(handlers::daemon_status))
        // Notes
        .route("/notes", get(handlers::list_notes))
        .route("/notes", post(handlers::create_note))
        .route("/notes/:id", get(handlers::get_note))
        .route("/notes/:id", put(handlers::update_note))
        .route("/notes/:id", delete(handlers::delete_note))
        .route("/notes/:id/abonos", post(handlers::add_abono))
        .route("/notes/:id/pay", post(handlers::pay_note))
        .route("/notes/:id/deliver", post(handlers::deliver_note))
        .route("/notes/:id/cancel", post(handlers::cancel_note))
        // Orders
        .route("/orders", get(handlers::list_orders))
        .route("/orders", post(handlers::create_order))
        .route("/orders/:id", get(handlers::get_order))
        .route("/orders/:id", put(handlers::update_order))
        .route("/orders/:id", delete(handlers::delete_order))
        // Dashboard
        .route("/stats", get(handlers::get_stats))
        // Events
        .route("/events", get(handlers::get_events))
        .route("/events/stream", get(handlers::stream_events))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    let api_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .merge(protected_routes);

    // Build router with middleware
    let router = Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http());

    let router = if state.enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
