//! Route definitions for the Evently API.

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod teams;
pub mod tickets;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::AppState;

/// Maximum accepted request body size.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let event_routes = Router::new()
        .route("/events", get(events::list).post(events::create))
        .route("/events/mine", get(events::mine))
        .route("/events/{id}", get(events::get_by_id))
        .route("/events/{id}/publish", post(events::publish))
        .route("/events/{id}/view", post(events::record_view))
        .route("/events/{id}/share", post(events::record_share))
        .route("/events/{id}/tickets", post(tickets::purchase));

    let account_routes = Router::new()
        .route("/tickets/mine", get(tickets::mine))
        .route("/teams", get(teams::list).post(teams::invite))
        .route("/teams/{id}", delete(teams::remove))
        .route("/dashboard/stats", get(dashboard::stats));

    let api = Router::new()
        .merge(auth_routes)
        .merge(event_routes)
        .merge(account_routes);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(cors_layer(&state.config.frontend_url))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let origin = match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "Invalid FRONTEND_URL, allowing any origin");
            AllowOrigin::any()
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
