pub mod dto;
pub mod problem;
pub mod routes;
pub mod state;
pub mod trace;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::Cors;
use crate::interface::http::state::AppState;

/// Builds the full HTTP application with routes, middleware and state.
pub fn app(state: AppState) -> Router {
    // Step 1: Collect routes.
    let router = Router::new()
        .merge(routes::client::router())
        .merge(routes::health::router())
        .merge(routes::ready::router())
        .merge(routes::metrics::router());

    // Step 2: Request log runs inside the trace id middleware so it sees the id.
    let router = router
        .layer(axum::middleware::from_fn(trace::request_log_middleware))
        .layer(axum::middleware::from_fn(trace::trace_id_middleware));

    // Step 3: CORS for the configured front-end origins.
    let router = match cors_layer(&state.settings.cors) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    router.with_state(state)
}

/// CORS layer for the allowed origins, or `None` when none are configured.
fn cors_layer(cors: &Cors) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .expose_headers([header::LOCATION]),
    )
}
