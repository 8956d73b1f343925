pub mod classify;
pub mod health;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware;
use crate::state::AppState;

/// Application routes with tracing, CORS and panic handling applied.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(health::router())
        .merge(classify::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(middleware::panic::layer()),
        )
        .with_state(state)
}
