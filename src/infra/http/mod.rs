pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::application::quakes::QuakeService;

#[derive(Clone)]
pub struct AppState {
    pub quakes: Arc<QuakeService>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/v1/earthquakes/sf-bay-area", get(handlers::sf_bay_area))
        .route(
            "/v1/earthquakes/sf-bay-area/felt-reports",
            get(handlers::sf_bay_area_felt_reports),
        )
        .route(
            "/v1/earthquakes/tsunami-alerts",
            get(handlers::tsunami_alerts),
        )
        .with_state(state)
        .layer(axum_middleware::from_fn(middleware::log_responses))
        .layer(axum_middleware::from_fn(middleware::set_request_context))
}
