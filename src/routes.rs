use crate::handlers::{self, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Builds the console router with every page and its middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_request_size = state.config.max_request_size;

    let pages = Router::new()
        .route("/", get(handlers::index))
        .route("/dashboard", get(handlers::dashboard))
        .route("/dashboard/metrics.json", get(handlers::export_metrics))
        .route("/applicants", get(handlers::applicants))
        .route("/applicants/:id", get(handlers::applicant_detail))
        .route(
            "/applicants/:id/what-if",
            post(handlers::applicant_what_if),
        )
        .route("/fairness", get(handlers::fairness))
        .route("/monitoring", get(handlers::monitoring))
        .route("/model-card", get(handlers::model_card))
        // What-if forms are a handful of numbers; cap anything larger
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(max_request_size)));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(pages)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
