use super::{handlers, state::AppState};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/api/process-research-query",
            post(handlers::process_research_query_handler),
        )
        .route("/api/search", post(handlers::search_handler))
        .route(
            "/api/sources",
            get(handlers::list_sources_handler).post(handlers::create_source_handler),
        )
        .route("/api/sources/{id}", delete(handlers::delete_source_handler))
        .route("/api/reports", get(handlers::list_reports_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
