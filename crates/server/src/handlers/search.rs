//! # Search Submission Flow
//!
//! `POST /api/search`: the authenticated equivalent of the original Search
//! view. Creates the `search_queries` row, attaches the caller's active
//! sources, runs the research pipeline, and returns the report.

use crate::{
    auth::middleware::AuthenticatedUser,
    errors::AppError,
    handlers::process::run_research_pipeline,
    handlers::wrap_response,
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::{
    extract::{Query, State},
    Json,
};
use pharmalens::{store, types::SearchType};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query_text: String,
    pub search_type: SearchType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query_id: String,
    pub title: String,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub report_id: String,
}

/// Handler for `POST /api/search`.
pub async fn search_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Json(payload): Json<SearchRequest>,
) -> Result<Json<ApiResponse<SearchResponse>>, AppError> {
    if payload.query_text.trim().is_empty() {
        return Err(AppError::BadRequest("Please enter a query".to_string()));
    }

    let db = &app_state.sqlite_provider.db;
    let owner_id = &user.0.id;

    // Snapshot the caller's active sources: their ids go on the query row,
    // their names into the prompt context.
    let sources = store::list_active_data_sources(db, owner_id).await?;
    let source_ids: Vec<String> = sources.iter().map(|s| s.id.clone()).collect();
    let source_refs: Vec<_> = sources.iter().map(|s| s.to_ref()).collect();

    let query = store::insert_search_query(
        db,
        owner_id,
        &payload.query_text,
        payload.search_type,
        &source_ids,
    )
    .await?;
    info!(query_id = %query.id, "Search query created, invoking pipeline");

    let result = run_research_pipeline(
        &app_state,
        owner_id,
        Some(&query.id),
        &payload.query_text,
        payload.search_type,
        &source_refs,
    )
    .await?;

    let debug_info = json!({
        "search_type": payload.search_type,
        "sources_attached": source_ids.len(),
    });

    Ok(wrap_response(
        SearchResponse {
            query_id: query.id,
            title: result.title,
            summary: result.summary,
            key_findings: result.key_findings,
            report_id: result.report_id,
        },
        debug_params,
        Some(debug_info),
    ))
}
