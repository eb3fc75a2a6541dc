//! # Summarization Endpoint
//!
//! `POST /api/process-research-query`: the single pipeline that turns a
//! query (or scanner-extracted document text) into a persisted report. This
//! endpoint keeps its flat `{success, ...}` wire contract, including the
//! blanket 500-with-error-JSON on any failure, because the scanner's
//! fallback logic keys off exactly that shape.

use crate::{auth::middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use pharmalens::{
    prompts::build_system_prompt,
    report::compose_summary,
    store,
    types::{ReportContent, SearchType, SourceRef},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

/// The request body for the summarization endpoint.
#[derive(Debug, Deserialize)]
pub struct ProcessResearchQueryRequest {
    /// The originating `search_queries` row, or null for ad-hoc scanner
    /// submissions.
    #[serde(default)]
    pub query_id: Option<String>,
    pub query_text: String,
    pub search_type: SearchType,
    #[serde(default)]
    pub sources: Vec<SourceRef>,
}

/// The response body for the summarization endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResearchQueryResponse {
    pub success: bool,
    pub title: String,
    pub summary: String,
    pub key_findings: Vec<String>,
    pub report_id: String,
}

/// Handler for `POST /api/process-research-query`.
pub async fn process_research_query_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<ProcessResearchQueryRequest>,
) -> impl IntoResponse {
    info!(
        query_id = ?payload.query_id,
        search_type = payload.search_type.as_str(),
        sources_count = payload.sources.len(),
        "Processing research query"
    );

    match run_research_pipeline(
        &app_state,
        &user.0.id,
        payload.query_id.as_deref(),
        &payload.query_text,
        payload.search_type,
        &payload.sources,
    )
    .await
    {
        Ok(response) => (StatusCode::OK, Json(json!(response))).into_response(),
        Err(err) => {
            warn!("Research query processing failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// The shared research pipeline: prompt → gateway → slice → persist.
///
/// When `query_id` is set, the query row's status is flipped and its owner
/// inherits the report; otherwise the report belongs to `caller_id` with no
/// query reference.
pub(crate) async fn run_research_pipeline(
    app_state: &AppState,
    caller_id: &str,
    query_id: Option<&str>,
    query_text: &str,
    search_type: SearchType,
    sources: &[SourceRef],
) -> anyhow::Result<ProcessResearchQueryResponse> {
    let db = &app_state.sqlite_provider.db;

    let system_prompt = build_system_prompt(search_type, sources);
    let ai_content = app_state
        .ai_provider
        .generate(&system_prompt, query_text)
        .await?;

    info!("AI response received, generating report");
    let summary = compose_summary(query_text, &ai_content);

    let owner_id = match query_id {
        Some(id) => {
            store::mark_query_completed(db, id).await?;
            let query = store::get_search_query(db, id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Search query not found"))?;
            query.owner_id
        }
        None => caller_id.to_string(),
    };

    let content = ReportContent {
        ai_response: ai_content,
        key_findings: summary.key_findings.clone(),
        search_type,
        sources_used: sources.to_vec(),
    };
    let report = store::insert_report(
        db,
        &owner_id,
        query_id,
        &summary.title,
        &summary.summary,
        &content,
    )
    .await?;

    info!(report_id = %report.id, "Report created");

    Ok(ProcessResearchQueryResponse {
        success: true,
        title: summary.title,
        summary: summary.summary,
        key_findings: summary.key_findings,
        report_id: report.id,
    })
}
