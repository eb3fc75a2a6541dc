//! # Data Source Handlers
//!
//! CRUD for the caller's registered data sources. Sources are metadata
//! only; nothing ever queries them programmatically.

use crate::{
    auth::middleware::AuthenticatedUser,
    errors::AppError,
    handlers::wrap_response,
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use pharmalens::{
    store,
    types::{DataSource, SourceType},
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreateSourceRequest {
    pub name: String,
    pub source_type: SourceType,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Handler for `GET /api/sources`: the caller's sources, newest first.
pub async fn list_sources_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Vec<DataSource>>>, AppError> {
    let sources = store::list_data_sources(&app_state.sqlite_provider.db, &user.0.id).await?;
    Ok(wrap_response(sources, debug_params, None))
}

/// Handler for `POST /api/sources`.
pub async fn create_source_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Json(payload): Json<CreateSourceRequest>,
) -> Result<Json<ApiResponse<DataSource>>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Data source name is required".to_string(),
        ));
    }

    let source = store::insert_data_source(
        &app_state.sqlite_provider.db,
        &user.0.id,
        &payload.name,
        payload.source_type,
        payload.url.as_deref(),
        payload.description.as_deref(),
    )
    .await?;
    info!(source_id = %source.id, "Data source connected");

    Ok(wrap_response(source, debug_params, None))
}

/// Handler for `DELETE /api/sources/{id}`. Owner-scoped; existing reports
/// that referenced the source are untouched.
pub async fn delete_source_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
    Path(source_id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let deleted =
        store::delete_data_source(&app_state.sqlite_provider.db, &user.0.id, &source_id).await?;
    if !deleted {
        return Err(AppError::NotFound("Data source not found".to_string()));
    }
    info!(%source_id, "Data source removed");

    Ok(wrap_response(json!({ "deleted": true }), debug_params, None))
}
