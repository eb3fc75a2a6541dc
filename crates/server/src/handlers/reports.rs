//! # Report Archive Handler

use crate::{
    auth::middleware::AuthenticatedUser,
    errors::AppError,
    handlers::wrap_response,
    state::AppState,
    types::{ApiResponse, DebugParams},
};
use axum::{
    extract::{Query, State},
    Json,
};
use pharmalens::{store, types::ArchivedReport};

/// Handler for `GET /api/reports`: the caller's reports, newest first, each
/// joined with its originating query (nulls for ad-hoc scanner reports).
pub async fn list_reports_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    debug_params: Query<DebugParams>,
) -> Result<Json<ApiResponse<Vec<ArchivedReport>>>, AppError> {
    let reports = store::list_reports(&app_state.sqlite_provider.db, &user.0.id).await?;
    Ok(wrap_response(reports, debug_params, None))
}
