//! # API Route Handlers
//!
//! All Axum route handlers for `pharmalens-server`, split by concern:
//! `process` (the summarization endpoint), `search` (the full submission
//! flow), `sources` (data source CRUD), `reports` (the archive), and
//! `general` (root/health).

pub mod general;
pub mod process;
pub mod reports;
pub mod search;
pub mod sources;

pub use general::*;
pub use process::*;
pub use reports::*;
pub use search::*;
pub use sources::*;

// Shared items used by multiple handler modules.
use super::types::{ApiResponse, DebugParams};
use axum::{extract::Query, Json};
use serde_json::Value;

/// A shared helper function to wrap a successful result in the standard `ApiResponse`
/// format, optionally including debug information if requested.
pub(crate) fn wrap_response<T>(
    result: T,
    debug_params: Query<DebugParams>,
    debug_info: Option<Value>,
) -> Json<ApiResponse<T>> {
    let debug = if debug_params.debug.unwrap_or(false) {
        debug_info
    } else {
        None
    };
    Json(ApiResponse { debug, result })
}
