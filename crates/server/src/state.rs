//! # Application State
//!
//! The shared application state (`AppState`) and the logic for building it
//! at startup: the SQLite provider, the AI gateway client, and the loaded
//! configuration, shared across all request handlers.

use crate::config::AppConfig;
use pharmalens::providers::{
    ai::{gateway::GatewayProvider, AiProvider},
    db::sqlite::SqliteProvider,
};
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// The SQLite store holding users, sources, queries, and reports.
    pub sqlite_provider: Arc<SqliteProvider>,
    /// The chat-completion client used by the summarization pipeline.
    pub ai_provider: Arc<dyn AiProvider>,
}

/// Builds the shared application state from the configuration.
///
/// Instantiates the gateway client, opens the database, and brings the
/// schema up to date.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let api_key = config
        .ai
        .api_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("AI_API_KEY not configured"))?;
    let ai_provider = GatewayProvider::new(
        config.ai.api_url.clone(),
        api_key,
        config.ai.model_name.clone(),
    )?;

    let sqlite_provider = SqliteProvider::new(&config.db_url).await?;
    tracing::info!(db_path = %config.db_url, "Initialized local storage provider (SQLite).");
    sqlite_provider.initialize_schema().await?;

    Ok(AppState {
        config: Arc::new(config),
        sqlite_provider: Arc::new(sqlite_provider),
        ai_provider: Arc::new(ai_provider),
    })
}
