//! # SQLite Schema
//!
//! Centralizes the table-creation SQL for the application's store. Every
//! statement is idempotent; `SqliteProvider::initialize_schema` runs the lot
//! on startup.

/// All tables and indexes required by the application.
pub const ALL_TABLE_CREATION_SQL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS data_sources (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        name TEXT NOT NULL,
        source_type TEXT NOT NULL DEFAULT 'regulatory',
        url TEXT,
        description TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS search_queries (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        query_text TEXT NOT NULL,
        search_type TEXT NOT NULL,
        selected_sources TEXT NOT NULL DEFAULT '[]',
        status TEXT NOT NULL DEFAULT 'processing',
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE TABLE IF NOT EXISTS reports (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        query_id TEXT,
        title TEXT NOT NULL,
        summary TEXT NOT NULL,
        full_content TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )",
    "CREATE INDEX IF NOT EXISTS idx_data_sources_owner ON data_sources (owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_search_queries_owner ON search_queries (owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_reports_owner ON reports (owner_id)",
];
