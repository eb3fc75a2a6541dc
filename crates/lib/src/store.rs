//! # Row Store
//!
//! Typed CRUD over the three application tables. Each function takes a
//! `turso::Database`, opens its own connection, and maps rows into the
//! domain types. All reads are scoped by `owner_id`; each record is
//! single-writer, so no transaction spans more than one statement.

use crate::errors::PromptError;
use crate::types::{
    ArchivedReport, DataSource, QueryStatus, Report, ReportContent, SearchQuery, SearchType,
    SourceType,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use turso::{params, Database, Row, Value as TursoValue};
use uuid::Uuid;

// --- Row helpers ---

fn text(row: &Row, idx: usize) -> Result<String, PromptError> {
    match row.get_value(idx)? {
        TursoValue::Text(s) => Ok(s),
        other => Err(PromptError::StorageOperationFailed(format!(
            "expected TEXT at column {idx}, got {other:?}"
        ))),
    }
}

fn opt_text(row: &Row, idx: usize) -> Result<Option<String>, PromptError> {
    match row.get_value(idx)? {
        TursoValue::Text(s) => Ok(Some(s)),
        TursoValue::Null => Ok(None),
        other => Err(PromptError::StorageOperationFailed(format!(
            "expected TEXT or NULL at column {idx}, got {other:?}"
        ))),
    }
}

fn integer(row: &Row, idx: usize) -> Result<i64, PromptError> {
    match row.get_value(idx)? {
        TursoValue::Integer(i) => Ok(i),
        other => Err(PromptError::StorageOperationFailed(format!(
            "expected INTEGER at column {idx}, got {other:?}"
        ))),
    }
}

/// Parses the `CURRENT_TIMESTAMP` format SQLite writes by default.
fn timestamp(row: &Row, idx: usize) -> Result<DateTime<Utc>, PromptError> {
    let raw = text(row, idx)?;
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
        .map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
        .map_err(|e| PromptError::StorageOperationFailed(format!("bad timestamp '{raw}': {e}")))
}

fn opt_timestamp(row: &Row, idx: usize) -> Result<Option<DateTime<Utc>>, PromptError> {
    match opt_text(row, idx)? {
        None => Ok(None),
        Some(raw) => NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
            .map(|ndt| Some(DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc)))
            .map_err(|e| {
                PromptError::StorageOperationFailed(format!("bad timestamp '{raw}': {e}"))
            }),
    }
}

fn search_type(raw: &str) -> Result<SearchType, PromptError> {
    SearchType::parse(raw)
        .ok_or_else(|| PromptError::StorageOperationFailed(format!("unknown search_type '{raw}'")))
}

fn source_type(raw: &str) -> Result<SourceType, PromptError> {
    SourceType::parse(raw)
        .ok_or_else(|| PromptError::StorageOperationFailed(format!("unknown source_type '{raw}'")))
}

fn data_source_from_row(row: &Row) -> Result<DataSource, PromptError> {
    Ok(DataSource {
        id: text(row, 0)?,
        owner_id: text(row, 1)?,
        name: text(row, 2)?,
        source_type: source_type(&text(row, 3)?)?,
        url: opt_text(row, 4)?,
        description: opt_text(row, 5)?,
        is_active: integer(row, 6)? != 0,
        created_at: timestamp(row, 7)?,
    })
}

fn search_query_from_row(row: &Row) -> Result<SearchQuery, PromptError> {
    let status_raw = text(row, 5)?;
    Ok(SearchQuery {
        id: text(row, 0)?,
        owner_id: text(row, 1)?,
        query_text: text(row, 2)?,
        search_type: search_type(&text(row, 3)?)?,
        selected_sources: serde_json::from_str(&text(row, 4)?)?,
        status: QueryStatus::parse(&status_raw).ok_or_else(|| {
            PromptError::StorageOperationFailed(format!("unknown status '{status_raw}'"))
        })?,
        created_at: timestamp(row, 6)?,
    })
}

const DATA_SOURCE_COLUMNS: &str =
    "id, owner_id, name, source_type, url, description, is_active, created_at";
const SEARCH_QUERY_COLUMNS: &str =
    "id, owner_id, query_text, search_type, selected_sources, status, created_at";
const REPORT_COLUMNS: &str = "id, owner_id, query_id, title, summary, full_content, created_at";

fn report_from_row(row: &Row) -> Result<Report, PromptError> {
    let content: ReportContent = serde_json::from_str(&text(row, 5)?)?;
    Ok(Report {
        id: text(row, 0)?,
        owner_id: text(row, 1)?,
        query_id: opt_text(row, 2)?,
        title: text(row, 3)?,
        summary: text(row, 4)?,
        full_content: content,
        created_at: timestamp(row, 6)?,
    })
}

// --- Data sources ---

/// Registers a new data source. Only `name` is validated (non-empty); the
/// record is created active.
pub async fn insert_data_source(
    db: &Database,
    owner_id: &str,
    name: &str,
    kind: SourceType,
    url: Option<&str>,
    description: Option<&str>,
) -> Result<DataSource, PromptError> {
    if name.trim().is_empty() {
        return Err(PromptError::StorageOperationFailed(
            "data source name is required".to_string(),
        ));
    }
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO data_sources (id, owner_id, name, source_type, url, description) \
         VALUES (?, ?, ?, ?, ?, ?)",
        params![id.clone(), owner_id, name, kind.as_str(), url, description],
    )
    .await?;

    let mut rows = conn
        .query(
            &format!("SELECT {DATA_SOURCE_COLUMNS} FROM data_sources WHERE id = ?"),
            params![id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| {
        PromptError::StorageOperationFailed("inserted data source not found".to_string())
    })?;
    data_source_from_row(&row)
}

/// Lists the owner's data sources, newest first.
pub async fn list_data_sources(db: &Database, owner_id: &str) -> Result<Vec<DataSource>, PromptError> {
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    let mut rows = conn
        .query(
            &format!(
                "SELECT {DATA_SOURCE_COLUMNS} FROM data_sources \
                 WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC"
            ),
            params![owner_id],
        )
        .await?;
    let mut sources = Vec::new();
    while let Some(row) = rows.next().await? {
        sources.push(data_source_from_row(&row)?);
    }
    Ok(sources)
}

/// Lists the owner's active data sources (the set attached to searches).
pub async fn list_active_data_sources(
    db: &Database,
    owner_id: &str,
) -> Result<Vec<DataSource>, PromptError> {
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    let mut rows = conn
        .query(
            &format!(
                "SELECT {DATA_SOURCE_COLUMNS} FROM data_sources \
                 WHERE owner_id = ? AND is_active = 1 ORDER BY created_at DESC, rowid DESC"
            ),
            params![owner_id],
        )
        .await?;
    let mut sources = Vec::new();
    while let Some(row) = rows.next().await? {
        sources.push(data_source_from_row(&row)?);
    }
    Ok(sources)
}

/// Deletes a data source owned by the caller. Returns whether a row was
/// removed. Reports and queries that referenced the source are untouched.
pub async fn delete_data_source(
    db: &Database,
    owner_id: &str,
    source_id: &str,
) -> Result<bool, PromptError> {
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    let affected = conn
        .execute(
            "DELETE FROM data_sources WHERE id = ? AND owner_id = ?",
            params![source_id, owner_id],
        )
        .await?;
    Ok(affected > 0)
}

// --- Search queries ---

/// Inserts a new search query with status `processing`.
pub async fn insert_search_query(
    db: &Database,
    owner_id: &str,
    query_text: &str,
    kind: SearchType,
    selected_sources: &[String],
) -> Result<SearchQuery, PromptError> {
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    let id = Uuid::new_v4().to_string();
    let sources_json = serde_json::to_string(selected_sources)?;
    conn.execute(
        "INSERT INTO search_queries (id, owner_id, query_text, search_type, selected_sources, status) \
         VALUES (?, ?, ?, ?, ?, ?)",
        params![
            id.clone(),
            owner_id,
            query_text,
            kind.as_str(),
            sources_json,
            QueryStatus::Processing.as_str()
        ],
    )
    .await?;

    let mut rows = conn
        .query(
            &format!("SELECT {SEARCH_QUERY_COLUMNS} FROM search_queries WHERE id = ?"),
            params![id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| {
        PromptError::StorageOperationFailed("inserted search query not found".to_string())
    })?;
    search_query_from_row(&row)
}

/// Fetches a single query by id, unscoped (the summarization endpoint reads
/// the owner from the row itself).
pub async fn get_search_query(
    db: &Database,
    query_id: &str,
) -> Result<Option<SearchQuery>, PromptError> {
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    let mut rows = conn
        .query(
            &format!("SELECT {SEARCH_QUERY_COLUMNS} FROM search_queries WHERE id = ?"),
            params![query_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(search_query_from_row(&row)?)),
        None => Ok(None),
    }
}

/// Flips a query's status to `completed`. The guard on the current status
/// keeps the transition one-way.
pub async fn mark_query_completed(db: &Database, query_id: &str) -> Result<(), PromptError> {
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    conn.execute(
        "UPDATE search_queries SET status = ? WHERE id = ? AND status = ?",
        params![
            QueryStatus::Completed.as_str(),
            query_id,
            QueryStatus::Processing.as_str()
        ],
    )
    .await?;
    Ok(())
}

// --- Reports ---

/// Persists a report. Reports are immutable after this insert.
pub async fn insert_report(
    db: &Database,
    owner_id: &str,
    query_id: Option<&str>,
    title: &str,
    summary: &str,
    content: &ReportContent,
) -> Result<Report, PromptError> {
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    let id = Uuid::new_v4().to_string();
    let content_json = serde_json::to_string(content)?;
    conn.execute(
        "INSERT INTO reports (id, owner_id, query_id, title, summary, full_content) \
         VALUES (?, ?, ?, ?, ?, ?)",
        params![id.clone(), owner_id, query_id, title, summary, content_json],
    )
    .await?;

    let mut rows = conn
        .query(
            &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?"),
            params![id],
        )
        .await?;
    let row = rows.next().await?.ok_or_else(|| {
        PromptError::StorageOperationFailed("inserted report not found".to_string())
    })?;
    report_from_row(&row)
}

/// Lists the owner's reports, newest first, each joined with its
/// originating query (NULLs for ad-hoc scanner reports).
pub async fn list_reports(db: &Database, owner_id: &str) -> Result<Vec<ArchivedReport>, PromptError> {
    let conn = db
        .connect()
        .map_err(|e| PromptError::StorageConnection(e.to_string()))?;
    let mut rows = conn
        .query(
            "SELECT r.id, r.owner_id, r.query_id, r.title, r.summary, r.full_content, r.created_at, \
                    q.query_text, q.search_type, q.created_at \
             FROM reports r \
             LEFT JOIN search_queries q ON q.id = r.query_id \
             WHERE r.owner_id = ? \
             ORDER BY r.created_at DESC, r.rowid DESC",
            params![owner_id],
        )
        .await?;
    let mut reports = Vec::new();
    while let Some(row) = rows.next().await? {
        let report = report_from_row(&row)?;
        let query_search_type = match opt_text(&row, 8)? {
            Some(raw) => Some(search_type(&raw)?),
            None => None,
        };
        reports.push(ArchivedReport {
            report,
            query_text: opt_text(&row, 7)?,
            query_search_type,
            query_created_at: opt_timestamp(&row, 9)?,
        });
    }
    Ok(reports)
}
