//! Domain types shared across the workspace.
//!
//! The wire strings (`web_search`, `clinical_trial`, ...) are part of the
//! public API contract and also the values persisted in SQLite, so the serde
//! names and `as_str` forms must stay in sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The research category a query is submitted under. Each category maps to
/// its own system prompt for the AI gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    WebSearch,
    MarketAnalysis,
    JournalSummary,
    /// Ad-hoc scanner submissions (pasted or file-extracted report text).
    MedicalReport,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::WebSearch => "web_search",
            SearchType::MarketAnalysis => "market_analysis",
            SearchType::JournalSummary => "journal_summary",
            SearchType::MedicalReport => "medical_report",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "web_search" => Some(SearchType::WebSearch),
            "market_analysis" => Some(SearchType::MarketAnalysis),
            "journal_summary" => Some(SearchType::JournalSummary),
            "medical_report" => Some(SearchType::MedicalReport),
            _ => None,
        }
    }
}

/// The kind of external information provider a data source describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Regulatory,
    ClinicalTrial,
    Journal,
    Database,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Regulatory => "regulatory",
            SourceType::ClinicalTrial => "clinical_trial",
            SourceType::Journal => "journal",
            SourceType::Database => "database",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regulatory" => Some(SourceType::Regulatory),
            "clinical_trial" => Some(SourceType::ClinicalTrial),
            "journal" => Some(SourceType::Journal),
            "database" => Some(SourceType::Database),
            _ => None,
        }
    }
}

/// Lifecycle of a search query. Transitions `Processing -> Completed` at most
/// once and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Processing,
    Completed,
}

impl QueryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryStatus::Processing => "processing",
            QueryStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(QueryStatus::Processing),
            "completed" => Some(QueryStatus::Completed),
            _ => None,
        }
    }
}

/// A user-registered metadata record describing an external information
/// provider. Never queried programmatically; only its name and type feed the
/// prompt context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSource {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub source_type: SourceType,
    pub url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl DataSource {
    /// The snapshot shape embedded in prompts and report content.
    pub fn to_ref(&self) -> SourceRef {
        SourceRef {
            name: self.name.clone(),
            source_type: self.source_type,
        }
    }
}

/// The `{name, type}` snapshot of a data source, as sent to the
/// summarization endpoint and frozen into `reports.full_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: SourceType,
}

/// A submitted research query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    pub id: String,
    pub owner_id: String,
    pub query_text: String,
    pub search_type: SearchType,
    pub selected_sources: Vec<String>,
    pub status: QueryStatus,
    pub created_at: DateTime<Utc>,
}

/// The structured payload stored in `reports.full_content`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportContent {
    pub ai_response: String,
    pub key_findings: Vec<String>,
    pub search_type: SearchType,
    pub sources_used: Vec<SourceRef>,
}

/// A persisted research report. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub owner_id: String,
    /// None for ad-hoc scanner submissions that bypass query persistence.
    pub query_id: Option<String>,
    pub title: String,
    pub summary: String,
    pub full_content: ReportContent,
    pub created_at: DateTime<Utc>,
}

/// An archive entry: a report joined with its originating query, when any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchivedReport {
    #[serde(flatten)]
    pub report: Report,
    pub query_text: Option<String>,
    pub query_search_type: Option<SearchType>,
    pub query_created_at: Option<DateTime<Utc>>,
}

/// The title/summary/findings triple returned to clients, whether produced
/// by the gateway pipeline or the local fallback summarizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub title: String,
    pub summary: String,
    pub key_findings: Vec<String>,
}
