//! # pharmalens: Core Library
//!
//! This crate holds everything shared between the `pharmalens-server` binary
//! and the `pharmalens-cli` scanner: the domain types, the prompt
//! construction for each research category, the report slicing rules, the
//! local fallback summarizer, the AI gateway client, and the SQLite storage
//! layer.

pub mod errors;
pub mod prompts;
pub mod providers;
pub mod report;
pub mod store;
pub mod summarize;
pub mod types;

pub use errors::PromptError;
pub use types::{
    DataSource, QueryStatus, Report, ReportContent, SearchQuery, SearchType, SourceRef,
    SourceType, SummaryResult,
};
