//! # Research Prompts
//!
//! This module contains the hardcoded system prompts for each research
//! category, plus the assembly of the data-source context appended to them.
//! The user's query text is always sent verbatim as the user message.

use crate::types::{SearchType, SourceRef};

// --- Web Search ---
pub const WEB_SEARCH_SYSTEM_PROMPT: &str = r#"You are a research assistant specializing in regulatory and clinical trial information.
Analyze the user's query and provide comprehensive findings from regulatory websites and clinical trial databases.
Format your response with clear structure: title, summary, and key findings."#;

// --- Market Analysis ---
pub const MARKET_ANALYSIS_SYSTEM_PROMPT: &str = r#"You are a market analysis expert specializing in pharmaceutical and medical device markets.
Analyze trends, competitive landscape, and market opportunities based on the user's query.
Provide actionable insights with data-driven conclusions."#;

// --- Journal Summary ---
pub const JOURNAL_SUMMARY_SYSTEM_PROMPT: &str = r#"You are a scientific literature analyst specializing in medical and pharmaceutical research.
Summarize key findings, methodologies, and conclusions from relevant scientific journals.
Highlight clinical significance and implications for practice."#;

// --- Medical Report (scanner submissions) ---
pub const MEDICAL_REPORT_SYSTEM_PROMPT: &str = r#"You are a clinical documentation analyst.
Summarize the provided medical report text in research style: give a concise summary of the document followed by the key findings, each on its own line.
Do not speculate beyond what the document states."#;

/// Returns the fixed instruction string for a research category.
pub fn system_prompt_for(search_type: SearchType) -> &'static str {
    match search_type {
        SearchType::WebSearch => WEB_SEARCH_SYSTEM_PROMPT,
        SearchType::MarketAnalysis => MARKET_ANALYSIS_SYSTEM_PROMPT,
        SearchType::JournalSummary => JOURNAL_SUMMARY_SYSTEM_PROMPT,
        SearchType::MedicalReport => MEDICAL_REPORT_SYSTEM_PROMPT,
    }
}

/// Builds the full system prompt: the category instruction plus, when any
/// sources are connected, a comma-joined `name (type)` context line.
pub fn build_system_prompt(search_type: SearchType, sources: &[SourceRef]) -> String {
    let base = system_prompt_for(search_type);
    if sources.is_empty() {
        return base.to_string();
    }
    let listing = sources
        .iter()
        .map(|s| format!("{} ({})", s.name, s.source_type.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{base}\n\nAvailable data sources: {listing}")
}
