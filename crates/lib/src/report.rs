//! # Report Slicing
//!
//! Derives the `title` / `summary` / `key_findings` triple from the raw
//! gateway output. This is deliberate character-level truncation, not
//! semantic parsing: the model output is treated as opaque text, and the
//! slicing rules below are the contract.

use crate::types::SummaryResult;

/// Prefix applied to every generated report title.
pub const REPORT_TITLE_PREFIX: &str = "Research Report: ";

/// How many characters of the query text make it into the title.
const TITLE_QUERY_CHARS: usize = 50;
/// How many characters of the model output make it into the summary.
const SUMMARY_CHARS: usize = 200;
/// A line must exceed this many characters (trimmed) to count as a finding.
const FINDING_MIN_CHARS: usize = 20;
/// At most this many findings are kept.
const FINDINGS_CAP: usize = 5;

/// Builds the report title from the originating query text.
///
/// Queries longer than 50 characters are truncated to exactly 50 characters
/// and suffixed with `...`; shorter queries carry no ellipsis.
pub fn report_title(query_text: &str) -> String {
    let truncated: String = query_text.chars().take(TITLE_QUERY_CHARS).collect();
    let ellipsis = if query_text.chars().count() > TITLE_QUERY_CHARS {
        "..."
    } else {
        ""
    };
    format!("{REPORT_TITLE_PREFIX}{truncated}{ellipsis}")
}

/// Builds the report summary: the first 200 characters of the model output,
/// always suffixed with `...`.
pub fn report_summary(ai_content: &str) -> String {
    let head: String = ai_content.chars().take(SUMMARY_CHARS).collect();
    format!("{head}...")
}

/// Extracts key findings: the output's lines whose trimmed length exceeds
/// 20 characters, capped at 5. Lines are kept verbatim (untrimmed).
pub fn key_findings(ai_content: &str) -> Vec<String> {
    ai_content
        .lines()
        .filter(|line| line.trim().chars().count() > FINDING_MIN_CHARS)
        .take(FINDINGS_CAP)
        .map(|line| line.to_string())
        .collect()
}

/// Composes the full triple from a query and the raw gateway output.
pub fn compose_summary(query_text: &str, ai_content: &str) -> SummaryResult {
    SummaryResult {
        title: report_title(query_text),
        summary: report_summary(ai_content),
        key_findings: key_findings(ai_content),
    }
}
