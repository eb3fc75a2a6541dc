//! # Fallback Summarizer
//!
//! A local, non-AI heuristic used by the scanner when the summarization
//! endpoint is unreachable or returns a non-2xx status. It splits the text
//! into sentences on terminal punctuation, takes the first three as the
//! summary and the next five as findings.

use crate::types::SummaryResult;
use regex::Regex;
use std::sync::OnceLock;

/// Fixed title for locally summarized documents.
pub const FALLBACK_TITLE: &str = "Medical Report Summary";

/// Sentences used for the summary.
const SUMMARY_SENTENCES: usize = 3;
/// Sentences 4..=8 become key findings.
const FINDING_SENTENCES: usize = 5;
/// Character fallback when no sentence boundary is found.
const SUMMARY_CHAR_FALLBACK: usize = 200;

fn sentence_boundary() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("sentence boundary regex is valid"))
}

/// Splits text into sentences at terminal punctuation followed by
/// whitespace. The punctuation mark stays with its sentence; a trailing
/// fragment without terminal punctuation is kept as a final sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for boundary in sentence_boundary().find_iter(text) {
        // The matched mark is a single ASCII byte, so +1 is safe.
        let sentence = text[start..boundary.start() + 1].trim();
        if !sentence.is_empty() {
            sentences.push(sentence.to_string());
        }
        start = boundary.end();
    }
    let rest = text[start..].trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

/// Produces a degraded summary without any network call.
///
/// Summary: the first three sentences joined by a space, or the first 200
/// characters when the text has no sentence boundaries. Findings: sentences
/// four through eight, possibly empty.
pub fn simple_summarize(text: &str) -> SummaryResult {
    let sentences = split_sentences(text);
    let summary = sentences
        .iter()
        .take(SUMMARY_SENTENCES)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    let summary = if summary.is_empty() {
        text.chars().take(SUMMARY_CHAR_FALLBACK).collect()
    } else {
        summary
    };
    let key_findings = sentences
        .into_iter()
        .skip(SUMMARY_SENTENCES)
        .take(FINDING_SENTENCES)
        .collect();

    SummaryResult {
        title: FALLBACK_TITLE.to_string(),
        summary,
        key_findings,
    }
}
