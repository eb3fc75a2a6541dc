//! # Scan Pipeline
//!
//! The per-document flow: extract text (by file kind), gate out documents
//! that yielded nothing usable, submit to the server, and fall back to the
//! local summarizer on any server failure. Files are processed one at a
//! time; each outcome is surfaced as soon as it exists.

use crate::api_client::ApiClient;
use crate::ocr;
use pharmalens::summarize::simple_summarize;
use pharmalens::types::SummaryResult;
use std::path::Path;
use tracing::{info, warn};

/// Pasted text shorter than this (trimmed) is rejected before any network
/// call.
pub const MIN_TEXT_CHARS: usize = 20;
/// A document whose extraction yields fewer characters than this (trimmed)
/// is reported as unreadable instead of being summarized.
pub const MIN_EXTRACTED_CHARS: usize = 10;
/// The per-file error shown for unreadable documents.
pub const NO_TEXT_ERROR: &str = "No text extracted";

/// The result of scanning one document (or one pasted text).
#[derive(Debug)]
pub struct ScanOutcome {
    pub file_name: String,
    pub result: Option<SummaryResult>,
    pub error: Option<String>,
    /// True when the summary came from the local fallback summarizer.
    pub used_fallback: bool,
}

enum FileKind {
    Pdf,
    Image,
    Other,
}

fn classify(path: &Path) -> FileKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => FileKind::Pdf,
        "png" | "jpg" | "jpeg" | "tif" | "tiff" => FileKind::Image,
        _ => FileKind::Other,
    }
}

/// Extracts text from a file. Every branch is error-wrapped: a failed
/// extraction yields an empty string, which the caller reports as
/// unreadable rather than aborting the batch.
async fn extract_file_text(path: &Path) -> String {
    match classify(path) {
        FileKind::Pdf => match tokio::fs::read(path).await {
            Ok(bytes) => pharmalens_pdf::extract_text(&bytes).unwrap_or_else(|e| {
                warn!("PDF extraction failed for {}: {e}", path.display());
                String::new()
            }),
            Err(e) => {
                warn!("Could not read {}: {e}", path.display());
                String::new()
            }
        },
        FileKind::Image => ocr::extract_text(path).await.unwrap_or_else(|e| {
            warn!("OCR failed for {}: {e}", path.display());
            String::new()
        }),
        FileKind::Other => match tokio::fs::read(path).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!("Could not read {}: {e}", path.display());
                String::new()
            }
        },
    }
}

/// Summarizes via the server, dropping to the local heuristic on any
/// failure. One shot each way; no retries.
async fn summarize_with_fallback(client: &ApiClient, text: &str) -> (SummaryResult, bool) {
    match client.summarize(text).await {
        Ok(result) => (result, false),
        Err(e) => {
            warn!("Server summarization failed, using local summarizer: {e}");
            (simple_summarize(text), true)
        }
    }
}

/// Scans pasted text. Inputs under 20 characters are rejected before any
/// network call is made.
pub async fn scan_text(client: &ApiClient, text: &str) -> anyhow::Result<ScanOutcome> {
    if text.trim().chars().count() < MIN_TEXT_CHARS {
        anyhow::bail!("Please paste a medical report (min {MIN_TEXT_CHARS} chars)");
    }

    let (result, used_fallback) = summarize_with_fallback(client, text).await;
    Ok(ScanOutcome {
        file_name: "pasted-text".to_string(),
        result: Some(result),
        error: None,
        used_fallback,
    })
}

/// Scans files sequentially, invoking `on_result` after each file so the
/// caller can surface progress. Per-file failures never abort the batch.
pub async fn scan_files(
    client: &ApiClient,
    files: &[impl AsRef<Path>],
    mut on_result: impl FnMut(&ScanOutcome),
) -> Vec<ScanOutcome> {
    let mut outcomes = Vec::with_capacity(files.len());

    for file in files {
        let path = file.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        info!("Scanning {file_name}");

        let extracted = extract_file_text(path).await;
        let outcome = if extracted.trim().chars().count() < MIN_EXTRACTED_CHARS {
            ScanOutcome {
                file_name,
                result: None,
                error: Some(NO_TEXT_ERROR.to_string()),
                used_fallback: false,
            }
        } else {
            let (result, used_fallback) = summarize_with_fallback(client, &extracted).await;
            ScanOutcome {
                file_name,
                result: Some(result),
                error: None,
                used_fallback,
            }
        };

        on_result(&outcome);
        outcomes.push(outcome);
    }

    outcomes
}

/// Renders one outcome to stdout.
pub fn print_outcome(outcome: &ScanOutcome) {
    println!("== {} ==", outcome.file_name);
    if let Some(error) = &outcome.error {
        println!("  error: {error}");
        return;
    }
    if let Some(result) = &outcome.result {
        if outcome.used_fallback {
            println!("  (server unavailable, local summary)");
        }
        println!("  {}", result.title);
        println!("  {}", result.summary);
        for finding in &result.key_findings {
            println!("  - {finding}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::{Method, MockServer};
    use pharmalens::summarize::FALLBACK_TITLE;
    use serde_json::json;
    use std::io::Write;

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(server.url(""), None).unwrap()
    }

    fn long_report(sentences: usize) -> String {
        (1..=sentences)
            .map(|i| format!("Observation {i} was recorded during the assessment."))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tokio::test]
    async fn test_short_pasted_text_is_rejected_without_network_call() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path("/api/process-research-query");
            then.status(200).json_body(json!({
                "success": true, "title": "t", "summary": "s",
                "key_findings": [], "report_id": "r",
            }));
        });

        let result = scan_text(&client_for(&server), "too short").await;
        assert!(result.is_err());
        assert_eq!(mock.hits(), 0);
    }

    #[tokio::test]
    async fn test_pasted_text_uses_server_summary_when_available() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/api/process-research-query");
            then.status(200).json_body(json!({
                "success": true,
                "title": "Research Report: Observation 1 was recorded during the assessm...",
                "summary": "A remote summary...",
                "key_findings": ["One finding from the gateway output lines."],
                "report_id": "report-1",
            }));
        });

        let outcome = scan_text(&client_for(&server), &long_report(4))
            .await
            .unwrap();
        assert!(!outcome.used_fallback);
        let result = outcome.result.unwrap();
        assert_eq!(result.summary, "A remote summary...");
        assert_eq!(result.key_findings.len(), 1);
    }

    #[tokio::test]
    async fn test_server_failure_falls_back_to_local_summarizer() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/api/process-research-query");
            then.status(500)
                .json_body(json!({ "success": false, "error": "gateway down" }));
        });

        let outcome = scan_text(&client_for(&server), &long_report(9))
            .await
            .unwrap();
        assert!(outcome.used_fallback);
        let result = outcome.result.unwrap();
        assert_eq!(result.title, FALLBACK_TITLE);
        assert!(!result.summary.is_empty());
        assert_eq!(result.key_findings.len(), 5);
    }

    #[tokio::test]
    async fn test_multi_file_scan_isolates_unreadable_file() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(Method::POST).path("/api/process-research-query");
            then.status(200).json_body(json!({
                "success": true, "title": "Research Report: ...",
                "summary": "Remote summary...",
                "key_findings": [], "report_id": "r",
            }));
        });

        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("report-one.txt");
        std::fs::File::create(&first)
            .unwrap()
            .write_all(long_report(5).as_bytes())
            .unwrap();
        // A PDF in name only: extraction fails and yields no text.
        let second = dir.path().join("broken.pdf");
        std::fs::File::create(&second)
            .unwrap()
            .write_all(b"not a pdf at all")
            .unwrap();
        let third = dir.path().join("report-three.txt");
        std::fs::File::create(&third)
            .unwrap()
            .write_all(long_report(6).as_bytes())
            .unwrap();

        let mut progressive = Vec::new();
        let outcomes = scan_files(
            &client_for(&server),
            &[first, second, third],
            |outcome| progressive.push(outcome.file_name.clone()),
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_some());
        assert_eq!(outcomes[1].error.as_deref(), Some(NO_TEXT_ERROR));
        assert!(outcomes[1].result.is_none());
        assert!(outcomes[2].result.is_some());
        // Results surfaced one at a time, in order.
        assert_eq!(progressive, vec!["report-one.txt", "broken.pdf", "report-three.txt"]);
    }

    #[tokio::test]
    async fn test_real_pdf_flows_through_extraction_and_summary() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(Method::POST).path("/api/process-research-query");
            then.status(200).json_body(json!({
                "success": true, "title": "Research Report: ...",
                "summary": "Remote summary...",
                "key_findings": [], "report_id": "r",
            }));
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("visit.pdf");
        let pdf = pharmalens_test_utils::helpers::generate_test_pdf(
            "Patient presented with stable angina and was started on therapy.",
        )
        .unwrap();
        std::fs::write(&path, pdf).unwrap();

        let outcomes = scan_files(&client_for(&server), &[path], |_| {}).await;
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].error.is_none());
        mock.assert();
    }
}
