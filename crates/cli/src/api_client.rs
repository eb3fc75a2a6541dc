//! # API Client
//!
//! A thin client for the server's summarization endpoint. Any failure
//! (connection refused, non-2xx status, malformed body) comes back as an
//! error the scanner turns into a local-fallback summarization.

use anyhow::{bail, Result};
use pharmalens::types::SummaryResult;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

/// The subset of the summarization response the scanner consumes.
#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    title: String,
    summary: String,
    #[serde(default)]
    key_findings: Vec<String>,
}

/// The client for making API calls to the `pharmalens-server`.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    pub fn new(base_url: String, token: Option<String>) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url,
            token,
        })
    }

    /// Submits document text to the summarization endpoint.
    ///
    /// Scanner submissions carry no query id and the `medical_report`
    /// category; the server persists the resulting report under the
    /// caller's identity (guest when no token is configured).
    pub async fn summarize(&self, text: &str) -> Result<SummaryResult> {
        let url = format!("{}/api/process-research-query", self.base_url);
        info!("Submitting {} chars for summarization", text.chars().count());

        let payload = json!({
            "query_id": null,
            "query_text": text,
            "search_type": "medical_report",
            "sources": [],
        });

        let mut request_builder = self.client.post(&url).json(&payload);
        if let Some(token) = &self.token {
            request_builder = request_builder.bearer_auth(token);
        }

        let response = request_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            bail!("Server responded with {status}: {error_text}");
        }

        let body: SummarizeResponse = response.json().await?;
        Ok(SummaryResult {
            title: body.title,
            summary: body.summary,
            key_findings: body.key_findings,
        })
    }
}
