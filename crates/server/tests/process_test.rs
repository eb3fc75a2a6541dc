//! # Summarization Endpoint Tests
//!
//! Integration tests for `POST /api/process-research-query`: the slicing
//! contract, guest ownership of ad-hoc reports, the query status flip, and
//! the flat 500 error shape on gateway failure.

mod common;

use anyhow::Result;
use common::{generate_jwt, mock_gateway_completion, user_id_for, TestApp};
use core_access::guest_user_id;
use httpmock::Method;
use pharmalens::{store, types::SearchType};
use serde_json::json;

const AI_CONTENT: &str = "The cardiology review surfaced several important signals.\n\
short\n\
Two novel anticoagulants received accelerated approval this quarter.\n\
Label expansions were granted for three existing therapies.\n\
ok\n\
Post-market surveillance flagged no new safety concerns.";

#[tokio::test]
async fn test_ad_hoc_submission_creates_guest_report() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(mock_gateway_completion(AI_CONTENT));
    });

    let query_text = "Patient presented with chest pain and elevated troponin levels over 48 hours";
    let response = app
        .client
        .post(format!("{}/api/process-research-query", app.address))
        .json(&json!({
            "query_id": null,
            "query_text": query_text,
            "search_type": "medical_report",
            "sources": [],
        }))
        .send()
        .await?;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], true);

    // Title: prefix + exactly 50 chars of the query + ellipsis.
    let expected_prefix: String = query_text.chars().take(50).collect();
    assert_eq!(
        body["title"].as_str().unwrap(),
        format!("Research Report: {expected_prefix}...")
    );
    // Summary: first 200 chars of the model output + ellipsis.
    let summary = body["summary"].as_str().unwrap();
    assert!(summary.ends_with("..."));
    assert_eq!(summary.chars().count(), 200 + 3);
    // Findings: only the four lines longer than 20 chars survive.
    let findings = body["key_findings"].as_array().unwrap();
    assert_eq!(findings.len(), 4);
    assert!(findings
        .iter()
        .all(|f| f.as_str().unwrap().trim().chars().count() > 20));

    // One report row, guest-owned, with no query reference.
    let db = app.db().await?;
    let reports = store::list_reports(&db, &guest_user_id()).await?;
    assert_eq!(reports.len(), 1);
    assert!(reports[0].report.query_id.is_none());
    assert_eq!(reports[0].report.id, body["report_id"].as_str().unwrap());
    assert_eq!(reports[0].report.full_content.ai_response, AI_CONTENT);

    Ok(())
}

#[tokio::test]
async fn test_query_referencing_submission_flips_status() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(mock_gateway_completion(AI_CONTENT));
    });

    let sub = "process-owner@example.com";
    let owner_id = user_id_for(sub);
    let token = generate_jwt(sub)?;

    // Pre-create the query row the way the search flow would.
    let db = app.db().await?;
    let query = store::insert_search_query(
        &db,
        &owner_id,
        "Latest FDA approvals for cardiovascular drugs",
        SearchType::WebSearch,
        &[],
    )
    .await?;

    let response = app
        .client
        .post(format!("{}/api/process-research-query", app.address))
        .bearer_auth(token)
        .json(&json!({
            "query_id": query.id,
            "query_text": "Latest FDA approvals for cardiovascular drugs",
            "search_type": "web_search",
            "sources": [],
        }))
        .send()
        .await?;
    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await?;
    // 45-char query: no ellipsis.
    assert_eq!(
        body["title"].as_str().unwrap(),
        "Research Report: Latest FDA approvals for cardiovascular drugs"
    );

    let fetched = store::get_search_query(&db, &query.id).await?.unwrap();
    assert_eq!(fetched.status, pharmalens::types::QueryStatus::Completed);

    let reports = store::list_reports(&db, &owner_id).await?;
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].report.query_id.as_deref(), Some(query.id.as_str()));
    assert_eq!(
        reports[0].query_text.as_deref(),
        Some("Latest FDA approvals for cardiovascular drugs")
    );

    Ok(())
}

#[tokio::test]
async fn test_unknown_query_id_returns_flat_error() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(200)
            .json_body(mock_gateway_completion(AI_CONTENT));
    });

    let response = app
        .client
        .post(format!("{}/api/process-research-query", app.address))
        .json(&json!({
            "query_id": "no-such-query",
            "query_text": "anything at all",
            "search_type": "web_search",
            "sources": [],
        }))
        .send()
        .await?;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Search query not found");
    assert_eq!(app.count_rows("reports").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_gateway_failure_returns_flat_error_and_writes_nothing() -> Result<()> {
    let app = TestApp::spawn().await?;
    app.mock_server.mock(|when, then| {
        when.method(Method::POST).path("/v1/chat/completions");
        then.status(503).body("upstream overloaded");
    });

    let response = app
        .client
        .post(format!("{}/api/process-research-query", app.address))
        .json(&json!({
            "query_id": null,
            "query_text": "A medical report that will not get summarized remotely.",
            "search_type": "medical_report",
            "sources": [],
        }))
        .send()
        .await?;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("AI gateway returned an error"));
    assert_eq!(app.count_rows("reports").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_sources_reach_the_prompt_and_the_snapshot() -> Result<()> {
    let app = TestApp::spawn().await?;
    let gateway_mock = app.mock_server.mock(|when, then| {
        when.method(Method::POST)
            .path("/v1/chat/completions")
            .body_contains("Available data sources: FDA Database (regulatory)");
        then.status(200)
            .json_body(mock_gateway_completion(AI_CONTENT));
    });

    let response = app
        .client
        .post(format!("{}/api/process-research-query", app.address))
        .json(&json!({
            "query_id": null,
            "query_text": "Summarize recent approvals against our registered sources.",
            "search_type": "web_search",
            "sources": [{ "name": "FDA Database", "type": "regulatory" }],
        }))
        .send()
        .await?;

    assert!(response.status().is_success());
    gateway_mock.assert();

    let db = app.db().await?;
    let reports = store::list_reports(&db, &guest_user_id()).await?;
    assert_eq!(reports[0].report.full_content.sources_used.len(), 1);
    assert_eq!(
        reports[0].report.full_content.sources_used[0].name,
        "FDA Database"
    );

    Ok(())
}
