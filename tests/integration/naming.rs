//! Integration tests for smart naming through a session.

use chrono::Utc;
use pdfmerge::config::NamingConfig;
use pdfmerge::error::NamingError;
use pdfmerge::io::sanitize_file_name;
use pdfmerge::merge::PdfMerger;
use pdfmerge::naming::SmartNamer;
use pdfmerge::session::{MergeSession, NamingPhase};
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{ScriptedGenerator, input, pdf_with_widths, serve_once};

fn today_fallback() -> String {
    format!("merged_{}.pdf", Utc::now().format("%Y-%m-%d"))
}

fn two_file_session() -> MergeSession {
    let mut session = MergeSession::new();
    session.add_files([
        input("Invoice_Jan.pdf", b"%PDF-1.4".to_vec()),
        input("Invoice_Feb.pdf", b"%PDF-1.4".to_vec()),
    ]);
    session
}

#[tokio::test]
async fn test_gemini_name_applied_to_session() {
    let (endpoint, server) = serve_once(
        200,
        r#"{"candidates":[{"content":{"parts":[{"text":"Invoices_Jan_Feb.pdf\n"}],"role":"model"}}]}"#,
    )
    .await;
    let config = NamingConfig {
        api_key: Some("test-key".to_string()),
        endpoint,
        ..NamingConfig::default()
    };
    let mut session = two_file_session();

    assert!(session.request_smart_name(&SmartNamer::new(&config)).await);

    assert_eq!(session.output_name(), "Invoices_Jan_Feb.pdf");
    assert_eq!(session.naming_phase(), NamingPhase::Done);
    assert_eq!(session.naming_outcome().error(), None);

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent"));
    assert!(request.to_lowercase().contains("x-goog-api-key: test-key"));
    assert!(request.contains("- Invoice_Jan.pdf\\n- Invoice_Feb.pdf"));
}

#[tokio::test]
async fn test_gemini_error_status_falls_back() {
    let (endpoint, server) = serve_once(500, r#"{"error":{"message":"boom"}}"#).await;
    let config = NamingConfig {
        api_key: Some("test-key".to_string()),
        endpoint,
        ..NamingConfig::default()
    };
    let mut session = two_file_session();

    session.request_smart_name(&SmartNamer::new(&config)).await;

    assert_eq!(session.output_name(), today_fallback());
    assert!(session.naming_outcome().error().unwrap().contains("500"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_missing_key_falls_back_without_request() {
    let config = NamingConfig {
        api_key: None,
        endpoint: "http://127.0.0.1:9".to_string(),
        ..NamingConfig::default()
    };
    let mut session = two_file_session();

    session.request_smart_name(&SmartNamer::new(&config)).await;

    assert_eq!(session.output_name(), today_fallback());
    assert_eq!(
        session.naming_outcome().error(),
        Some("API key not configured")
    );
}

#[tokio::test]
async fn test_markdown_wrapped_answer_is_cleaned() {
    let generator = Arc::new(ScriptedGenerator::replying(vec![Ok(
        "```pdf\n\"Quarterly_Report.pdf\"\n```".to_string(),
    )]));
    let namer = SmartNamer::with_generator(generator.clone());
    let mut session = two_file_session();

    session.request_smart_name(&namer).await;

    assert_eq!(session.output_name(), "Quarterly_Report.pdf");
    let prompts = generator.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("- Invoice_Jan.pdf\n- Invoice_Feb.pdf"));
}

#[tokio::test]
async fn test_naming_requests_are_independent() {
    let generator = Arc::new(ScriptedGenerator::replying(vec![
        Ok("First.pdf".to_string()),
        Err(NamingError::EmptyResponse),
    ]));
    let namer = SmartNamer::with_generator(generator);
    let mut session = two_file_session();

    session.request_smart_name(&namer).await;
    assert_eq!(session.output_name(), "First.pdf");

    session.request_smart_name(&namer).await;
    assert_eq!(session.output_name(), today_fallback());
    assert!(session.naming_outcome().error().is_some());
}

#[tokio::test]
async fn test_naming_does_not_touch_merge_state() {
    let generator = Arc::new(ScriptedGenerator::replying(vec![Ok("x.pdf".to_string())]));
    let mut session = two_file_session();

    session.request_smart_name(&SmartNamer::with_generator(generator)).await;

    assert_eq!(session.len(), 2);
    assert!(session.output().is_none());
}

#[tokio::test]
async fn test_empty_list_does_not_call_generator() {
    let generator = Arc::new(ScriptedGenerator::default());
    let mut session = MergeSession::new();

    assert!(!session.request_smart_name(&SmartNamer::with_generator(generator.clone())).await);

    assert!(generator.prompts().is_empty());
    assert_eq!(session.output_name(), "merged_document.pdf");
}

#[tokio::test]
async fn test_suggestion_with_separators_is_saved_under_sanitized_name() {
    let generator = Arc::new(ScriptedGenerator::replying(vec![Ok(
        "Q1/Q2_Report.pdf".to_string(),
    )]));
    let dir = TempDir::new().unwrap();
    let mut session = MergeSession::new();
    session.add_files([input("q1.pdf", pdf_with_widths(&[1]))]);

    session.request_smart_name(&SmartNamer::with_generator(generator)).await;
    assert_eq!(session.output_name(), "Q1/Q2_Report.pdf");

    let name = sanitize_file_name(session.output_name()).unwrap();
    session.set_output_name(name);
    session.request_merge(&PdfMerger::new()).await;

    let stats = session
        .output()
        .unwrap()
        .save_to_dir(dir.path(), session.output_name())
        .await
        .unwrap();
    assert_eq!(stats.output_path, dir.path().join("Q1_Q2_Report.pdf"));
}
