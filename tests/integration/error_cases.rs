//! Integration tests for error handling and edge cases.

use pdfmerge::error::{InputError, MergeError, MergeFailure, OutputError};
use pdfmerge::io::{Blob, read_inputs};
use pdfmerge::merge::{MergeService, PdfMerger};
use pdfmerge::output::BlobStore;
use pdfmerge::session::{MergePhase, MergeSession};
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{input, pdf_with_widths};

const FAILURE_MESSAGE: &str = "Failed to merge the PDF files. Make sure none of them are damaged.";

#[tokio::test]
async fn test_corrupt_input_fails_whole_merge() {
    let blobs = vec![
        Blob::from(pdf_with_widths(&[1])),
        Blob::from(b"this is not a pdf".to_vec()),
        Blob::from(pdf_with_widths(&[2])),
    ];

    let err = PdfMerger::new().merge(blobs).await.unwrap_err();

    assert_eq!(err.to_string(), FAILURE_MESSAGE);
    assert!(matches!(
        err.cause(),
        Some(MergeFailure::Load { position: 1, .. })
    ));
}

#[tokio::test]
async fn test_empty_input_is_rejected() {
    let err = PdfMerger::new().merge(Vec::new()).await.unwrap_err();
    assert!(matches!(err, MergeError::EmptyInput));
}

#[tokio::test]
async fn test_failed_merge_keeps_list_and_allows_retry() {
    let merger = PdfMerger::new();
    let mut session = MergeSession::new();
    let ids = session.add_files([
        input("good.pdf", pdf_with_widths(&[1])),
        input("bad.pdf", b"%PDF-1.4 truncated".to_vec()),
    ]);

    session.request_merge(&merger).await;

    assert_eq!(session.merge_phase(), MergePhase::Failed);
    assert_eq!(session.merge_outcome().error_message(), Some(FAILURE_MESSAGE));
    assert_eq!(session.len(), 2);
    assert_eq!(session.store().published_count(), 0);

    session.remove_entry(&ids[1]);
    assert_eq!(session.merge_phase(), MergePhase::Idle);

    session.request_merge(&merger).await;
    assert_eq!(session.merge_phase(), MergePhase::Ready);
}

#[tokio::test]
async fn test_missing_input_file() {
    let err = read_inputs(&[PathBuf::from("/nonexistent/file.pdf")])
        .await
        .unwrap_err();

    match err {
        InputError::FailedToRead { path, .. } => {
            assert_eq!(path, PathBuf::from("/nonexistent/file.pdf"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_save_rejects_path_like_names() {
    let dir = TempDir::new().unwrap();
    let store = BlobStore::new();
    let handle = store.publish(pdf_with_widths(&[1]));

    for name in ["", "..", "../escape.pdf", "sub/dir.pdf"] {
        let err = handle.save_to_dir(dir.path(), name).await.unwrap_err();
        assert!(
            matches!(err, OutputError::InvalidName { .. }),
            "name {name:?} gave {err:?}"
        );
    }
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_save_into_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let store = BlobStore::new();
    let handle = store.publish(pdf_with_widths(&[1]));

    let err = handle
        .save_to_dir(&dir.path().join("missing"), "out.pdf")
        .await
        .unwrap_err();

    assert!(matches!(err, OutputError::FailedToWrite { .. }));
}
