//! End-to-end tests driving a session with the real merge service.

use pdfmerge::io::{DroppedItem, InputFile, filter_dropped};
use pdfmerge::merge::PdfMerger;
use pdfmerge::output::BlobStore;
use pdfmerge::session::{MergePhase, MergeSession};
use tempfile::TempDir;

use crate::common::{input, page_widths, pdf_with_widths};

fn abc_session() -> MergeSession {
    let mut session = MergeSession::new();
    session.add_files([
        input("A.pdf", pdf_with_widths(&[101, 102])),
        input("B.pdf", pdf_with_widths(&[201])),
        input("C.pdf", pdf_with_widths(&[301, 302, 303])),
    ]);
    session
}

#[tokio::test]
async fn test_merge_remove_and_remerge() {
    let merger = PdfMerger::new();
    let mut session = abc_session();
    let store = session.store().clone();

    assert!(session.request_merge(&merger).await);
    assert_eq!(session.merge_phase(), MergePhase::Ready);
    let first_url = session.output().unwrap().url().to_string();
    assert_eq!(
        page_widths(session.output().unwrap().bytes()),
        [101, 102, 201, 301, 302, 303]
    );

    let b = session.entries()[1].id().clone();
    assert!(session.remove_entry(&b));
    assert_eq!(session.merge_phase(), MergePhase::Idle);
    assert!(session.output().is_none());
    assert!(store.get(&first_url).is_none());

    session.request_merge(&merger).await;
    assert_eq!(
        page_widths(session.output().unwrap().bytes()),
        [101, 102, 301, 302, 303]
    );
    assert_eq!(store.published_count(), 2);
    assert_eq!(store.revoked_count(), 1);
}

#[tokio::test]
async fn test_reorder_changes_page_order() {
    let merger = PdfMerger::new();
    let mut session = abc_session();

    session.request_merge(&merger).await;
    assert!(session.move_up(2));
    assert!(session.output().is_none());

    session.request_merge(&merger).await;
    assert_eq!(
        page_widths(session.output().unwrap().bytes()),
        [101, 102, 301, 302, 303, 201]
    );
}

#[tokio::test]
async fn test_remerge_without_changes_is_equivalent() {
    let merger = PdfMerger::new();
    let mut session = abc_session();

    session.request_merge(&merger).await;
    let first = page_widths(session.output().unwrap().bytes());
    session.request_merge(&merger).await;
    let second = page_widths(session.output().unwrap().bytes());

    assert_eq!(first, second);
    assert_eq!(session.store().live_count(), 1);
}

#[tokio::test]
async fn test_boundary_moves_leave_output_alone() {
    let merger = PdfMerger::new();
    let mut session = abc_session();
    session.request_merge(&merger).await;

    assert!(!session.move_up(0));
    assert!(!session.move_down(2));

    assert_eq!(session.merge_phase(), MergePhase::Ready);
    assert_eq!(session.store().revoked_count(), 0);
}

#[tokio::test]
async fn test_edit_during_merge_discards_result() {
    let merger = PdfMerger::new();
    let mut session = abc_session();
    let store = session.store().clone();

    let ticket = session.begin_merge().unwrap();
    assert_eq!(ticket.blobs().len(), 3);
    session.add_files([input("D.pdf", pdf_with_widths(&[401]))]);

    let completion = ticket.run(&merger).await;
    assert!(!session.finish_merge(completion));
    assert_eq!(session.merge_phase(), MergePhase::Idle);
    assert_eq!(store.published_count(), 0);

    session.request_merge(&merger).await;
    assert_eq!(page_widths(session.output().unwrap().bytes()).len(), 7);
}

#[tokio::test]
async fn test_reset_releases_output() {
    let mut session = abc_session();
    let store = session.store().clone();
    session.request_merge(&PdfMerger::new()).await;
    session.set_output_name("custom.pdf");

    session.reset();

    assert!(session.is_empty());
    assert_eq!(session.merge_phase(), MergePhase::Idle);
    assert_eq!(session.output_name(), "merged_document.pdf");
    assert_eq!(store.live_count(), 0);
    assert_eq!(store.revoked_count(), 1);
}

#[tokio::test]
async fn test_dropping_session_releases_output() {
    let store = BlobStore::new();
    {
        let mut session = abc_session().with_store(store.clone());
        session.request_merge(&PdfMerger::new()).await;
        assert_eq!(store.live_count(), 1);
    }
    assert_eq!(store.live_count(), 0);
}

#[tokio::test]
async fn test_dropped_items_are_filtered_before_adding() {
    let dropped = vec![
        DroppedItem {
            file: input("scan.PDF", pdf_with_widths(&[1])),
            mime_type: None,
        },
        DroppedItem {
            file: InputFile::new("notes.txt", b"hello".to_vec()),
            mime_type: Some("text/plain".to_string()),
        },
        DroppedItem {
            file: input("export", pdf_with_widths(&[2])),
            mime_type: Some("application/pdf".to_string()),
        },
    ];

    let mut session = MergeSession::new();
    let ids = session.add_files(filter_dropped(dropped));

    assert_eq!(ids.len(), 2);
    session.request_merge(&PdfMerger::new()).await;
    assert_eq!(page_widths(session.output().unwrap().bytes()), [1, 2]);
}

#[tokio::test]
async fn test_save_output_under_chosen_name() {
    let dir = TempDir::new().unwrap();
    let mut session = abc_session();
    session.set_output_name("bundle.pdf");
    session.request_merge(&PdfMerger::new()).await;

    let stats = session
        .output()
        .unwrap()
        .save_to_dir(dir.path(), session.output_name())
        .await
        .unwrap();

    assert_eq!(stats.output_path, dir.path().join("bundle.pdf"));
    let saved = std::fs::read(dir.path().join("bundle.pdf")).unwrap();
    assert_eq!(page_widths(&saved).len(), 6);
}

#[test]
fn test_total_size() {
    let mut session = MergeSession::new();
    session.add_files([
        InputFile::new("a.pdf", vec![0u8; 1024]),
        InputFile::new("b.pdf", vec![0u8; 512]),
    ]);

    assert_eq!(session.total_size(), 1536);
    assert_eq!(session.format_total_size(), "1.5 KB");
}
