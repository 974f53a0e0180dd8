//! Integration tests for the session facade: files, preview and writes.

use lopdf::Document;
use pdfstitch::error::StitchError;
use pdfstitch::io::PdfWriter;
use pdfstitch::merge::MergeOptions;
use pdfstitch::session::StitchSession;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::common::{LETTER, page_markers, pdf_with_pages, write_fixture};

#[tokio::test]
async fn test_files_to_written_output() {
    let temp_dir = TempDir::new().unwrap();
    let first = write_fixture(temp_dir.path(), "first.pdf", &pdf_with_pages("first", 1, LETTER));
    let second = write_fixture(
        temp_dir.path(),
        "second.pdf",
        &pdf_with_pages("second", 2, LETTER),
    );
    let missing = temp_dir.path().join("missing.pdf");

    let mut session = StitchSession::new();
    let report = session.add_files(&[first, missing, second]).await;

    assert_eq!(report.summary_line(), "2 added, 1 failed");
    assert!(matches!(
        report.failures[0].error,
        StitchError::FileNotFound { .. }
    ));

    let output = session.merge_async(MergeOptions::new()).await.unwrap();
    let output_path = temp_dir.path().join(&output.file_name);
    let stats = PdfWriter::new()
        .save_with_stats(output.bytes, &output_path)
        .await
        .unwrap();

    assert_eq!(stats.output_path, output_path);
    let written = Document::load(&output_path).unwrap();
    assert_eq!(
        page_markers(&written),
        ["first page 1", "second page 1", "second page 2"]
    );
}

#[test]
fn test_request_snapshot_survives_queue_changes() {
    let mut session = StitchSession::new();
    session
        .add_document("a.pdf", &pdf_with_pages("a", 1, LETTER))
        .unwrap();
    session
        .add_document("b.pdf", &pdf_with_pages("b", 1, LETTER))
        .unwrap();

    let request = session.request(MergeOptions::new());
    session.clear();

    assert!(session.is_empty());
    assert_eq!(request.len(), 2);
    assert_eq!(request.total_pages(), 2);
}

#[test]
fn test_preview_closes_when_document_is_removed() {
    let mut session = StitchSession::new();
    session
        .add_document("a.pdf", &pdf_with_pages("a", 1, LETTER))
        .unwrap();
    session
        .add_document("b.pdf", &pdf_with_pages("b", 1, LETTER))
        .unwrap();

    assert_eq!(session.preview(1).unwrap().name(), "b.pdf");
    session.move_up(1).unwrap();
    assert_eq!(session.previewed().unwrap().name(), "b.pdf");

    session.remove_at(0).unwrap();
    assert!(session.previewed().is_none());
    assert!(session.preview(3).is_err());
}

#[tokio::test]
async fn test_merge_failure_leaves_queue_intact() {
    let mut session = StitchSession::new();
    session
        .add_document("only.pdf", &pdf_with_pages("only", 1, LETTER))
        .unwrap();

    let err = session.merge_async(MergeOptions::new()).await.unwrap_err();

    assert!(matches!(err, StitchError::InsufficientDocuments { count: 1 }));
    assert_eq!(session.len(), 1);
    assert!(!session.can_merge());
}
