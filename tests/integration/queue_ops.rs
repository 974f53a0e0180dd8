//! Integration tests for queue loading and reordering.

use pdfstitch::error::StitchError;
use pdfstitch::session::StitchSession;
use pretty_assertions::assert_eq;

use crate::common::{LETTER, pdf_with_pages, pdf_without_pages};

fn names(session: &StitchSession) -> Vec<String> {
    session.queue().iter().map(|r| r.name().to_string()).collect()
}

fn session_with(docs: &[(&str, usize)]) -> StitchSession {
    let mut session = StitchSession::new();
    for (name, pages) in docs {
        session
            .add_document(name, &pdf_with_pages(name, *pages, LETTER))
            .unwrap();
    }
    session
}

#[test]
fn test_stats_track_every_mutation() {
    let mut session = session_with(&[("a.pdf", 3), ("b.pdf", 5), ("c.pdf", 2)]);

    let stats = session.stats();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.total_pages, 10);
    let total: u64 = session.queue().iter().map(|r| r.byte_size()).sum();
    assert_eq!(stats.total_size_bytes, total);

    session.remove_at(1).unwrap();
    assert_eq!(session.stats().count, 2);
    assert_eq!(session.stats().total_pages, 5);

    session.clear();
    let stats = session.stats();
    assert_eq!((stats.count, stats.total_pages, stats.total_size_bytes), (0, 0, 0));
}

#[test]
fn test_move_up_and_down_at_edges_are_noops() {
    let mut session = session_with(&[("a.pdf", 1), ("b.pdf", 1), ("c.pdf", 1)]);

    assert!(!session.move_up(0).unwrap());
    assert!(!session.move_down(2).unwrap());
    assert_eq!(names(&session), ["a.pdf", "b.pdf", "c.pdf"]);

    assert!(session.move_up(2).unwrap());
    assert_eq!(names(&session), ["a.pdf", "c.pdf", "b.pdf"]);

    assert!(session.move_down(0).unwrap());
    assert_eq!(names(&session), ["c.pdf", "a.pdf", "b.pdf"]);
}

#[test]
fn test_move_to_index_uses_splice_semantics() {
    let mut session = session_with(&[("a.pdf", 1), ("b.pdf", 1), ("c.pdf", 1)]);

    session.move_to_index(0, 2).unwrap();
    assert_eq!(names(&session), ["b.pdf", "c.pdf", "a.pdf"]);

    session.move_to_index(2, 0).unwrap();
    assert_eq!(names(&session), ["a.pdf", "b.pdf", "c.pdf"]);

    assert!(!session.move_to_index(1, 1).unwrap());
}

#[test]
fn test_out_of_range_indices_leave_queue_untouched() {
    let mut session = session_with(&[("a.pdf", 1), ("b.pdf", 1)]);

    assert!(matches!(
        session.remove_at(5),
        Err(StitchError::IndexOutOfRange { index: 5, len: 2 })
    ));
    assert!(session.move_to_index(0, 2).is_err());
    assert!(session.move_to_index(2, 0).is_err());
    assert!(session.move_up(2).is_err());
    assert_eq!(names(&session), ["a.pdf", "b.pdf"]);
}

#[tokio::test]
async fn test_batch_load_reports_failures_and_keeps_order() {
    let mut session = StitchSession::new().with_workers(2);

    let report = session
        .add_documents(vec![
            ("one.pdf".to_string(), pdf_with_pages("one", 2, LETTER)),
            ("junk.pdf".to_string(), b"not a pdf at all".to_vec()),
            ("two.pdf".to_string(), pdf_with_pages("two", 1, LETTER)),
            ("blank.pdf".to_string(), pdf_without_pages()),
        ])
        .await;

    assert_eq!(report.summary_line(), "2 added, 2 failed");
    assert_eq!(names(&session), ["one.pdf", "two.pdf"]);

    let failed: Vec<&str> = report.failures.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(failed, ["junk.pdf", "blank.pdf"]);
    assert!(matches!(
        report.failures[1].error,
        StitchError::EmptyDocument { .. }
    ));
}

#[tokio::test]
async fn test_batch_appends_after_existing_documents() {
    let mut session = session_with(&[("first.pdf", 1)]);

    session
        .add_documents(vec![
            ("second.pdf".to_string(), pdf_with_pages("second", 1, LETTER)),
            ("third.pdf".to_string(), pdf_with_pages("third", 1, LETTER)),
        ])
        .await;

    assert_eq!(names(&session), ["first.pdf", "second.pdf", "third.pdf"]);
}
