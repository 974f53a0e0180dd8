//! Integration tests for stitching pages in queue order.

use lopdf::Document;
use pdfstitch::config::CompressionLevel;
use pdfstitch::error::StitchError;
use pdfstitch::merge::{MergeOptions, MergeRequest, Merger};
use pdfstitch::session::StitchSession;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{A4, LETTER, page_markers, page_sizes, pdf_with_pages};

fn reload(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("merged output parses")
}

#[test]
fn test_reordered_queue_controls_page_order() {
    let mut session = StitchSession::new();
    session
        .add_document("a.pdf", &pdf_with_pages("a", 2, LETTER))
        .unwrap();
    session
        .add_document("b.pdf", &pdf_with_pages("b", 1, LETTER))
        .unwrap();
    session.move_up(1).unwrap();

    let output = session.merge(MergeOptions::new()).unwrap();
    let doc = reload(&output.bytes);

    assert_eq!(output.statistics.documents_merged, 2);
    assert_eq!(output.statistics.total_pages, 3);
    assert_eq!(page_markers(&doc), ["b page 1", "a page 1", "a page 2"]);
}

#[test]
fn test_mixed_page_sizes_are_preserved() {
    let mut session = StitchSession::new();
    session
        .add_document("letter.pdf", &pdf_with_pages("letter", 1, LETTER))
        .unwrap();
    session
        .add_document("a4.pdf", &pdf_with_pages("a4", 2, A4))
        .unwrap();

    let output = session.merge(MergeOptions::new()).unwrap();
    let doc = reload(&output.bytes);

    assert_eq!(page_sizes(&doc), [LETTER, A4, A4]);
}

#[test]
fn test_output_name_pattern() {
    let mut session = StitchSession::new();
    for name in ["x.pdf", "y.pdf"] {
        session
            .add_document(name, &pdf_with_pages(name, 1, LETTER))
            .unwrap();
    }

    let output = session.merge(MergeOptions::new()).unwrap();
    let name = output.file_name;

    assert!(name.starts_with("merged_"), "{name}");
    assert!(name.ends_with(".pdf"), "{name}");
    let middle = &name["merged_".len()..name.len() - ".pdf".len()];
    let (date, token) = middle.split_once('_').unwrap();
    assert_eq!(date.len(), "2024-05-17".len());
    assert!(token.chars().all(|c| c.is_ascii_digit()));
}

#[rstest]
#[case(0)]
#[case(1)]
fn test_fewer_than_two_documents_is_rejected(#[case] count: usize) {
    let mut session = StitchSession::new();
    for i in 0..count {
        session
            .add_document(&format!("{i}.pdf"), &pdf_with_pages("solo", 1, LETTER))
            .unwrap();
    }

    let err = session.merge(MergeOptions::new()).unwrap_err();
    assert!(matches!(err, StitchError::InsufficientDocuments { count: c } if c == count));
}

#[rstest]
#[case(CompressionLevel::None)]
#[case(CompressionLevel::Medium)]
#[case(CompressionLevel::High)]
fn test_every_compression_level_yields_readable_output(#[case] level: CompressionLevel) {
    let mut session = StitchSession::new();
    session
        .add_document("a.pdf", &pdf_with_pages("a", 2, LETTER))
        .unwrap();
    session
        .add_document("b.pdf", &pdf_with_pages("b", 2, LETTER))
        .unwrap();

    let output = session
        .merge(MergeOptions::new().with_compression(level))
        .unwrap();
    let doc = reload(&output.bytes);

    assert_eq!(output.statistics.compression, level);
    assert_eq!(output.statistics.output_size, output.bytes.len() as u64);
    assert_eq!(
        page_markers(&doc),
        ["a page 1", "a page 2", "b page 1", "b page 2"]
    );
}

#[test]
fn test_same_document_can_be_queued_twice() {
    let bytes = pdf_with_pages("twice", 1, LETTER);
    let mut session = StitchSession::new();
    session.add_document("twice.pdf", &bytes).unwrap();
    session.add_document("twice.pdf", &bytes).unwrap();

    let request = MergeRequest::from_queue(session.queue(), MergeOptions::new());
    let output = Merger::new().merge(&request).unwrap();

    assert_eq!(
        page_markers(&reload(&output.bytes)),
        ["twice page 1", "twice page 1"]
    );
}
