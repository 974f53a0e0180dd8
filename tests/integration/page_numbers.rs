//! Integration tests for "k / total" page labels.

use lopdf::Document;
use pdfstitch::config::PageNumberAnchor;
use pdfstitch::merge::MergeOptions;
use pdfstitch::session::StitchSession;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::{LETTER, page_labels, page_markers, pdf_with_pages};

fn five_page_session() -> StitchSession {
    let mut session = StitchSession::new();
    session
        .add_document("a.pdf", &pdf_with_pages("a", 2, LETTER))
        .unwrap();
    session
        .add_document("b.pdf", &pdf_with_pages("b", 3, LETTER))
        .unwrap();
    session
}

#[rstest]
#[case(PageNumberAnchor::BottomCenter)]
#[case(PageNumberAnchor::TopCenter)]
#[case(PageNumberAnchor::BottomRight)]
fn test_labels_cover_every_page(#[case] anchor: PageNumberAnchor) {
    let session = five_page_session();

    let output = session
        .merge(MergeOptions::new().with_page_numbers(anchor))
        .unwrap();
    let doc = Document::load_mem(&output.bytes).unwrap();

    assert!(output.statistics.page_numbers);
    assert_eq!(
        page_labels(&doc),
        ["1 / 5", "2 / 5", "3 / 5", "4 / 5", "5 / 5"]
    );
    assert_eq!(
        page_markers(&doc),
        ["a page 1", "a page 2", "b page 1", "b page 2", "b page 3"]
    );
}

#[test]
fn test_no_labels_without_numbering() {
    let session = five_page_session();

    let output = session.merge(MergeOptions::new()).unwrap();
    let doc = Document::load_mem(&output.bytes).unwrap();

    assert!(!output.statistics.page_numbers);
    assert!(page_labels(&doc).is_empty());
}

#[test]
fn test_labels_follow_reordered_queue() {
    let mut session = five_page_session();
    session.move_down(0).unwrap();

    let output = session
        .merge(MergeOptions::new().with_page_numbers(PageNumberAnchor::BottomCenter))
        .unwrap();
    let doc = Document::load_mem(&output.bytes).unwrap();

    let markers = page_markers(&doc);
    let labels = page_labels(&doc);
    assert_eq!(markers[0], "b page 1");
    assert_eq!(labels[0], "1 / 5");
    assert_eq!(markers[4], "a page 2");
    assert_eq!(labels[4], "5 / 5");
}
