//! Shared helpers for pdfstitch integration tests.
//!
//! Fixtures are generated in memory with lopdf, so the tests need no
//! binary files on disk.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// US Letter in points.
pub const LETTER: (f32, f32) = (612.0, 792.0);

/// ISO A4 in points.
pub const A4: (f32, f32) = (595.0, 842.0);

/// Build a PDF with `pages` pages of `size`, where page `i` shows the
/// text `"{label} page {i}"`.
pub fn pdf_with_pages(label: &str, pages: usize, size: (f32, f32)) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for i in 1..=pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 18.into()]),
                Operation::new("Td", vec![72.into(), 400.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("{label} page {i}"))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), size.0.into(), size.1.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save fixture");
    bytes
}

/// A syntactically valid PDF whose page tree is empty.
pub fn pdf_without_pages() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("save fixture");
    bytes
}

/// Write `bytes` to `dir/name` and return the path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

fn shown_strings(doc: &Document) -> Vec<Vec<String>> {
    doc.get_pages()
        .values()
        .map(|page_id| {
            let bytes = doc.get_page_content(*page_id).expect("page content");
            Content::decode(&bytes)
                .expect("decode content")
                .operations
                .into_iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| {
                    op.operands
                        .first()
                        .and_then(|o| o.as_str().ok())
                        .map(|s| String::from_utf8_lossy(s).into_owned())
                })
                .collect()
        })
        .collect()
}

/// Fixture text ("a page 1") of each output page, in page order.
pub fn page_markers(doc: &Document) -> Vec<String> {
    shown_strings(doc)
        .into_iter()
        .filter_map(|strings| strings.into_iter().find(|s| s.contains(" page ")))
        .collect()
}

/// Page-number labels ("1 / 5") of each output page, in page order.
pub fn page_labels(doc: &Document) -> Vec<String> {
    shown_strings(doc)
        .into_iter()
        .filter_map(|strings| strings.into_iter().find(|s| s.contains(" / ")))
        .collect()
}

/// Width and height of every page, following inherited MediaBoxes.
pub fn page_sizes(doc: &Document) -> Vec<(f32, f32)> {
    doc.get_pages()
        .values()
        .map(|page_id| {
            let mut node = doc.get_dictionary(*page_id).expect("page dictionary");
            loop {
                if let Ok(media_box) = node.get(b"MediaBox") {
                    let values: Vec<f32> = doc
                        .dereference(media_box)
                        .expect("media box")
                        .1
                        .as_array()
                        .expect("media box array")
                        .iter()
                        .map(|v| v.as_float().expect("number"))
                        .collect();
                    return (values[2] - values[0], values[3] - values[1]);
                }
                let parent = node
                    .get(b"Parent")
                    .and_then(Object::as_reference)
                    .expect("page without MediaBox has a parent");
                node = doc.get_dictionary(parent).expect("parent dictionary");
            }
        })
        .collect()
}
