//! Page-number stamping.
//!
//! Every page of the stitched document gets a `"k / total"` label drawn in
//! Helvetica. The label position is computed from the page's own MediaBox
//! (inherited from the page tree when the page does not carry one), so
//! mixed page sizes are labelled consistently.
//!
//! Existing content is wrapped in `q` ... `Q` so that whatever graphics
//! state a page leaves behind (transforms, colours, clipping) does not
//! affect the label.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use tracing::debug;

use crate::config::PageNumberAnchor;
use crate::error::{Result, StitchError};
use crate::merge::request::LabelStyle;

/// US Letter, used when neither a page nor its ancestors declare a MediaBox.
const DEFAULT_MEDIA_BOX: MediaBox = MediaBox {
    x0: 0.0,
    y0: 0.0,
    x1: 612.0,
    y1: 792.0,
};

const BOTTOM_MARGIN: f32 = 20.0;
const TOP_MARGIN: f32 = 30.0;
const RIGHT_INSET: f32 = 80.0;

/// Guard against cyclic Parent chains in malformed page trees.
const MAX_TREE_DEPTH: usize = 64;

const FONT_RESOURCE_PREFIX: &str = "PdfStitchLabel";

/// A page's visible area in default user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaBox {
    /// Left edge.
    pub x0: f32,
    /// Bottom edge.
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
}

impl MediaBox {
    /// Build from a PDF rectangle, normalizing corner order.
    pub fn from_rect(rect: [f32; 4]) -> Self {
        Self {
            x0: rect[0].min(rect[2]),
            y0: rect[1].min(rect[3]),
            x1: rect[0].max(rect[2]),
            y1: rect[1].max(rect[3]),
        }
    }

    /// Width in points.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height in points.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Label text for page `number` of `total`.
pub fn label_text(number: usize, total: usize) -> String {
    format!("{number} / {total}")
}

/// Width of `text` set in Helvetica at `font_size`.
///
/// Labels only contain digits, spaces and slashes; anything else is
/// measured as a digit.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            ' ' | '/' => 278,
            _ => 556,
        })
        .sum();
    units as f32 / 1000.0 * font_size
}

/// Lower-left corner of a label of width `label_width` on `media_box`.
pub fn label_position(
    anchor: PageNumberAnchor,
    media_box: MediaBox,
    label_width: f32,
) -> (f32, f32) {
    let centered_x = media_box.x0 + media_box.width() / 2.0 - label_width / 2.0;

    match anchor {
        PageNumberAnchor::BottomCenter => (centered_x, media_box.y0 + BOTTOM_MARGIN),
        PageNumberAnchor::TopCenter => (centered_x, media_box.y1 - TOP_MARGIN),
        PageNumberAnchor::BottomRight => {
            (media_box.x1 - RIGHT_INSET, media_box.y0 + BOTTOM_MARGIN)
        }
    }
}

/// Stamps page numbers onto a document.
#[derive(Debug, Clone, Copy)]
pub struct PageNumberer {
    anchor: PageNumberAnchor,
    style: LabelStyle,
}

impl PageNumberer {
    /// Create a numberer for `anchor` using `style`.
    pub fn new(anchor: PageNumberAnchor, style: LabelStyle) -> Self {
        Self { anchor, style }
    }

    /// Stamp every page of `doc`, in page order. Returns the page count.
    ///
    /// # Errors
    ///
    /// Returns an error if a page object is missing or is not a
    /// dictionary, or if a label cannot be encoded.
    pub fn apply(&self, doc: &mut Document) -> Result<usize> {
        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        let total = pages.len();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let save_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));

        for (index, page_id) in pages.into_iter().enumerate() {
            self.stamp_page(doc, page_id, index + 1, total, font_id, save_id)?;
        }

        debug!(pages = total, anchor = %self.anchor, "Stamped page numbers");
        Ok(total)
    }

    fn stamp_page(
        &self,
        doc: &mut Document,
        page_id: ObjectId,
        number: usize,
        total: usize,
        font_id: ObjectId,
        save_id: ObjectId,
    ) -> Result<()> {
        let media_box = effective_media_box(doc, page_id);
        let mut resources = effective_resources(doc, page_id);
        let mut fonts = resolved_dictionary(doc, resources.get(b"Font").ok());

        let font_name = unique_font_name(&fonts);
        fonts.set(font_name.as_bytes().to_vec(), Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));

        let label = label_text(number, total);
        let width = text_width(&label, self.style.font_size);
        let (x, y) = label_position(self.anchor, media_box, width);
        let grey = self.style.grey;

        let content = Content {
            operations: vec![
                Operation::new("Q", vec![]),
                Operation::new("q", vec![]),
                Operation::new("rg", vec![grey.into(), grey.into(), grey.into()]),
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![
                        Object::Name(font_name.into_bytes()),
                        self.style.font_size.into(),
                    ],
                ),
                Operation::new("Td", vec![x.into(), y.into()]),
                Operation::new("Tj", vec![Object::string_literal(label)]),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ],
        };
        // Readers join /Contents streams; keep the leading Q a separate token.
        let mut bytes = b"\n".to_vec();
        bytes.extend(content.encode()?);
        let label_id = doc.add_object(Stream::new(Dictionary::new(), bytes));

        let mut contents: Vec<Object> = vec![save_id.into()];
        contents.extend(
            doc.get_page_contents(page_id)
                .into_iter()
                .map(Object::Reference),
        );
        contents.push(label_id.into());

        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| {
                StitchError::merge_failed(format!("Invalid page object {page_id:?}: {e}"))
            })?;
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Array(contents));

        Ok(())
    }
}

/// Look up `key` on the page, then on each ancestor in the page tree.
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return Some(value);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }

    None
}

pub(crate) fn effective_media_box(doc: &Document, page_id: ObjectId) -> MediaBox {
    inherited(doc, page_id, b"MediaBox")
        .and_then(|obj| doc.dereference(obj).ok())
        .and_then(|(_, obj)| obj.as_array().ok())
        .and_then(|values| {
            if values.len() != 4 {
                return None;
            }
            let mut rect = [0.0f32; 4];
            for (slot, value) in rect.iter_mut().zip(values) {
                *slot = value.as_float().ok()?;
            }
            Some(MediaBox::from_rect(rect))
        })
        .unwrap_or(DEFAULT_MEDIA_BOX)
}

fn effective_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    resolved_dictionary(doc, inherited(doc, page_id, b"Resources"))
}

/// Clone of the dictionary `obj` is or refers to; empty if neither.
fn resolved_dictionary(doc: &Document, obj: Option<&Object>) -> Dictionary {
    obj.and_then(|obj| doc.dereference(obj).ok())
        .and_then(|(_, obj)| obj.as_dict().ok())
        .cloned()
        .unwrap_or_else(Dictionary::new)
}

fn unique_font_name(fonts: &Dictionary) -> String {
    let mut name = FONT_RESOURCE_PREFIX.to_string();
    let mut suffix = 1;
    while fonts.has(name.as_bytes()) {
        name = format!("{FONT_RESOURCE_PREFIX}{suffix}");
        suffix += 1;
    }
    name
}
