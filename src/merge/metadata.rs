//! Output document metadata (the Info dictionary).
//!
//! Stitched documents get a fresh Info dictionary naming pdfstitch as
//! Creator and Producer, stamped with creation and modification dates.
//! Source documents' Info dictionaries are not carried over.

use chrono::{DateTime, FixedOffset};
use lopdf::{Dictionary, Document, Object, StringFormat};

/// Name written into the Creator and Producer fields.
pub const PRODUCER: &str = "pdfstitch";

/// Manager for output document metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataManager;

impl MetadataManager {
    /// Create a new metadata manager.
    pub fn new() -> Self {
        Self
    }

    /// Write a fresh Info dictionary stamped with `now`.
    ///
    /// Any existing Info dictionary is replaced.
    pub fn stamp(&self, doc: &mut Document, now: &DateTime<FixedOffset>) {
        self.clear(doc);

        let date = format_pdf_date(now);
        let mut info = Dictionary::new();
        info.set("Creator", text(PRODUCER));
        info.set("Producer", text(PRODUCER));
        info.set("CreationDate", text(&date));
        info.set("ModDate", text(&date));

        let info_id = doc.add_object(Object::Dictionary(info));
        doc.trailer.set("Info", Object::Reference(info_id));
    }

    /// Read a string field from the Info dictionary.
    pub fn field(&self, doc: &Document, key: &[u8]) -> Option<String> {
        let info_ref = doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
        let info = doc.get_dictionary(info_ref).ok()?;

        match info.get(key).ok()? {
            Object::String(bytes, _) => String::from_utf8(bytes.clone()).ok(),
            _ => None,
        }
    }

    /// Remove the Info dictionary, if any.
    pub fn clear(&self, doc: &mut Document) {
        if let Ok(info_ref) = doc.trailer.get(b"Info").and_then(Object::as_reference) {
            doc.objects.remove(&info_ref);
        }
        doc.trailer.remove(b"Info");
    }
}

fn text(value: &str) -> Object {
    Object::String(value.as_bytes().to_vec(), StringFormat::Literal)
}

/// Format a timestamp as a PDF date string: `D:YYYYMMDDHHmmSSOHH'mm'`.
pub fn format_pdf_date(time: &DateTime<FixedOffset>) -> String {
    let offset_secs = time.offset().local_minus_utc();
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let offset_mins = offset_secs.abs() / 60;

    format!(
        "D:{}{}{:02}'{:02}'",
        time.format("%Y%m%d%H%M%S"),
        sign,
        offset_mins / 60,
        offset_mins % 60
    )
}
