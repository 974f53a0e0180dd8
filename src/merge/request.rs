//! Merge requests and their options.

use crate::config::{CompressionLevel, PageNumberAnchor};
use crate::document::DocumentSnapshot;
use crate::queue::DocumentQueue;

/// Appearance of page-number labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Font size in points.
    pub font_size: f32,

    /// Grey level of the fill colour, 0.0 (black) to 1.0 (white).
    pub grey: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            grey: 0.4,
        }
    }
}

/// Options that shape the stitched output.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MergeOptions {
    /// Where to stamp "k / total" labels, if at all.
    pub page_numbers: Option<PageNumberAnchor>,

    /// Compression applied before serialization.
    pub compression: CompressionLevel,

    /// Label appearance.
    pub label_style: LabelStyle,
}

impl MergeOptions {
    /// Options with no numbering and default compression.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp page numbers at `anchor`.
    pub fn with_page_numbers(mut self, anchor: PageNumberAnchor) -> Self {
        self.page_numbers = Some(anchor);
        self
    }

    /// Use `level` compression.
    pub fn with_compression(mut self, level: CompressionLevel) -> Self {
        self.compression = level;
        self
    }

    /// Use a custom label style.
    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.label_style = style;
        self
    }
}

/// Everything a merge needs: the documents, in output order, and options.
///
/// The documents are snapshots, so the request stays valid even if the
/// queue it was built from is mutated or cleared afterwards.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    documents: Vec<DocumentSnapshot>,
    options: MergeOptions,
}

impl MergeRequest {
    /// Build a request from explicit snapshots.
    pub fn new(documents: Vec<DocumentSnapshot>, options: MergeOptions) -> Self {
        Self { documents, options }
    }

    /// Snapshot the current queue contents, in queue order.
    pub fn from_queue(queue: &DocumentQueue, options: MergeOptions) -> Self {
        Self::new(queue.snapshot(), options)
    }

    /// Documents in output order.
    pub fn documents(&self) -> &[DocumentSnapshot] {
        &self.documents
    }

    /// Merge options.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Number of documents in the request.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the request holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Total pages across all documents.
    pub fn total_pages(&self) -> usize {
        self.documents.iter().map(DocumentSnapshot::page_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record;

    #[test]
    fn test_options_builder() {
        let options = MergeOptions::new()
            .with_page_numbers(PageNumberAnchor::TopCenter)
            .with_compression(CompressionLevel::High);

        assert_eq!(options.page_numbers, Some(PageNumberAnchor::TopCenter));
        assert_eq!(options.compression, CompressionLevel::High);
        assert_eq!(options.label_style, LabelStyle::default());
    }

    #[test]
    fn test_from_queue_keeps_order_and_survives_clear() {
        let mut queue = DocumentQueue::new();
        queue.append(record("A", 3, 10));
        queue.append(record("B", 1, 10));

        let request = MergeRequest::from_queue(&queue, MergeOptions::new());
        queue.clear();

        assert_eq!(request.len(), 2);
        assert_eq!(request.total_pages(), 4);
        assert_eq!(request.documents()[0].page_count(), 3);
    }
}
