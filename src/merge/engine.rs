//! Core stitching implementation.
//!
//! This module concatenates the pages of several documents into one,
//! preserving each page's content and dimensions, and optionally stamps
//! page numbers across the combined sequence.
//!
//! Each source document's page tree is grafted whole under a new root
//! `Pages` node rather than flattened page by page. Attributes a source
//! declares on its own tree nodes (MediaBox, Resources, Rotate) are
//! therefore still inherited by its pages in the output.

use chrono::{Local, Utc};
use lopdf::{Document, Object, ObjectId, dictionary};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use crate::config::CompressionLevel;
use crate::document::DocumentSnapshot;
use crate::error::{Result, StitchError};
use crate::merge::metadata::MetadataManager;
use crate::merge::naming::output_file_name;
use crate::merge::numbering::PageNumberer;
use crate::merge::request::MergeRequest;
use crate::utils::format_bytes;

/// Minimum number of documents a merge accepts.
pub const MIN_DOCUMENTS: usize = 2;

/// Statistics about a merge operation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MergeStatistics {
    /// Number of documents stitched.
    pub documents_merged: usize,

    /// Total number of pages in the output.
    pub total_pages: usize,

    /// Size of the serialized output in bytes.
    pub output_size: u64,

    /// Time taken for the merge.
    #[serde(with = "duration_millis")]
    pub merge_time: Duration,

    /// Whether page numbers were stamped.
    pub page_numbers: bool,

    /// Compression applied.
    pub compression: CompressionLevel,
}

impl MergeStatistics {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_bytes(self.output_size)
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u128(duration.as_millis())
    }
}

/// Result of a successful merge.
#[derive(Debug, Clone)]
pub struct MergeOutput {
    /// The serialized output document.
    pub bytes: Vec<u8>,

    /// Suggested file name, `merged_<date>_<token>.pdf`.
    pub file_name: String,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Stitches documents together.
#[derive(Debug, Clone, Default)]
pub struct Merger {
    metadata_manager: MetadataManager,
}

impl Merger {
    /// Create a new merger.
    pub fn new() -> Self {
        Self {
            metadata_manager: MetadataManager::new(),
        }
    }

    /// Stitch the documents of `request` into a single document.
    ///
    /// The operation is all-or-nothing: either the complete output is
    /// returned or an error is, never a partial document.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`StitchError::InsufficientDocuments`] if the request holds fewer
    ///   than two documents
    /// - [`StitchError::MergeFailed`] if any step of stitching, numbering or
    ///   serialization fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfstitch::merge::{MergeOptions, MergeRequest, Merger};
    /// # use pdfstitch::queue::DocumentQueue;
    /// # fn example(queue: &DocumentQueue) -> Result<(), Box<dyn std::error::Error>> {
    /// let request = MergeRequest::from_queue(queue, MergeOptions::new());
    /// let output = Merger::new().merge(&request)?;
    /// println!("{} pages -> {}", output.statistics.total_pages, output.file_name);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(documents = request.len()))]
    pub fn merge(&self, request: &MergeRequest) -> Result<MergeOutput> {
        if request.len() < MIN_DOCUMENTS {
            return Err(StitchError::InsufficientDocuments {
                count: request.len(),
            });
        }

        let start = Instant::now();

        let (bytes, total_pages) = self.build(request).map_err(|err| match err {
            StitchError::MergeFailed { .. } => err,
            other => StitchError::merge_failed(other.to_string()),
        })?;

        let statistics = MergeStatistics {
            documents_merged: request.len(),
            total_pages,
            output_size: bytes.len() as u64,
            merge_time: start.elapsed(),
            page_numbers: request.options().page_numbers.is_some(),
            compression: request.options().compression,
        };

        info!(
            documents = statistics.documents_merged,
            pages = statistics.total_pages,
            size = statistics.output_size,
            "Merge complete"
        );

        Ok(MergeOutput {
            bytes,
            file_name: output_file_name(Utc::now()),
            statistics,
        })
    }

    fn build(&self, request: &MergeRequest) -> Result<(Vec<u8>, usize)> {
        let options = request.options();
        let mut merged = self.stitch(request.documents())?;

        if let Some(anchor) = options.page_numbers {
            PageNumberer::new(anchor, options.label_style).apply(&mut merged)?;
        }

        self.metadata_manager
            .stamp(&mut merged, &Local::now().fixed_offset());

        match options.compression {
            CompressionLevel::None => {}
            CompressionLevel::Medium => {
                merged.compress();
            }
            CompressionLevel::High => {
                merged.compress();
                merged.prune_objects();
            }
        }

        merged.renumber_objects();

        let total_pages = merged.get_pages().len();

        let mut bytes = Vec::new();
        merged
            .save_to(&mut bytes)
            .map_err(|e| StitchError::merge_failed(format!("Failed to serialize output: {e}")))?;

        Ok((bytes, total_pages))
    }

    /// Graft every source page tree under a fresh root, in order.
    fn stitch(&self, documents: &[DocumentSnapshot]) -> Result<Document> {
        let version = documents
            .iter()
            .map(|snapshot| snapshot.document().version.as_str())
            .max()
            .unwrap_or("1.5");

        let mut merged = Document::with_version(version);
        let root_pages_id = merged.new_object_id();

        let mut kids: Vec<Object> = Vec::with_capacity(documents.len());
        let mut total_count: i64 = 0;

        for (position, snapshot) in documents.iter().enumerate() {
            let mut doc = snapshot.document().clone();
            doc.renumber_objects_with(merged.max_id + 1);
            merged.max_id = doc.max_id;

            let page_count = doc.get_pages().len();
            let source_pages_id = detach_page_tree(&mut doc, root_pages_id, page_count)
                .map_err(|e| {
                    StitchError::merge_failed(format!(
                        "Document {} has no usable page tree: {e}",
                        position + 1
                    ))
                })?;

            debug!(position, pages = page_count, "Grafted page tree");

            merged.objects.extend(doc.objects);
            kids.push(Object::Reference(source_pages_id));
            total_count += page_count as i64;
        }

        merged.objects.insert(
            root_pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => total_count,
            }),
        );

        let catalog_id = merged.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => root_pages_id,
        });
        merged.trailer.set("Root", catalog_id);

        Ok(merged)
    }
}

/// Prepare `doc`'s page tree for grafting under `new_parent`.
///
/// Removes the source catalog and Info dictionary, points the tree root
/// at its new parent, and returns the tree root's id.
fn detach_page_tree(
    doc: &mut Document,
    new_parent: ObjectId,
    page_count: usize,
) -> lopdf::Result<ObjectId> {
    let catalog_id = doc.trailer.get(b"Root").and_then(Object::as_reference)?;
    let pages_id = doc
        .get_dictionary(catalog_id)?
        .get(b"Pages")
        .and_then(Object::as_reference)?;

    doc.objects.remove(&catalog_id);
    if let Ok(info_id) = doc.trailer.get(b"Info").and_then(Object::as_reference) {
        doc.objects.remove(&info_id);
    }

    let pages = doc.get_object_mut(pages_id).and_then(Object::as_dict_mut)?;
    pages.set("Parent", Object::Reference(new_parent));
    pages.set("Count", page_count as i64);

    Ok(pages_id)
}
