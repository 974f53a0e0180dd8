//! PDF stitching operations.
//!
//! This module provides the merge engine with:
//! - Document concatenation in queue order
//! - Page-number stamping at a chosen anchor
//! - Output metadata
//! - Compression levels
//! - Output naming
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::config::PageNumberAnchor;
//! use pdfstitch::merge::{MergeOptions, MergeRequest, Merger};
//! use pdfstitch::queue::DocumentQueue;
//!
//! # fn example(queue: &DocumentQueue) -> Result<(), Box<dyn std::error::Error>> {
//! let options = MergeOptions::new().with_page_numbers(PageNumberAnchor::BottomCenter);
//! let request = MergeRequest::from_queue(queue, options);
//!
//! let output = Merger::new().merge(&request)?;
//! std::fs::write(&output.file_name, &output.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod metadata;
pub mod naming;
pub mod numbering;
pub mod request;

pub use engine::{MIN_DOCUMENTS, MergeOutput, MergeStatistics, Merger};
pub use metadata::MetadataManager;
pub use naming::suggested_file_name;
pub use numbering::{MediaBox, PageNumberer};
pub use request::{LabelStyle, MergeOptions, MergeRequest};

use crate::error::Result;

/// Merge a request with a default [`Merger`].
///
/// # Errors
///
/// See [`Merger::merge`].
pub fn merge_documents(request: &MergeRequest) -> Result<MergeOutput> {
    Merger::new().merge(request)
}
