//! pdfstitch - Queue, reorder and stitch PDF documents into one.
//!
//! This library keeps an ordered queue of loaded PDF documents, lets the
//! caller rearrange it, and concatenates the queued documents' pages into
//! a single output document. It supports:
//!
//! - An ordered document queue with move/remove/clear and live statistics
//! - Batch loading with bounded concurrency and per-file failure reports
//! - All-or-nothing merging that preserves page content and dimensions
//! - Optional `"k / total"` page numbering at three anchor positions
//! - Compression levels and atomic output writes
//!
//! # Examples
//!
//! ## Session
//!
//! ```no_run
//! use pdfstitch::config::PageNumberAnchor;
//! use pdfstitch::merge::MergeOptions;
//! use pdfstitch::session::StitchSession;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = StitchSession::new();
//! let report = session
//!     .add_files(&[PathBuf::from("a.pdf"), PathBuf::from("b.pdf")])
//!     .await;
//! println!("{}", report.summary_line());
//!
//! let options = MergeOptions::new().with_page_numbers(PageNumberAnchor::BottomRight);
//! let output = session.merge_async(options).await?;
//! std::fs::write(&output.file_name, &output.bytes)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfstitch::loader::{DocumentLoader, LopdfLoader};
//! use pdfstitch::merge::{MergeOptions, MergeRequest, Merger};
//! use pdfstitch::queue::DocumentQueue;
//!
//! # fn example(a: &[u8], b: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let loader = LopdfLoader::new();
//! let mut queue = DocumentQueue::new();
//! queue.append(loader.load("a.pdf", a)?.into_record());
//! queue.append(loader.load("b.pdf", b)?.into_record());
//! queue.move_up(1)?;
//!
//! let request = MergeRequest::from_queue(&queue, MergeOptions::new());
//! let output = Merger::new().merge(&request)?;
//! println!("{} pages", output.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod loader;
pub mod merge;
pub mod output;
pub mod queue;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use config::{CompressionLevel, Config, LoadOrder, PageNumberAnchor};
pub use document::{DocumentId, DocumentRecord, DocumentSnapshot, DocumentSummary};
pub use error::{Result, StitchError};
pub use loader::{DocumentLoader, LoadReport, LopdfLoader};
pub use merge::{MergeOptions, MergeOutput, MergeRequest, Merger};
pub use queue::{DocumentQueue, QueueStats};
pub use session::StitchSession;

/// Version of pdfstitch.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the package.
pub const NAME: &str = env!("CARGO_PKG_NAME");
