//! Stitching session: a queue plus everything that operates on it.
//!
//! [`StitchSession`] owns the document queue, the loader and the merger,
//! and tracks which document (if any) is being previewed. It is the
//! single owner of the queue; all mutation goes through `&mut self`.
//!
//! # Examples
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
//! session.move_to_index(1, 0)?;
//! let options = MergeOptions::new().with_page_numbers(PageNumberAnchor::BottomCenter);
//! let output = session.merge_async(options).await?;
//! println!("{} pages", output.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::LoadOrder;
use crate::document::{DocumentId, DocumentRecord, DocumentSummary};
use crate::error::{Result, StitchError};
use crate::loader::{
    DocumentLoader, LoadFailure, LoadOutcome, LoadReport, LopdfLoader, load_bytes_batch,
    load_paths_batch,
};
use crate::merge::{MIN_DOCUMENTS, MergeOptions, MergeOutput, MergeRequest, Merger};
use crate::queue::{DocumentQueue, QueueStats};

/// A queue of documents and the operations that load, arrange and
/// stitch them.
#[derive(Debug)]
pub struct StitchSession<L = LopdfLoader> {
    queue: DocumentQueue,
    loader: Arc<L>,
    merger: Merger,
    previewed: Option<DocumentId>,
    workers: usize,
    load_order: LoadOrder,
}

impl StitchSession<LopdfLoader> {
    /// Create an empty session using the lopdf loader.
    pub fn new() -> Self {
        Self::with_loader(LopdfLoader::new())
    }
}

impl Default for StitchSession<LopdfLoader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DocumentLoader + 'static> StitchSession<L> {
    /// Create an empty session with a custom loader.
    pub fn with_loader(loader: L) -> Self {
        Self {
            queue: DocumentQueue::new(),
            loader: Arc::new(loader),
            merger: Merger::new(),
            previewed: None,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            load_order: LoadOrder::default(),
        }
    }

    /// Limit batch loads to `workers` concurrent parses.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Choose how batch results are appended.
    pub fn with_load_order(mut self, order: LoadOrder) -> Self {
        self.load_order = order;
        self
    }

    /// The underlying queue.
    pub fn queue(&self) -> &DocumentQueue {
        &self.queue
    }

    /// Number of queued documents.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Aggregate statistics for the queue.
    pub fn stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Parse a single in-memory document and append it.
    ///
    /// # Errors
    ///
    /// Returns the loader's error; the queue is unchanged on failure.
    pub fn add_document(&mut self, name: &str, bytes: &[u8]) -> Result<DocumentSummary> {
        let loaded = self.loader.load(name, bytes)?;
        Ok(self.append(loaded.into_record()))
    }

    /// Parse a batch of in-memory documents and append the ones that load.
    pub async fn add_documents(&mut self, inputs: Vec<(String, Vec<u8>)>) -> LoadReport {
        let outcomes = load_bytes_batch(
            Arc::clone(&self.loader),
            inputs,
            self.workers,
            self.load_order,
        )
        .await;
        self.absorb(outcomes)
    }

    /// Read and parse files, appending the ones that load.
    pub async fn add_files(&mut self, paths: &[PathBuf]) -> LoadReport {
        let outcomes = load_paths_batch(
            Arc::clone(&self.loader),
            paths,
            self.workers,
            self.load_order,
        )
        .await;
        self.absorb(outcomes)
    }

    fn absorb(&mut self, outcomes: Vec<LoadOutcome>) -> LoadReport {
        let mut report = LoadReport::default();

        for (name, outcome) in outcomes {
            match outcome {
                Ok(loaded) => {
                    let summary = self.append(loaded.into_record());
                    report.added.push(summary);
                }
                Err(error) => report.failures.push(LoadFailure { name, error }),
            }
        }

        info!(
            added = report.succeeded(),
            failed = report.failed(),
            "Batch load finished"
        );
        report
    }

    fn append(&mut self, record: DocumentRecord) -> DocumentSummary {
        let summary = record.summary();
        self.queue.append(record);
        summary
    }

    /// Remove the document at `index`.
    ///
    /// Closes the preview if it was showing that document.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<DocumentSummary> {
        let removed = self.queue.remove_at(index)?;
        if self.previewed == Some(removed.id) {
            self.previewed = None;
        }
        Ok(removed)
    }

    /// Swap the document at `index` with its predecessor.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if `index >= len`.
    pub fn move_up(&mut self, index: usize) -> Result<bool> {
        self.queue.move_up(index)
    }

    /// Swap the document at `index` with its successor.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if `index >= len`.
    pub fn move_down(&mut self, index: usize) -> Result<bool> {
        self.queue.move_down(index)
    }

    /// Move the document at `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if either index is out of
    /// range.
    pub fn move_to_index(&mut self, from: usize, to: usize) -> Result<bool> {
        self.queue.move_to_index(from, to)
    }

    /// Remove every document and close the preview.
    pub fn clear(&mut self) -> usize {
        self.previewed = None;
        self.queue.clear()
    }

    /// Show the document at `index` in the preview.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if `index >= len`.
    pub fn preview(&mut self, index: usize) -> Result<&DocumentRecord> {
        let record = self
            .queue
            .get(index)
            .ok_or_else(|| StitchError::index_out_of_range(index, self.queue.len()))?;
        self.previewed = Some(record.id());
        Ok(record)
    }

    /// The document currently previewed, if it is still queued.
    pub fn previewed(&self) -> Option<&DocumentRecord> {
        let id = self.previewed?;
        self.queue
            .position_of(id)
            .and_then(|index| self.queue.get(index))
    }

    /// Close the preview.
    pub fn close_preview(&mut self) {
        self.previewed = None;
    }

    /// Whether there are enough documents to merge.
    pub fn can_merge(&self) -> bool {
        self.queue.len() >= MIN_DOCUMENTS
    }

    /// Build a request from the current queue contents.
    pub fn request(&self, options: MergeOptions) -> MergeRequest {
        MergeRequest::from_queue(&self.queue, options)
    }

    /// Stitch the queued documents, in queue order.
    ///
    /// The queue is never modified, whether the merge succeeds or fails.
    ///
    /// # Errors
    ///
    /// See [`Merger::merge`].
    pub fn merge(&self, options: MergeOptions) -> Result<MergeOutput> {
        self.merger.merge(&self.request(options))
    }

    /// Stitch the queued documents on the blocking thread pool.
    ///
    /// The queue is snapshotted before any work starts, so later mutations
    /// do not affect the output.
    ///
    /// # Errors
    ///
    /// See [`Merger::merge`].
    pub async fn merge_async(&self, options: MergeOptions) -> Result<MergeOutput> {
        let request = self.request(options);
        if request.len() < MIN_DOCUMENTS {
            return Err(StitchError::InsufficientDocuments {
                count: request.len(),
            });
        }

        let merger = self.merger.clone();
        tokio::task::spawn_blocking(move || merger.merge(&request))
            .await
            .map_err(|e| StitchError::merge_failed(format!("Merge task failed: {e}")))?
    }
}
