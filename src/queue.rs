//! Ordered queue of loaded documents.
//!
//! The queue is the single source of truth for merge order: position in
//! the queue is position in the output. Every mutation keeps the sequence
//! dense (no gaps, no duplicate ids) and statistics are always derived
//! from the current records, so they cannot drift from the contents.

use serde::Serialize;
use tracing::debug;

use crate::document::{DocumentId, DocumentRecord, DocumentSnapshot, DocumentSummary};
use crate::error::{Result, StitchError};

/// Aggregate statistics over the queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Number of queued documents.
    pub count: usize,
    /// Sum of page counts.
    pub total_pages: usize,
    /// Sum of encoded document sizes.
    pub total_size_bytes: u64,
}

/// Ordered collection of loaded documents awaiting a merge.
#[derive(Debug, Default)]
pub struct DocumentQueue {
    records: Vec<DocumentRecord>,
}

impl DocumentQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued documents.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the queue holds no documents.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&DocumentRecord> {
        self.records.get(index)
    }

    /// Iterate over records in merge order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentRecord> {
        self.records.iter()
    }

    /// Ids in merge order.
    pub fn ids(&self) -> Vec<DocumentId> {
        self.records.iter().map(DocumentRecord::id).collect()
    }

    /// Current position of the document with `id`.
    pub fn position_of(&self, id: DocumentId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// Append a record at the end of the queue.
    pub fn append(&mut self, record: DocumentRecord) {
        debug!(
            id = %record.id(),
            name = record.name(),
            pages = record.page_count(),
            "Appending document to queue"
        );
        self.records.push(record);
    }

    /// Remove the record at `index`, releasing its document handle.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<DocumentSummary> {
        self.check_index(index)?;

        let record = self.records.remove(index);
        let summary = record.summary();
        drop(record);

        debug!(id = %summary.id, index, "Removed document from queue");
        Ok(summary)
    }

    /// Swap the record at `index` with its predecessor.
    ///
    /// Returns `Ok(false)` without touching the queue when `index` is 0.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if `index >= len`.
    pub fn move_up(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;

        if index == 0 {
            return Ok(false);
        }

        self.records.swap(index - 1, index);
        Ok(true)
    }

    /// Swap the record at `index` with its successor.
    ///
    /// Returns `Ok(false)` without touching the queue when `index` is the
    /// last position.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if `index >= len`.
    pub fn move_down(&mut self, index: usize) -> Result<bool> {
        self.check_index(index)?;

        if index + 1 == self.records.len() {
            return Ok(false);
        }

        self.records.swap(index, index + 1);
        Ok(true)
    }

    /// Move the record at `from` so that it ends up at `to`.
    ///
    /// The record is taken out first and `to` is interpreted against the
    /// shortened sequence, then the record is inserted there. For a queue
    /// `[A, B, C]`, `move_to_index(0, 2)` yields `[B, C, A]`.
    ///
    /// Returns `Ok(false)` when `from == to`.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::IndexOutOfRange`] if either index is
    /// `>= len`. The queue is unchanged on error.
    pub fn move_to_index(&mut self, from: usize, to: usize) -> Result<bool> {
        self.check_index(from)?;
        self.check_index(to)?;

        if from == to {
            return Ok(false);
        }

        let record = self.records.remove(from);
        self.records.insert(to, record);

        debug!(from, to, "Reordered queue");
        Ok(true)
    }

    /// Remove every record, releasing all handles.
    ///
    /// Returns how many records were released.
    pub fn clear(&mut self) -> usize {
        let released = self.records.len();
        self.records.clear();
        debug!(released, "Cleared queue");
        released
    }

    /// Aggregate statistics for the current contents.
    pub fn stats(&self) -> QueueStats {
        self.records
            .iter()
            .fold(QueueStats::default(), |mut stats, record| {
                stats.count += 1;
                stats.total_pages += record.page_count();
                stats.total_size_bytes += record.byte_size();
                stats
            })
    }

    /// Read-only views of every queued document, in merge order.
    pub fn snapshot(&self) -> Vec<DocumentSnapshot> {
        self.records
            .iter()
            .map(|record| record.handle().snapshot())
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.records.len() {
            return Err(StitchError::index_out_of_range(index, self.records.len()));
        }
        Ok(())
    }
}
