//! Queued document records and the handles they own.
//!
//! A [`DocumentRecord`] is created once a document has loaded successfully
//! and lives exactly as long as its queue membership. The decoded document
//! sits behind a [`DocumentHandle`], which is owned by the record and is
//! released when the record is dropped. Merges never borrow the queue;
//! they take [`DocumentSnapshot`]s, which keep the decoded document alive
//! independently of later queue mutations.

use chrono::{DateTime, Local};
use lopdf::Document;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a loaded document. Never reused within a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(u64);

impl DocumentId {
    /// Allocate the next identifier.
    pub fn next() -> Self {
        Self(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Exclusively-owned reference to a decoded document.
///
/// Not `Clone`. Share the document through [`DocumentHandle::snapshot`].
#[derive(Debug)]
pub struct DocumentHandle {
    document: Arc<Document>,
}

impl DocumentHandle {
    /// Wrap a decoded document.
    pub fn new(document: Document) -> Self {
        Self {
            document: Arc::new(document),
        }
    }

    /// Borrow the decoded document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Take a read-only view for an in-flight merge.
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            document: Arc::clone(&self.document),
        }
    }
}

/// Read-only view of a document captured when a merge request is built.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    document: Arc<Document>,
}

impl DocumentSnapshot {
    /// Borrow the captured document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Number of pages in the captured document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }
}

impl From<Document> for DocumentSnapshot {
    fn from(document: Document) -> Self {
        Self {
            document: Arc::new(document),
        }
    }
}

/// One loaded source document in the queue.
#[derive(Debug)]
pub struct DocumentRecord {
    id: DocumentId,
    name: String,
    byte_size: u64,
    page_count: usize,
    loaded_at: DateTime<Local>,
    handle: DocumentHandle,
}

impl DocumentRecord {
    /// Create a record for a freshly loaded document.
    ///
    /// `page_count` is the value reported by the loader and is never
    /// recounted afterwards.
    pub fn new(
        name: impl Into<String>,
        byte_size: u64,
        page_count: usize,
        handle: DocumentHandle,
    ) -> Self {
        Self {
            id: DocumentId::next(),
            name: name.into(),
            byte_size,
            page_count,
            loaded_at: Local::now(),
            handle,
        }
    }

    /// Unique identifier.
    pub fn id(&self) -> DocumentId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Size of the original encoded document in bytes.
    pub fn byte_size(&self) -> u64 {
        self.byte_size
    }

    /// Page count reported at load time.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// When the record entered the queue.
    pub fn loaded_at(&self) -> DateTime<Local> {
        self.loaded_at
    }

    /// The owned document handle.
    pub fn handle(&self) -> &DocumentHandle {
        &self.handle
    }

    /// Plain-data description of this record.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id,
            name: self.name.clone(),
            byte_size: self.byte_size,
            page_count: self.page_count,
            loaded_at: self.loaded_at,
        }
    }
}

/// Handle-free description of a record, safe to keep after removal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    /// Identifier of the record.
    pub id: DocumentId,
    /// Display name.
    pub name: String,
    /// Size of the original encoded document in bytes.
    pub byte_size: u64,
    /// Page count reported at load time.
    pub page_count: usize,
    /// When the record entered the queue.
    pub loaded_at: DateTime<Local>,
}
