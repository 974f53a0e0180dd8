//! Document loading.
//!
//! This module turns raw bytes into queue-ready documents. It provides:
//! - The [`DocumentLoader`] trait, the boundary to the PDF parser
//! - [`LopdfLoader`], the lopdf-backed implementation
//! - Batch loading of files with bounded concurrency
//! - [`LoadReport`], the "N added, M failed" summary of a batch
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::loader::{DocumentLoader, LopdfLoader};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("a.pdf")?;
//! let loaded = LopdfLoader::new().load("a.pdf", &bytes)?;
//! println!("{} has {} pages", loaded.name, loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use serde::{Serialize, Serializer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, instrument};

use crate::config::LoadOrder;
use crate::document::{DocumentHandle, DocumentRecord, DocumentSummary};
use crate::error::{Result, StitchError};
use crate::io::reader::{display_name, read_input};

/// A successfully parsed document, ready to be queued.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Display name.
    pub name: String,

    /// Size of the encoded input in bytes.
    pub byte_size: u64,

    /// Number of pages.
    pub page_count: usize,

    /// Time taken to parse the document.
    pub load_time: Duration,

    /// The decoded document.
    pub document: Document,
}

impl LoadedDocument {
    /// Convert into a queue record, allocating a fresh id.
    pub fn into_record(self) -> DocumentRecord {
        DocumentRecord::new(
            self.name,
            self.byte_size,
            self.page_count,
            DocumentHandle::new(self.document),
        )
    }
}

/// Parses encoded document bytes.
pub trait DocumentLoader: Send + Sync {
    /// Parse `bytes` into a document named `name`.
    ///
    /// # Errors
    ///
    /// Fails for bytes that do not parse, encrypted documents, and
    /// documents with no pages.
    fn load(&self, name: &str, bytes: &[u8]) -> Result<LoadedDocument>;
}

/// [`DocumentLoader`] backed by lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfLoader;

impl LopdfLoader {
    /// Create a new loader.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentLoader for LopdfLoader {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    fn load(&self, name: &str, bytes: &[u8]) -> Result<LoadedDocument> {
        let start = Instant::now();

        let document = Document::load_mem(bytes).map_err(|e| {
            let err_msg = e.to_string();
            let lowered = err_msg.to_lowercase();
            if lowered.contains("encrypt") || lowered.contains("password") {
                StitchError::encrypted(name)
            } else {
                StitchError::load_failed(name, err_msg)
            }
        })?;

        if document.is_encrypted() {
            return Err(StitchError::encrypted(name));
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(StitchError::empty_document(name));
        }

        let load_time = start.elapsed();
        debug!(page_count, ?load_time, "Loaded document");

        Ok(LoadedDocument {
            name: name.to_string(),
            byte_size: bytes.len() as u64,
            page_count,
            load_time,
            document,
        })
    }
}

/// Outcome of one entry in a batch load.
pub type LoadOutcome = (String, Result<LoadedDocument>);

/// A document that could not be added.
#[derive(Debug, Serialize)]
pub struct LoadFailure {
    /// Display name of the input.
    pub name: String,

    /// Why it failed.
    #[serde(rename = "reason", serialize_with = "serialize_error")]
    pub error: StitchError,
}

fn serialize_error<S: Serializer>(
    error: &StitchError,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Summary of a batch load.
#[derive(Debug, Default, Serialize)]
pub struct LoadReport {
    /// Documents that entered the queue, in append order.
    pub added: Vec<DocumentSummary>,

    /// Inputs that failed to load, in the order they were reported.
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    /// Number of documents added.
    pub fn succeeded(&self) -> usize {
        self.added.len()
    }

    /// Number of inputs that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Whether every input loaded.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// One-line summary, e.g. "2 added, 1 failed".
    pub fn summary_line(&self) -> String {
        format!("{} added, {} failed", self.succeeded(), self.failed())
    }
}

/// Parse in-memory inputs with at most `workers` parses in flight.
///
/// Results come back in presentation order for [`LoadOrder::Presented`]
/// and in completion order for [`LoadOrder::Completion`].
pub async fn load_bytes_batch<L>(
    loader: Arc<L>,
    inputs: Vec<(String, Vec<u8>)>,
    workers: usize,
    order: LoadOrder,
) -> Vec<LoadOutcome>
where
    L: DocumentLoader + 'static,
{
    use futures::stream::{self, StreamExt};

    let workers = workers.max(1);

    let tasks = inputs.into_iter().enumerate().map(|(idx, (name, bytes))| {
        let loader = Arc::clone(&loader);
        async move {
            let outcome = parse_blocking(loader, name.clone(), bytes).await;
            (idx, (name, outcome))
        }
    });

    let indexed = stream::iter(tasks)
        .buffer_unordered(workers)
        .collect::<Vec<_>>()
        .await;

    finish_batch(indexed, order)
}

/// Read and parse files with at most `workers` loads in flight.
///
/// Ordering follows [`load_bytes_batch`].
pub async fn load_paths_batch<L>(
    loader: Arc<L>,
    paths: &[PathBuf],
    workers: usize,
    order: LoadOrder,
) -> Vec<LoadOutcome>
where
    L: DocumentLoader + 'static,
{
    use futures::stream::{self, StreamExt};

    let workers = workers.max(1);

    let tasks = paths.iter().enumerate().map(|(idx, path)| {
        let loader = Arc::clone(&loader);
        let path = path.clone();
        async move {
            let outcome = match read_input(&path).await {
                Ok(input) => {
                    let name = input.name;
                    let result = parse_blocking(loader, name.clone(), input.bytes).await;
                    (name, result)
                }
                Err(err) => (display_name(&path), Err(err)),
            };
            (idx, outcome)
        }
    });

    let indexed = stream::iter(tasks)
        .buffer_unordered(workers)
        .collect::<Vec<_>>()
        .await;

    finish_batch(indexed, order)
}

async fn parse_blocking<L>(
    loader: Arc<L>,
    name: String,
    bytes: Vec<u8>,
) -> Result<LoadedDocument>
where
    L: DocumentLoader + 'static,
{
    tokio::task::spawn_blocking(move || loader.load(&name, &bytes))
        .await
        .map_err(|e| StitchError::other(format!("Load task failed: {e}")))?
}

fn finish_batch(mut indexed: Vec<(usize, LoadOutcome)>, order: LoadOrder) -> Vec<LoadOutcome> {
    if order == LoadOrder::Presented {
        indexed.sort_by_key(|(idx, _)| *idx);
    }

    indexed
        .into_iter()
        .map(|(_, outcome)| {
            if let (name, Err(err)) = &outcome {
                debug!(name = name.as_str(), error = %err, "Failed to load document");
            }
            outcome
        })
        .collect()
}
