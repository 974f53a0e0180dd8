//! Writing stitched output to disk.
//!
//! This module provides safe output writing with:
//! - Atomic writes (write to temp file, then rename)
//! - Buffered I/O on the blocking thread pool
//! - Pre-flight checks on the output directory
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::writer::PdfWriter;
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(bytes, Path::new("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{Result, StitchError};
use crate::utils::format_bytes;

/// Options for writing output files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,

    /// Buffer size for writing (in bytes).
    pub buffer_size: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            atomic: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_bytes(self.file_size)
    }
}

/// Output writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with custom options.
    pub fn with_options(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions {
                atomic: false,
                ..Default::default()
            },
        }
    }

    /// Write `bytes` to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Disk full
    /// - Write operation fails
    pub async fn save(&self, bytes: Vec<u8>, path: &Path) -> Result<()> {
        self.save_with_stats(bytes, path).await?;
        Ok(())
    }

    /// Write `bytes` to `path` and return statistics about the operation.
    ///
    /// With atomic writes enabled, the data is written to a sibling
    /// `.tmp` file first and renamed into place, so `path` never holds a
    /// partially written document.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfstitch::io::writer::PdfWriter;
    /// # use std::path::Path;
    /// # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
    /// let writer = PdfWriter::new();
    /// let stats = writer.save_with_stats(bytes, Path::new("output.pdf")).await?;
    /// println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn save_with_stats(&self, bytes: Vec<u8>, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if options.atomic {
                path_buf.with_extension("tmp")
            } else {
                path_buf.clone()
            };

            let file =
                std::fs::File::create(&write_path).map_err(|e| StitchError::FailedToWrite {
                    path: write_path.clone(),
                    source: e,
                })?;

            let mut writer = std::io::BufWriter::with_capacity(options.buffer_size, file);

            writer
                .write_all(&bytes)
                .and_then(|()| writer.flush())
                .map_err(|e| {
                    let _ = std::fs::remove_file(&write_path);
                    StitchError::FailedToWrite {
                        path: write_path.clone(),
                        source: e,
                    }
                })?;
            drop(writer);

            if options.atomic {
                std::fs::rename(&write_path, &path_buf).map_err(|e| {
                    let _ = std::fs::remove_file(&write_path);
                    StitchError::FailedToWrite {
                        path: path_buf.clone(),
                        source: e,
                    }
                })?;
            }

            let write_time = start.elapsed();

            Ok::<_, StitchError>(WriteStatistics {
                write_time,
                file_size: bytes.len() as u64,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| StitchError::other(format!("Write task failed: {e}")))??;

        debug!(
            path = %stats.output_path.display(),
            size = stats.file_size,
            "Wrote output"
        );

        Ok(stats)
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            if !parent.exists() {
                return Err(StitchError::invalid_config(format!(
                    "Output directory does not exist: {}",
                    parent.display()
                )));
            }

            let metadata = tokio::fs::metadata(parent).await?;

            if metadata.permissions().readonly() {
                return Err(StitchError::invalid_config(format!(
                    "Output directory is not writable: {}",
                    parent.display()
                )));
            }
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}
