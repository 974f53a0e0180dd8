//! Error types for pdfstitch.
//!
//! This module defines all error types that can occur while loading,
//! queueing and stitching PDF documents. Errors carry enough context to
//! tell the user what went wrong and, where possible, how to fix it.
//!
//! # Error Categories
//!
//! - **Load Errors**: A document could not be parsed, is encrypted, or is empty
//! - **Queue Errors**: An index was outside the current queue
//! - **Merge Errors**: Too few documents, or a failure while stitching
//! - **I/O Errors**: File not found, permission denied, etc.

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfstitch operations.
pub type Result<T> = std::result::Result<T, StitchError>;

/// Main error type for pdfstitch operations.
#[derive(Debug, thiserror::Error)]
pub enum StitchError {
    /// A document failed to load or parse.
    #[error("Failed to load PDF: {name}\n  Reason: {reason}")]
    LoadFailed {
        /// Display name of the document.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A document is encrypted and cannot be stitched.
    #[error(
        "PDF is encrypted and cannot be processed: {name}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedDocument {
        /// Display name of the document.
        name: String,
    },

    /// A document parsed correctly but contains no pages.
    #[error("PDF has no pages: {name}")]
    EmptyDocument {
        /// Display name of the document.
        name: String,
    },

    /// A queue operation referenced a position outside the queue.
    #[error("Index {index} is out of range for a queue of {len} document(s)")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Queue length at the time of the call.
        len: usize,
    },

    /// A merge was requested with fewer than two documents.
    #[error("At least 2 documents are required to merge, found {count}")]
    InsufficientDocuments {
        /// Number of documents in the request.
        count: usize,
    },

    /// Stitching or serializing the output failed.
    #[error("Merge operation failed: {reason}")]
    MergeFailed {
        /// Description of what went wrong.
        reason: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to write to an output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Failed to read an input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for StitchError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl From<anyhow::Error> for StitchError {
    fn from(err: anyhow::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl StitchError {
    /// Create a LoadFailed error.
    pub fn load_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an EncryptedDocument error.
    pub fn encrypted(name: impl Into<String>) -> Self {
        Self::EncryptedDocument { name: name.into() }
    }

    /// Create an EmptyDocument error.
    pub fn empty_document(name: impl Into<String>) -> Self {
        Self::EmptyDocument { name: name.into() }
    }

    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a MergeFailed error.
    pub fn merge_failed(reason: impl Into<String>) -> Self {
        Self::MergeFailed {
            reason: reason.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error only affects a single input document.
    ///
    /// Recoverable errors are counted in a batch load report; the rest of
    /// the batch keeps going.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::LoadFailed { .. }
                | Self::EncryptedDocument { .. }
                | Self::EmptyDocument { .. }
                | Self::FileNotFound { .. }
                | Self::NotAFile { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToReadInputList { .. } => 2,
            Self::LoadFailed { .. } => 3,
            Self::EncryptedDocument { .. } => 3,
            Self::EmptyDocument { .. } => 3,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::Io { .. } => 5,
            Self::MergeFailed { .. } => 6,
            Self::InsufficientDocuments { .. } => 1,
            Self::IndexOutOfRange { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Cancelled => 130,
            Self::Other { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_load_failed_display() {
        let err = StitchError::load_failed("bad.pdf", "invalid file header");
        let msg = err.to_string();
        assert!(msg.contains("Failed to load PDF"));
        assert!(msg.contains("bad.pdf"));
        assert!(msg.contains("invalid file header"));
    }

    #[test]
    fn test_encrypted_display_has_hint() {
        let msg = StitchError::encrypted("secret.pdf").to_string();
        assert!(msg.contains("encrypted"));
        assert!(msg.contains("secret.pdf"));
        assert!(msg.contains("Decrypt"));
    }

    #[test]
    fn test_index_out_of_range_display() {
        let msg = StitchError::index_out_of_range(5, 3).to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_insufficient_documents_display() {
        let msg = StitchError::InsufficientDocuments { count: 1 }.to_string();
        assert!(msg.contains("At least 2"));
        assert!(msg.contains('1'));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(StitchError::load_failed("a.pdf", "x").is_recoverable());
        assert!(StitchError::encrypted("a.pdf").is_recoverable());
        assert!(StitchError::empty_document("a.pdf").is_recoverable());

        assert!(!StitchError::index_out_of_range(1, 0).is_recoverable());
        assert!(!StitchError::merge_failed("x").is_recoverable());
        assert!(!StitchError::InsufficientDocuments { count: 0 }.is_recoverable());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(StitchError::file_not_found(PathBuf::from("x")).exit_code(), 2);
        assert_eq!(StitchError::load_failed("x", "y").exit_code(), 3);
        assert_eq!(StitchError::output_exists(PathBuf::from("x")).exit_code(), 4);
        assert_eq!(StitchError::merge_failed("x").exit_code(), 6);
        assert_eq!(StitchError::Cancelled.exit_code(), 130);
    }

    #[test]
    fn test_from_io_error() {
        let err: StitchError = io::Error::new(io::ErrorKind::NotFound, "not found").into();
        assert!(matches!(err, StitchError::Io { .. }));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_anyhow_error() {
        let err: StitchError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, StitchError::Other { .. }));
        assert_eq!(err.to_string(), "boom");
    }
}
