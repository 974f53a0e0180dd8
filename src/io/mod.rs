//! I/O operations for pdfstitch.
//!
//! This module handles all file I/O operations including:
//! - Reading input files into memory
//! - Writing stitched output atomically
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::io::{PdfWriter, read_input};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let input = read_input(Path::new("input.pdf")).await?;
//!
//! let writer = PdfWriter::new();
//! writer.save(input.bytes, Path::new("copy.pdf")).await?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{InputFile, display_name, read_input};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
