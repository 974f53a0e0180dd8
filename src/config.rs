//! Configuration module for pdfstitch.
//!
//! This module turns CLI arguments into a validated configuration that
//! drives loading, reordering and stitching. It handles:
//! - Parsing of named options (anchors, compression levels, load order)
//! - Validation of argument combinations
//! - Application of defaults

use anyhow::{Result, bail};
use serde::Serialize;

use crate::StitchError;
use std::{fmt, path::PathBuf, str::FromStr};

/// Where page-number labels are placed on each page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageNumberAnchor {
    /// Horizontally centered, near the bottom edge.
    #[default]
    BottomCenter,
    /// Horizontally centered, near the top edge.
    TopCenter,
    /// Near the bottom-right corner.
    BottomRight,
}

impl PageNumberAnchor {
    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BottomCenter => "bottom-center",
            Self::TopCenter => "top-center",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for PageNumberAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageNumberAnchor {
    type Err = StitchError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "bottom-center" => Ok(Self::BottomCenter),
            "top-center" => Ok(Self::TopCenter),
            "bottom-right" => Ok(Self::BottomRight),
            _ => Err(StitchError::invalid_config(format!(
                "Invalid page number position: {s}. \
                 Must be one of: bottom-center, top-center, bottom-right"
            ))),
        }
    }
}

/// Compression applied to the stitched output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Leave streams exactly as they were in the inputs.
    None,
    /// Compress uncompressed streams.
    #[default]
    Medium,
    /// Compress streams and drop unreferenced objects.
    High,
}

impl CompressionLevel {
    /// Name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = StitchError;

    /// Parse compression level from string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not "none", "medium" or "high".
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(StitchError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, medium, high"
            ))),
        }
    }
}

/// Order in which a batch of loaded documents is appended to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadOrder {
    /// Keep the order in which inputs were given.
    #[default]
    Presented,
    /// Append each document as soon as its load completes.
    Completion,
}

impl FromStr for LoadOrder {
    type Err = StitchError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "presented" => Ok(Self::Presented),
            "completion" => Ok(Self::Completion),
            _ => Err(StitchError::invalid_config(format!(
                "Invalid load order: {s}. Must be one of: presented, completion"
            ))),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// A single drag-style reorder: move the document at `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSpec {
    /// Index before the move.
    pub from: usize,
    /// Index in the sequence after the document was taken out.
    pub to: usize,
}

impl FromStr for MoveSpec {
    type Err = StitchError;

    /// Parse "FROM:TO", both 0-indexed.
    fn from_str(s: &str) -> crate::Result<Self> {
        let invalid = || {
            StitchError::invalid_config(format!(
                "Invalid move: {s}. Expected format like '0:2'"
            ))
        };

        let (from, to) = s.split_once(':').ok_or_else(invalid)?;
        let from = from.trim().parse().map_err(|_| invalid())?;
        let to = to.trim().parse().map_err(|_| invalid())?;

        Ok(Self { from, to })
    }
}

/// Complete configuration for a stitch run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths, in the order they were presented.
    pub inputs: Vec<PathBuf>,

    /// Explicit output path. When unset, a generated name is used.
    pub output: Option<PathBuf>,

    /// Directory for generated output names.
    pub output_dir: PathBuf,

    /// Page-number anchor, or `None` to leave pages unnumbered.
    pub page_numbers: Option<PageNumberAnchor>,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Reorders applied to the queue before merging, in order.
    pub moves: Vec<MoveSpec>,

    /// Append order for batch loads.
    pub load_order: LoadOrder,

    /// Number of parallel load jobs (None = auto-detect).
    pub jobs: Option<usize>,

    /// Abort if any input fails to load.
    pub strict: bool,

    /// Dry run mode - load and report without writing output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Print a JSON report instead of human-readable output.
    pub json: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: None,
            output_dir: PathBuf::from("."),
            page_numbers: None,
            compression: CompressionLevel::default(),
            moves: Vec::new(),
            load_order: LoadOrder::default(),
            jobs: None,
            strict: false,
            dry_run: false,
            verbose: false,
            quiet: false,
            json: false,
            overwrite_mode: OverwriteMode::default(),
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - Jobs count is zero
    /// - The output path is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!("No input files specified");
        }

        if self.verbose && self.quiet {
            bail!("Cannot use both --verbose and --quiet");
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!("Number of jobs must be at least 1");
        }

        if let Some(output) = &self.output
            && self.inputs.iter().any(|input| input == output)
        {
            bail!(
                "Output file cannot be the same as an input file: {}",
                output.display()
            );
        }

        Ok(())
    }

    /// Get the effective number of parallel load jobs.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }

    /// Check if human-readable output should be displayed.
    pub fn should_print(&self) -> bool {
        !self.json && (!self.quiet || self.dry_run)
    }
}
