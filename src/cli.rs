//! CLI argument parsing for pdfstitch.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, validation, and help text generation.
//!
//! # Examples
//!
//! ```no_run
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Stitching {} input(s)", cli.inputs.len());
//! ```

use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use pdfstitch::config::{
    CompressionLevel, Config, LoadOrder, MoveSpec, OverwriteMode, PageNumberAnchor,
};
use pdfstitch::error::{Result, StitchError};
use pdfstitch::utils::collect_paths_for_patterns;

/// Queue, reorder and stitch PDF files into a single document.
///
/// Inputs are loaded in parallel and queued in the order given. The queue
/// can be rearranged with --move before the pages are concatenated, and
/// every output page can be labelled "k / total".
#[derive(Parser, Debug)]
#[command(name = "pdfstitch")]
#[command(version)]
#[command(about = "Queue, reorder and stitch PDF files into a single document", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files or glob patterns (in queue order)
    ///
    /// Matches of a glob pattern are queued in sorted order.
    ///
    /// Examples:
    ///   pdfstitch cover.pdf body.pdf -o book.pdf
    ///   pdfstitch "scans/*.pdf" --page-numbers
    #[arg(value_name = "FILES/GLOBS")]
    pub inputs: Vec<String>,

    /// Output PDF file path
    ///
    /// When omitted, the output is written to --output-dir under a
    /// generated name like merged_2024-05-17_1715934600000.pdf.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for the generated output name
    #[arg(long, value_name = "DIR", default_value = ".", conflicts_with = "output")]
    pub output_dir: PathBuf,

    /// Read additional inputs from a file (one path or glob per line)
    ///
    /// Lines starting with '#' and blank lines are ignored.
    /// Use '-' to read from stdin. Entries are queued after direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Stamp "k / total" page numbers on every output page
    ///
    /// POSITION is one of bottom-center (default), top-center, bottom-right,
    /// and must be attached with '=' (--page-numbers=top-center).
    #[arg(long, value_name = "POSITION", num_args = 0..=1, require_equals = true)]
    #[arg(default_missing_value = "bottom-center")]
    #[arg(value_parser = ["bottom-center", "top-center", "bottom-right"])]
    pub page_numbers: Option<String>,

    /// Compression level for the output PDF
    ///
    /// - none: leave streams as they are
    /// - medium: compress uncompressed streams (default)
    /// - high: compress streams and drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "medium")]
    #[arg(value_parser = ["none", "medium", "high"])]
    pub compression: String,

    /// Move the document at FROM to TO before merging (0-indexed)
    ///
    /// TO is the position in the queue after the document was taken
    /// out. May be repeated; moves apply in the order given.
    ///
    /// Example:
    ///   --move 2:0 --move 1:2
    #[arg(long = "move", value_name = "FROM:TO")]
    pub moves: Vec<String>,

    /// Order in which loaded documents enter the queue
    ///
    /// - presented: the order inputs were given (default)
    /// - completion: the order loads finished
    #[arg(long, value_name = "ORDER", default_value = "presented")]
    #[arg(value_parser = ["presented", "completion"])]
    pub order: String,

    /// Number of parallel jobs for loading PDFs
    ///
    /// Default is the number of CPU cores. Use 1 for sequential loading.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Abort if any input fails to load
    ///
    /// By default failing inputs are skipped with a warning.
    #[arg(long)]
    pub strict: bool,

    /// Dry run - load inputs and show the merge order without writing output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show sizes, timings and debug logs
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Force overwrite of an existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite an existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Print a machine-readable JSON report to stdout
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// `inputs` are the resolved input paths from [`Cli::get_all_inputs`].
    ///
    /// # Errors
    ///
    /// Returns an error if a named option or a move is malformed, or if
    /// the resulting configuration fails validation.
    pub fn to_config(&self, inputs: Vec<PathBuf>) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;
        let load_order = LoadOrder::from_str(&self.order)?;

        let page_numbers = self
            .page_numbers
            .as_deref()
            .map(PageNumberAnchor::from_str)
            .transpose()?;

        let moves = self
            .moves
            .iter()
            .map(|spec| MoveSpec::from_str(spec))
            .collect::<Result<Vec<_>>>()?;

        let overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };

        let config = Config {
            inputs,
            output: self.output.clone(),
            output_dir: self.output_dir.clone(),
            page_numbers,
            compression,
            moves,
            load_order,
            jobs: self.jobs,
            strict: self.strict,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
            overwrite_mode,
        };

        config.validate().map_err(|e| {
            StitchError::invalid_config(format!("Configuration validation failed: {e}"))
        })?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Performs early validation that doesn't require file I/O.
    ///
    /// # Errors
    ///
    /// Returns an error if no inputs were given, the jobs count is zero,
    /// or a move is malformed.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(StitchError::invalid_config("No input files specified"));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(StitchError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        for spec in &self.moves {
            MoveSpec::from_str(spec)?;
        }

        Ok(())
    }

    /// Get all input paths, expanding globs.
    ///
    /// Direct inputs come first, followed by the entries of
    /// --input-list (if provided).
    ///
    /// # Errors
    ///
    /// Returns an error if the input list cannot be read, a glob is
    /// invalid or matches nothing, or no inputs remain.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut patterns = self.inputs.clone();

        if let Some(ref input_list_path) = self.input_list {
            patterns.extend(read_input_list(input_list_path).await?);
        }

        let paths = collect_paths_for_patterns(&patterns)?;

        if paths.is_empty() {
            return Err(StitchError::invalid_config("No input files specified"));
        }

        Ok(paths)
    }
}

/// Read input entries from a list file, or stdin for `-`.
async fn read_input_list(path: &Path) -> Result<Vec<String>> {
    let to_error = |source: std::io::Error| StitchError::FailedToReadInputList {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        return parse_input_list(BufReader::new(tokio::io::stdin()))
            .await
            .map_err(to_error);
    }

    let file = tokio::fs::File::open(path).await.map_err(to_error)?;
    parse_input_list(BufReader::new(file))
        .await
        .map_err(to_error)
}

/// Collect the non-empty, non-comment lines of an input list.
async fn parse_input_list<R>(reader: R) -> std::io::Result<Vec<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut entries = Vec::new();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        entries.push(line.to_string());
    }

    Ok(entries)
}
