//! pdfstitch - Queue, reorder and stitch PDF files into a single document.
//!
//! Loads the inputs in parallel, applies the requested reorders, and
//! writes the concatenated document with optional page numbers.

mod cli;

use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfstitch::config::{Config, OverwriteMode};
use pdfstitch::error::StitchError;
use pdfstitch::io::{PdfWriter, WriteStatistics};
use pdfstitch::loader::LoadReport;
use pdfstitch::merge::{MergeOptions, MergeStatistics};
use pdfstitch::output::{
    OutputFormatter, display_load_report, display_merge_summary, display_queue,
};
use pdfstitch::queue::QueueStats;
use pdfstitch::session::StitchSession;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Install the log subscriber on stderr.
///
/// `RUST_LOG` takes precedence; otherwise only warnings are shown, or
/// debug events from this crate with `--verbose`.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "pdfstitch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Machine-readable summary printed with `--json`.
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    load: &'a LoadReport,
    queue: QueueStats,
    dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge: Option<&'a MergeStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a Path>,
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), StitchError> {
    cli.validate()?;

    let all_inputs = cli.get_all_inputs().await?;
    let config = cli.to_config(all_inputs)?;

    let formatter = OutputFormatter::from_config(&config);

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfstitch::NAME, pdfstitch::VERSION));
        formatter.blank_line();
    }

    formatter.info(&format!("Loading {} file(s)...", config.inputs.len()));

    let mut session = StitchSession::new()
        .with_workers(config.effective_jobs())
        .with_load_order(config.load_order);
    let mut report = session.add_files(&config.inputs).await;

    display_load_report(&formatter, &report);

    if config.strict && !report.is_complete() {
        let failure = report.failures.remove(0);
        return Err(failure.error);
    }

    for spec in &config.moves {
        session.move_to_index(spec.from, spec.to)?;
    }

    if formatter.should_print() {
        display_queue(&formatter, session.queue());
        formatter.blank_line();
    }

    if config.dry_run {
        if !session.can_merge() {
            formatter.warning(&format!(
                "At least 2 documents are required to merge, found {}",
                session.len()
            ));
        }

        if config.json {
            print_json(&RunReport {
                load: &report,
                queue: session.stats(),
                dry_run: true,
                merge: None,
                output: None,
            })?;
        }

        formatter.success("Dry run completed successfully");
        formatter.info("  Run without --dry-run to create the stitched PDF");
        return Ok(());
    }

    formatter.info("Stitching documents...");

    let options = merge_options(&config);
    let output = session.merge_async(options).await?;

    let output_path = config
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.join(&output.file_name));

    let writer = PdfWriter::new();
    writer.can_write(&output_path).await?;
    handle_output_overwrite(&writer, &output_path, config.overwrite_mode, &formatter).await?;

    formatter.info(&format!("Writing to: {}", output_path.display()));
    let write_stats = writer
        .save_with_stats(output.bytes, &output_path)
        .await?;

    if config.json {
        print_json(&RunReport {
            load: &report,
            queue: session.stats(),
            dry_run: false,
            merge: Some(&output.statistics),
            output: Some(&write_stats.output_path),
        })?;
    } else {
        report_written(&formatter, &output.statistics, &write_stats);
    }

    Ok(())
}

fn merge_options(config: &Config) -> MergeOptions {
    let options = MergeOptions::new().with_compression(config.compression);

    match config.page_numbers {
        Some(anchor) => options.with_page_numbers(anchor),
        None => options,
    }
}

fn report_written(
    formatter: &OutputFormatter,
    statistics: &MergeStatistics,
    write_stats: &WriteStatistics,
) {
    if formatter.should_print() {
        formatter.blank_line();
        display_merge_summary(formatter, statistics, write_stats);
    }
}

fn print_json(report: &RunReport<'_>) -> Result<(), StitchError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|err| StitchError::other(format!("Failed to encode report: {err}")))?;
    println!("{json}");
    Ok(())
}

/// Handle output file overwrite scenarios.
async fn handle_output_overwrite(
    writer: &PdfWriter,
    path: &Path,
    mode: OverwriteMode,
    formatter: &OutputFormatter,
) -> Result<(), StitchError> {
    if !writer.exists(path).await {
        return Ok(());
    }

    match mode {
        OverwriteMode::Force => Ok(()),
        OverwriteMode::NoClobber => Err(StitchError::output_exists(path.to_path_buf())),
        OverwriteMode::Prompt => {
            // No one to ask in quiet mode.
            if formatter.is_quiet() {
                return Err(StitchError::output_exists(path.to_path_buf()));
            }

            formatter.warning(&format!("Output file already exists: {}", path.display()));

            use std::io::{self, Write};
            print!("Overwrite? [y/N]: ");
            io::stdout().flush().ok();

            let mut response = String::new();
            io::stdin()
                .read_line(&mut response)
                .map_err(|err| StitchError::other(format!("Failed to read input: {err}")))?;

            let response = response.trim().to_lowercase();
            if response == "y" || response == "yes" {
                Ok(())
            } else {
                Err(StitchError::Cancelled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfstitch::config::{CompressionLevel, PageNumberAnchor};
    use tempfile::{NamedTempFile, TempDir};

    #[tokio::test]
    async fn test_handle_output_overwrite_force() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = handle_output_overwrite(
            &PdfWriter::new(),
            temp_file.path(),
            OverwriteMode::Force,
            &OutputFormatter::quiet(),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_handle_output_overwrite_no_clobber() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = handle_output_overwrite(
            &PdfWriter::new(),
            temp_file.path(),
            OverwriteMode::NoClobber,
            &OutputFormatter::quiet(),
        )
        .await;
        assert!(matches!(result, Err(StitchError::OutputExists { .. })));
    }

    #[tokio::test]
    async fn test_handle_output_overwrite_prompt_when_quiet() {
        let temp_file = NamedTempFile::new().unwrap();
        let result = handle_output_overwrite(
            &PdfWriter::new(),
            temp_file.path(),
            OverwriteMode::Prompt,
            &OutputFormatter::quiet(),
        )
        .await;
        assert!(matches!(result, Err(StitchError::OutputExists { .. })));
    }

    #[tokio::test]
    async fn test_handle_output_overwrite_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let result = handle_output_overwrite(
            &PdfWriter::new(),
            &temp_dir.path().join("fresh.pdf"),
            OverwriteMode::Prompt,
            &OutputFormatter::quiet(),
        )
        .await;
        assert!(result.is_ok());
    }

    #[test]
    fn test_merge_options_from_config() {
        let config = Config {
            compression: CompressionLevel::High,
            page_numbers: Some(PageNumberAnchor::TopCenter),
            ..Default::default()
        };
        let options = merge_options(&config);
        assert_eq!(options.compression, CompressionLevel::High);
        assert_eq!(options.page_numbers, Some(PageNumberAnchor::TopCenter));

        let plain = merge_options(&Config::default());
        assert_eq!(plain.page_numbers, None);
    }
}
