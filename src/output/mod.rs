//! Output formatting and display for pdfstitch.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Load reports ("N added, M failed")
//! - Queue listings and merge summaries
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::output::OutputFormatter;
//! use pdfstitch::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Loading documents");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::io::WriteStatistics;
use crate::loader::LoadReport;
use crate::merge::MergeStatistics;
use crate::queue::DocumentQueue;
use crate::utils::format_bytes;

/// Display the outcome of a batch load.
pub fn display_load_report(formatter: &OutputFormatter, report: &LoadReport) {
    for failure in &report.failures {
        formatter.warning(&format!("Skipping {}: {}", failure.name, failure.error));
    }

    if report.failed() > 0 {
        formatter.warning(&format!(
            "{} file(s) failed to load",
            report.failed()
        ));
    }

    formatter.info(&format!("Loaded documents: {}", report.summary_line()));

    for summary in &report.added {
        formatter.detail(
            &summary.name,
            &format!(
                "{} page(s), {}",
                summary.page_count,
                format_bytes(summary.byte_size)
            ),
        );
    }
}

/// Display the queue in merge order, followed by its statistics.
pub fn display_queue(formatter: &OutputFormatter, queue: &DocumentQueue) {
    formatter.section("Merge order:");

    for (index, record) in queue.iter().enumerate() {
        formatter.list_item(
            index + 1,
            &format!(
                "{} ({} page(s), {})",
                record.name(),
                record.page_count(),
                format_bytes(record.byte_size())
            ),
        );
    }

    let stats = queue.stats();
    formatter.info(&format!(
        "{} document(s), {} page(s), {}",
        stats.count,
        stats.total_pages,
        format_bytes(stats.total_size_bytes)
    ));
}

/// Display the outcome of a merge and the write that followed it.
pub fn display_merge_summary(
    formatter: &OutputFormatter,
    merge: &MergeStatistics,
    write: &WriteStatistics,
) {
    formatter.success(&format!(
        "Stitched {} document(s) into {} page(s): {}",
        merge.documents_merged,
        merge.total_pages,
        write.output_path.display()
    ));

    formatter.separator();
    formatter.detail("Size", &write.format_file_size());
    formatter.detail("Compression", merge.compression.as_str());
    formatter.detail("Page numbers", if merge.page_numbers { "yes" } else { "no" });
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", merge.merge_time.as_secs_f64()),
    );
    formatter.detail(
        "Write time",
        &format!("{:.2}s", write.write_time.as_secs_f64()),
    );
}
