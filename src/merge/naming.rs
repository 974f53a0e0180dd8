//! Suggested names for stitched output.

use chrono::{DateTime, Utc};

/// Suggested file name for a merge finished at `now`:
/// `merged_<YYYY-MM-DD>_<unix-millis>.pdf`.
///
/// The date is the UTC calendar date; the millisecond timestamp keeps
/// names from successive merges apart.
pub fn output_file_name(now: DateTime<Utc>) -> String {
    format!(
        "merged_{}_{}.pdf",
        now.format("%Y-%m-%d"),
        now.timestamp_millis()
    )
}

/// Suggested file name for a merge finishing now.
pub fn suggested_file_name() -> String {
    output_file_name(Utc::now())
}
