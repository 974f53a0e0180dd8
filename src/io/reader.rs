//! Reading input files from disk.
//!
//! Files are read whole into memory; parsing is left to a
//! [`DocumentLoader`](crate::loader::DocumentLoader) so that the same
//! loading path serves both files and raw byte buffers.

use std::path::{Path, PathBuf};

use crate::error::{Result, StitchError};

/// An input file read into memory, not yet parsed.
#[derive(Debug, Clone)]
pub struct InputFile {
    /// Path the file was read from.
    pub path: PathBuf,

    /// Display name (the file name component of the path).
    pub name: String,

    /// Raw file contents.
    pub bytes: Vec<u8>,
}

/// Display name for a path: its file name, or the whole path if it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read an input file into memory.
///
/// # Errors
///
/// Returns an error if:
/// - File does not exist
/// - Path is not a regular file
/// - File is empty
/// - File cannot be read
pub async fn read_input(path: &Path) -> Result<InputFile> {
    if !path.exists() {
        return Err(StitchError::file_not_found(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(StitchError::not_a_file(path.to_path_buf()));
    }

    let name = display_name(path);
    let bytes = tokio::fs::read(path).await?;

    if bytes.is_empty() {
        return Err(StitchError::load_failed(name, "File is empty"));
    }

    Ok(InputFile {
        path: path.to_path_buf(),
        name,
        bytes,
    })
}
