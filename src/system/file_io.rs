//! UTF-8 file access for the rewrite pipeline. Reads validate the encoding
//! up front; writes go through a temporary file in the target directory and
//! are renamed into place, so a failed run never leaves a half-written file.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Represents errors that can occur while reading or replacing a target file.
#[derive(Error, Debug)]
pub enum FileIoError {
    /// A filesystem I/O error occurred.
    #[error("Filesystem Error: {0}")]
    Io(#[from] std::io::Error),
    /// The temporary file could not be renamed over the target.
    #[error("Error replacing target file: {0}")]
    TempFile(#[from] tempfile::PersistError),
    /// The target file exists but is not valid UTF-8.
    #[error("File '{path}' is not valid UTF-8 (invalid byte at offset {offset}).")]
    InvalidUtf8 {
        /// The file that failed to decode.
        path: PathBuf,
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },
}

pub type FileIoResult<T> = Result<T, FileIoError>;

/// Reads `path` into a `String`, reporting the offset of the first invalid
/// byte if the file is not UTF-8.
pub fn read_to_string(path: &Path) -> FileIoResult<String> {
    let bytes = fs::read(path)?;
    String::from_utf8(bytes).map_err(|err| FileIoError::InvalidUtf8 {
        path: path.to_path_buf(),
        offset: err.utf8_error().valid_up_to(),
    })
}

/// Writes `content` to `path` atomically.
///
/// The content is first written to a temporary file in the same directory,
/// then renamed over the target. The rename is the only step that touches
/// `path`, so readers see either the old content or the new one, never a
/// partial write.
pub fn write_atomic(path: &Path, content: &str) -> FileIoResult<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut temp_file = NamedTempFile::new_in(parent.unwrap_or_else(|| Path::new(".")))?;

    temp_file.write_all(content.as_bytes())?;
    temp_file.flush()?;

    // Carry the target's permissions over; temp files default to 0600.
    match fs::metadata(path) {
        Ok(metadata) => fs::set_permissions(temp_file.path(), metadata.permissions())?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }

    temp_file.persist(path)?;

    log::debug!("Wrote {} bytes to '{}'.", content.len(), path.display());
    Ok(())
}

// MARK: --- UNIT TESTS ---
