use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::error::StorageError;

/// Ensures `base/name` exists as a directory, creating missing parents.
///
/// `name` is joined verbatim; it may contain separators, in which case the
/// nested directories are created as well. An already existing directory is not
/// an error. Failures are logged and returned so the caller can skip the
/// subtree.
pub fn ensure_directory<P: AsRef<Path>>(base: P, name: &str) -> Result<PathBuf, StorageError> {
    create_directory(base.as_ref().join(name))
}

/// Creates `path` and any missing parents. Same logging and error as
/// [`ensure_directory`], for callers that already hold the full path.
pub fn create_directory(path: PathBuf) -> Result<PathBuf, StorageError> {
    if let Err(e) = std::fs::create_dir_all(&path) {
        error!("Error creating directory '{}': {}", path.display(), e);
        return Err(StorageError::CreateDirectory { path, source: e });
    }

    debug!("Directory ready: {}", path.display());
    Ok(path)
}

/// Writes `content` to `path`, replacing any existing file.
pub fn write_text_file(path: &Path, content: &str) -> Result<(), StorageError> {
    std::fs::write(path, content).map_err(|e| StorageError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}
