//! Writing response bodies to disk.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::Endpoint;
use crate::config::defaults::{EXPORT_EXTENSION, MAX_FILE_NAME_LEN};

use super::sanitize::{sanitize_file_name, truncate_at_char_boundary};

/// Error writing an exported response.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The target's parent directory could not be created.
    #[error("Failed to create export directory '{}': {source}", path.display())]
    CreateDir {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("Failed to write response to '{}': {source}", path.display())]
    Write {
        /// Target file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Resolves where `endpoint`'s response should be written, if anywhere.
///
/// An endpoint's own `saveResponse` path wins. Otherwise, when a response
/// directory is configured, the file is `<dir>/<sanitized name>.json`, with
/// the stem shortened so the whole file name stays within
/// [`MAX_FILE_NAME_LEN`] bytes. Endpoints with the same name share a target
/// and overwrite each other.
#[must_use]
pub fn export_target(endpoint: &Endpoint, save_dir: Option<&Path>) -> Option<PathBuf> {
    endpoint.save_response.clone().or_else(|| {
        save_dir.map(|dir| {
            let mut stem = sanitize_file_name(&endpoint.name);
            truncate_at_char_boundary(&mut stem, MAX_FILE_NAME_LEN - EXPORT_EXTENSION.len() - 1);
            dir.join(format!("{stem}.{EXPORT_EXTENSION}"))
        })
    })
}

/// Writes `body` verbatim to the endpoint's export target.
///
/// Missing parent directories are created. An existing file is truncated.
/// Returns the path written, or `None` when nothing is configured.
///
/// # Errors
///
/// Returns [`ExportError`] if the directory or file cannot be written.
pub fn export_response(
    body: &[u8],
    endpoint: &Endpoint,
    save_dir: Option<&Path>,
) -> Result<Option<PathBuf>, ExportError> {
    let Some(target) = export_target(endpoint, save_dir) else {
        return Ok(None);
    };

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ExportError::CreateDir {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    std::fs::write(&target, body).map_err(|e| ExportError::Write {
        path: target.clone(),
        source: e,
    })?;

    tracing::debug!("Exported response to {}", target.display());
    Ok(Some(target))
}
