//! Source to destination path mapping
//!
//! `dest_root / relative(source, source_root)` with the extension replaced by `.mp3`.

use crate::error::{ConvertError, Result};
use std::path::{Component, Path, PathBuf};

/// Extension of every produced file
pub const TARGET_EXTENSION: &str = "mp3";

/// Compute the destination path for `source`.
///
/// Pure: touches no files. `source` must live strictly below `source_root`.
pub fn resolve(source: &Path, source_root: &Path, dest_root: &Path) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(source_root)
        .map_err(|_| path_error(source, format!("not inside {}", source_root.display())))?;

    if relative.as_os_str().is_empty() || relative.file_name().is_none() {
        return Err(path_error(source, "does not name a file below the source root"));
    }

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(path_error(source, "escapes the source root"));
    }

    Ok(dest_root.join(relative).with_extension(TARGET_EXTENSION))
}

/// Create the destination's parent directories.
///
/// Safe to call concurrently: an already existing directory is not an error.
pub fn ensure_parent(destination: &Path) -> Result<()> {
    match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| ConvertError::output_error(parent, e)),
        _ => Ok(()),
    }
}

fn path_error(source: &Path, reason: impl Into<String>) -> ConvertError {
    ConvertError::Path {
        path: source.to_path_buf(),
        reason: reason.into(),
    }
}
