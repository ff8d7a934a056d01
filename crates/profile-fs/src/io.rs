//! Atomic I/O operations and profile file discovery

use std::fs::{self, OpenOptions};
use std::io::Write;

use fs2::FileExt;

use crate::{Error, NormalizedPath, Result};

/// Write content atomically to a file with locking.
///
/// Uses write-to-temp-then-rename so a manifest is never left half-written.
/// An advisory lock is held on the temp file while writing.
pub fn write_atomic(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();

    if let Some(parent) = native_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    // Temp file in the same directory so the rename stays on one filesystem
    let temp_name = format!(
        ".{}.{}.tmp",
        native_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    let temp_path = native_path.with_file_name(&temp_name);

    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| Error::io(&temp_path, e))?;

    temp_file.lock_exclusive().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(&temp_path, e))?;
    temp_file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    temp_file.unlock().map_err(|_| Error::LockFailed {
        path: native_path.clone(),
    })?;
    drop(temp_file);

    fs::rename(&temp_path, &native_path).map_err(|e| Error::io(&native_path, e))?;

    tracing::debug!(path = %path, bytes = content.len(), "Wrote file atomically");
    Ok(())
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Read text content, returning `None` when the file does not exist.
pub fn read_text_if_exists(path: &NormalizedPath) -> Result<Option<String>> {
    match fs::read_to_string(path.to_native()) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::io(path.to_native(), e)),
    }
}

/// Recursively collect files with the given extension below `dir`.
///
/// Hidden files and directories are skipped. The result is sorted so that
/// scans are reproducible regardless of directory iteration order. A missing
/// directory yields an empty list.
pub fn files_with_extension(dir: &NormalizedPath, extension: &str) -> Result<Vec<NormalizedPath>> {
    let mut found = Vec::new();
    if !dir.is_dir() {
        return Ok(found);
    }
    collect_files(dir, extension, &mut found)?;
    found.sort();
    Ok(found)
}

fn collect_files(
    dir: &NormalizedPath,
    extension: &str,
    found: &mut Vec<NormalizedPath>,
) -> Result<()> {
    let entries = fs::read_dir(dir.to_native()).map_err(|e| Error::io(dir.to_native(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir.to_native(), e))?;
        let path = NormalizedPath::new(entry.path());
        if path.is_hidden() {
            continue;
        }

        let file_type = entry
            .file_type()
            .map_err(|e| Error::io(entry.path(), e))?;
        if file_type.is_dir() {
            collect_files(&path, extension, found)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            found.push(path);
        }
    }

    Ok(())
}
