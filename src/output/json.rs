//! JSON artifact writer
//!
//! Artifacts are written to a hidden sibling file, flushed to disk and then
//! renamed over the target, so readers only ever see a complete document.
//! The directory is synced after the rename so the new entry survives a crash.

use crate::model::{Country, CountryIndexEntry};
use crate::output::{OutputError, OutputResult};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes the raw country index
pub fn write_index(path: &Path, entries: &[CountryIndexEntry]) -> OutputResult<()> {
    write_json_atomic(path, entries)
}

/// Writes the nested country/port dataset
pub fn write_countries(path: &Path, countries: &[Country]) -> OutputResult<()> {
    write_json_atomic(path, countries)
}

/// Serializes `value` as indented JSON and atomically replaces `path`
///
/// The parent directory is created when missing. On failure the temporary
/// file is removed and any previous artifact at `path` is left untouched.
pub fn write_json_atomic<T>(path: &Path, value: &T) -> OutputResult<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_path_for(path)?;
    let result = write_then_rename(&temp_path, path, value);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn temp_path_for(path: &Path) -> OutputResult<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| OutputError::InvalidPath(path.display().to_string()))?;
    Ok(path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy())))
}

fn write_then_rename<T>(temp_path: &Path, path: &Path, value: &T) -> OutputResult<()>
where
    T: Serialize + ?Sized,
{
    let mut writer = BufWriter::new(File::create(temp_path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    fs::rename(temp_path, path)?;
    sync_parent_dir(path)?;
    Ok(())
}

/// Flushes the directory entry created by the rename
#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> OutputResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(parent)?.sync_all()?;
    Ok(())
}

// Directories cannot be opened as files here; the rename is the best we get.
#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> OutputResult<()> {
    Ok(())
}
