//! JSON record file writer

use crate::model::Record;
use crate::ScrapeError;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Writes records to `path` as a pretty-printed JSON array
///
/// Each element is wrapped under its mode key: `[{"company": {...}}, ...]`.
/// The data goes to a temporary file in the target directory which is then
/// renamed over `path`, so on any error no partial file is left behind.
/// Missing parent directories are created.
///
/// # Arguments
///
/// * `records` - The records in output order
/// * `path` - Destination file
///
/// # Returns
///
/// * `Ok(())` - The file is in place
/// * `Err(ScrapeError::Write)` - The destination could not be written
pub fn write_records(records: &[Record], path: &Path) -> Result<(), ScrapeError> {
    let write_error = |source: std::io::Error| ScrapeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_error)?;

    let file = NamedTempFile::new_in(dir).map_err(write_error)?;
    write_json(records, BufWriter::new(file.as_file()), path)?;

    file.persist(path).map_err(|e| write_error(e.error))?;

    tracing::info!("Wrote {} record(s) to {}", records.len(), path.display());
    Ok(())
}

/// Serializes `records` into `writer` and flushes it
///
/// I/O failures surface as `ScrapeError::Write` for `path`, including those
/// hit while serde_json fills the buffer.
fn write_json<W: Write>(records: &[Record], mut writer: W, path: &Path) -> Result<(), ScrapeError> {
    let write_error = |source: std::io::Error| ScrapeError::Write {
        path: path.to_path_buf(),
        source,
    };

    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| {
        if e.is_io() {
            write_error(e.into())
        } else {
            ScrapeError::Serialize(e)
        }
    })?;
    writer.write_all(b"\n").map_err(write_error)?;
    writer.flush().map_err(write_error)
}
