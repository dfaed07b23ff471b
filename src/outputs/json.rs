//! JSON snapshot files.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── 2025-05-06/
//!     ├── 09.json
//!     └── 10.json
//! ```
//!
//! Each file is a full snapshot of the day's buffer at the time it was
//! written, indented with four spaces, non-ASCII text kept verbatim.

use crate::error::PersistError;
use crate::models::NewsItem;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Directory holding the snapshots of `date` under `root`.
pub fn day_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(date.format("%Y-%m-%d").to_string())
}

/// File name of the snapshot written during `hour` (`00`..`23`).
pub fn hour_file_name(hour: u32) -> String {
    format!("{hour:02}.json")
}

/// Serialize items as a four-space indented JSON array.
pub fn to_pretty_json(items: &[NewsItem]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    items.serialize(&mut ser)?;
    Ok(buf)
}

/// Write `items` to `{dir}/{HH}.json`, creating `dir` if needed and replacing
/// any existing file of the same name.
///
/// # Arguments
///
/// * `items` - The snapshot contents, already in the order to write
/// * `dir` - The day directory, e.g. `{output_dir}/2025-05-06`
/// * `hour` - Hour of day (`0`..=`23`) that names the file
///
/// # Returns
///
/// The path written, or a [`PersistError`] if the directory or file could
/// not be created.
#[instrument(level = "info", skip_all, fields(dir = %dir.display(), hour = hour))]
pub async fn write_snapshot(
    items: &[NewsItem],
    dir: &Path,
    hour: u32,
) -> Result<PathBuf, PersistError> {
    if let Err(source) = fs::create_dir_all(dir).await {
        error!(error = %source, "Failed to create snapshot dir");
        return Err(PersistError::CreateDir {
            path: dir.to_path_buf(),
            source,
        });
    }

    let json = to_pretty_json(items)?;
    let path = dir.join(hour_file_name(hour));
    fs::write(&path, json)
        .await
        .map_err(|source| PersistError::Write {
            path: path.clone(),
            source,
        })?;

    info!(path = %path.display(), count = items.len(), "Wrote snapshot");
    Ok(path)
}
