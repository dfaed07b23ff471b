//! One-shot probe: fetch once and write a small sample, to check that the page
//! still has the expected shape before leaving the spider running.

use crate::error::FetchError;
use crate::models::NewsItem;
use crate::outputs::json::{day_dir, write_snapshot};
use crate::scrapers::NewsSource;
use chrono::{Local, NaiveDateTime, Timelike};
use std::error::Error;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// Subdirectory of the output dir that receives probe samples.
pub const PROBE_DIR: &str = "test_output";

const PREVIEW_COUNT: usize = 2;

/// Fetch once, keep the first `limit` entries that carry an id, and write them
/// to `{output_dir}/test_output/{date}/{HH}.json`.
///
/// # Arguments
///
/// * `source` - Where to fetch the telegraph list from
/// * `output_dir` - Base directory; the sample lands under `test_output/`
/// * `now` - Local time that names the date directory and hour file
/// * `limit` - Maximum number of items written
///
/// # Returns
///
/// The path of the sample file, or the fetch or write error.
#[instrument(level = "info", skip_all, fields(limit = limit))]
pub async fn run_probe<S: NewsSource>(
    source: &S,
    output_dir: &Path,
    now: NaiveDateTime,
    limit: usize,
) -> Result<PathBuf, Box<dyn Error>> {
    let raw_items = source.fetch().await.map_err(|e: FetchError| {
        error!(error = %e, drift = e.is_upstream_drift(), "Probe fetch failed");
        e
    })?;
    info!(count = raw_items.len(), "Probe fetched telegraph list");

    let sample: Vec<NewsItem> = raw_items
        .into_iter()
        .filter_map(|raw| NewsItem::from_raw(raw, &Local))
        .take(limit)
        .collect();

    let dir = day_dir(&output_dir.join(PROBE_DIR), now.date());
    let path = write_snapshot(&sample, &dir, now.hour()).await?;

    for item in sample.iter().take(PREVIEW_COUNT) {
        info!(
            "- {} | {}",
            item.time_str,
            item.title.as_deref().unwrap_or("")
        );
    }
    Ok(path)
}
