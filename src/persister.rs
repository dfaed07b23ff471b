//! Hourly persistence and day rollover.
//!
//! A save writes the whole day's buffer, sorted by `ctime`, to
//! `{root}/{YYYY-MM-DD}/{HH}.json`. The buffer is not cleared by a save, so
//! every hourly file is a superset of the previous one.
//!
//! # Rollover
//!
//! The day boundary is detected by comparing the wall-clock date with the date
//! the persister last worked on. The start date is taken when the persister is
//! built, so a restart on the same day never discards anything. Before the
//! buffer is reset, it is flushed one last time into the previous day's
//! directory so items collected after that day's last hourly save survive.

use crate::accumulator::Accumulator;
use crate::error::PersistError;
use crate::outputs::json::{day_dir, write_snapshot};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument, warn};

/// Hour used for the closing flush of a day that never had an hourly save.
const LAST_HOUR: u32 = 23;

/// Writes hourly snapshots under `root` and tracks which day they belong to.
#[derive(Debug)]
pub struct Persister {
    root: PathBuf,
    current_date: NaiveDate,
    /// Hour of the last snapshot written for `current_date`.
    last_written_hour: Option<u32>,
}

impl Persister {
    pub fn new(root: impl Into<PathBuf>, today: NaiveDate) -> Self {
        Self {
            root: root.into(),
            current_date: today,
            last_written_hour: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure today's directory exists and reset the accumulator if the date
    /// moved since the last call.
    ///
    /// Returns `true` when a rollover happened.
    #[instrument(level = "info", skip_all, fields(date = %now.date()))]
    pub async fn maybe_rotate_day(
        &mut self,
        accumulator: &mut Accumulator,
        now: NaiveDateTime,
    ) -> Result<bool, PersistError> {
        let today = now.date();
        let rotated = today != self.current_date;

        if rotated {
            self.flush_closing_day(accumulator).await;
            accumulator.reset();
            info!(
                previous = %self.current_date,
                "Entered a new day; buffer and seen ids reset"
            );
            self.current_date = today;
            self.last_written_hour = None;
        }

        let dir = day_dir(&self.root, today);
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| PersistError::CreateDir { path: dir, source })?;
        Ok(rotated)
    }

    /// Sort the buffer and write it to the snapshot file for `now`'s hour.
    ///
    /// Runs the rollover check first. Returns the path written.
    #[instrument(level = "info", skip_all, fields(at = %now))]
    pub async fn save(
        &mut self,
        accumulator: &mut Accumulator,
        now: NaiveDateTime,
    ) -> Result<PathBuf, PersistError> {
        self.maybe_rotate_day(accumulator, now).await?;

        accumulator.sort_by_ctime();
        let dir = day_dir(&self.root, self.current_date);
        let path = write_snapshot(accumulator.items(), &dir, now.hour()).await?;
        self.last_written_hour = Some(now.hour());

        info!(path = %path.display(), total = accumulator.len(), "Saved daily snapshot");
        Ok(path)
    }

    async fn flush_closing_day(&self, accumulator: &mut Accumulator) {
        if accumulator.is_empty() {
            return;
        }
        let hour = self.last_written_hour.unwrap_or(LAST_HOUR);
        let dir = day_dir(&self.root, self.current_date);

        accumulator.sort_by_ctime();
        match write_snapshot(accumulator.items(), &dir, hour).await {
            Ok(path) => {
                info!(path = %path.display(), total = accumulator.len(), "Flushed closing day")
            }
            Err(e) => {
                error!(error = %e, date = %self.current_date, "Failed to flush closing day; its late items are lost");
            }
        }
        if self.last_written_hour.is_none() {
            warn!(date = %self.current_date, hour, "Day closed without an hourly save");
        }
    }
}
