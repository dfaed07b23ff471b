//! The polling loop.
//!
//! ```text
//! STARTING --start()--> POLLING --shutdown--> STOPPED
//!                        ^    |
//!                        +----+  fetch -> ingest -> save on hour change -> sleep
//! ```
//!
//! Fetch failures count as zero new items; save failures shorten the next wait
//! to the error delay and are retried on the following cycle. Nothing in a
//! single cycle stops the loop; only the shutdown future does, and it is
//! followed by one last unconditional save.

use crate::accumulator::Accumulator;
use crate::error::{FetchError, PersistError};
use crate::persister::Persister;
use crate::scrapers::NewsSource;
use chrono::{Local, NaiveDateTime, Timelike};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Wall-clock and sleeping, injectable so tests can simulate hours and days.
pub trait Clock {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    async fn sleep(&self, duration: Duration);
}

/// Local system time and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Waits between cycles.
#[derive(Debug, Clone, Copy)]
pub struct Schedule {
    /// Wait after a normal cycle.
    pub poll_interval: Duration,
    /// Wait after a cycle whose save failed.
    pub error_delay: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            error_delay: Duration::from_secs(10),
        }
    }
}

/// What a single cycle did.
#[derive(Debug, Default, PartialEq)]
pub struct CycleReport {
    pub accepted: usize,
    pub saved: Option<PathBuf>,
}

/// Owns the day's state and drives fetch, ingest and save cycles.
///
/// `S` is polled once per cycle; `C` supplies the wall-clock hour that decides
/// when a snapshot is due, and the wait between cycles.
pub struct Spider<S, C> {
    source: S,
    clock: C,
    schedule: Schedule,
    accumulator: Accumulator,
    persister: Persister,
    last_saved_hour: u32,
}

impl<S, C> Spider<S, C>
where
    S: NewsSource,
    C: Clock,
{
    pub fn new(source: S, clock: C, output_dir: impl Into<PathBuf>, schedule: Schedule) -> Self {
        let now = clock.now();
        Self {
            source,
            clock,
            schedule,
            accumulator: Accumulator::new(),
            persister: Persister::new(output_dir, now.date()),
            last_saved_hour: now.hour(),
        }
    }

    /// Initial fetch. Everything it returns is new since the seen set is empty.
    pub async fn start(&mut self) -> usize {
        info!(output_dir = %self.persister.root().display(), "Telegraph spider starting");

        let loaded = match self.source.fetch().await {
            Ok(items) => self.accumulator.ingest(items),
            Err(e) => {
                log_fetch_error(&e);
                0
            }
        };
        info!(count = loaded, "Initial fetch complete");

        self.last_saved_hour = self.clock.now().hour();
        loaded
    }

    /// One cycle: fetch, ingest, and save when the wall-clock hour changed.
    pub async fn run_cycle(&mut self) -> Result<CycleReport, PersistError> {
        let now = self.clock.now();

        let accepted = match self.source.fetch().await {
            Ok(items) => {
                let accepted = self.accumulator.ingest(items);
                if accepted > 0 {
                    info!(count = accepted, total = self.accumulator.len(), "Found new items");
                } else {
                    info!(total = self.accumulator.len(), "Polling: no new items");
                }
                accepted
            }
            Err(e) => {
                log_fetch_error(&e);
                0
            }
        };

        let mut saved = None;
        if now.hour() != self.last_saved_hour {
            let path = self.persister.save(&mut self.accumulator, now).await?;
            self.last_saved_hour = now.hour();
            saved = Some(path);
        }

        Ok(CycleReport { accepted, saved })
    }

    /// Poll until `shutdown` resolves, then save once more.
    ///
    /// The shutdown future is only observed while waiting between cycles, so
    /// an in-flight cycle always completes.
    ///
    /// # Arguments
    ///
    /// * `shutdown` - Future that resolves when the spider should stop
    ///
    /// # Returns
    ///
    /// The path of the final snapshot, or the error that prevented writing it.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<PathBuf, PersistError>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let delay = match self.run_cycle().await {
                Ok(report) => {
                    if let Some(path) = &report.saved {
                        debug!(path = %path.display(), accepted = report.accepted, "Hourly snapshot written");
                    }
                    self.schedule.poll_interval
                }
                Err(e) => {
                    error!(error = %e, "Snapshot save failed; data is only in memory until the next successful save");
                    self.schedule.error_delay
                }
            };

            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("Stop requested");
                    break;
                }
                _ = self.clock.sleep(delay) => {}
            }
        }

        let now = self.clock.now();
        match self.persister.save(&mut self.accumulator, now).await {
            Ok(path) => {
                self.last_saved_hour = now.hour();
                info!(path = %path.display(), "Final snapshot saved; spider stopped");
                Ok(path)
            }
            Err(e) => {
                error!(error = %e, total = self.accumulator.len(), "Final snapshot failed; collected items are lost");
                Err(e)
            }
        }
    }
}

fn log_fetch_error(e: &FetchError) {
    if e.is_upstream_drift() {
        warn!(error = %e, "Fetch failed; the telegraph page layout may have changed upstream");
    } else {
        warn!(error = %e, "Fetch failed");
    }
}
