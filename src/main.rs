//! # Telegraph Spider
//!
//! Polls the CLS telegraph flash-news page, keeps every item it has not seen
//! yet today, and writes an hourly JSON snapshot of the day's collection.
//!
//! ## Usage
//!
//! ```sh
//! telegraph_spider -o ./telegraph
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: one GET per cycle, JSON cut out of the page's `__NEXT_DATA__` block
//! 2. **Accumulating**: entries deduplicated by id into the day's buffer
//! 3. **Persisting**: when the wall-clock hour changes, the sorted buffer is
//!    written to `{date}/{HH}.json`; a new date resets the buffer
//! 4. **Stopping**: Ctrl-C ends the loop after one final save

use clap::Parser;
use std::error::Error;
use tokio::sync::oneshot;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod accumulator;
mod cli;
mod error;
mod models;
mod outputs;
mod persister;
mod probe;
mod scrapers;
mod spider;

use cli::Cli;
use scrapers::telegraph::TelegraphScraper;
use spider::{Clock, Schedule, Spider, SystemClock};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let scraper = TelegraphScraper::new(args.url.clone(), &args.user_agent, args.timeout())?;
    info!(url = %scraper.url(), "Telegraph client ready");

    if args.probe {
        let path =
            probe::run_probe(&scraper, &args.output_dir, SystemClock.now(), args.probe_limit)
                .await?;
        info!(path = %path.display(), "Probe sample saved");
        return Ok(());
    }

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            error!("Failed to listen for ctrl-c");
            return;
        }
        let _ = stop_tx.send(());
    });

    let schedule = Schedule {
        poll_interval: args.poll_interval(),
        error_delay: args.error_delay(),
    };
    let mut spider = Spider::new(scraper, SystemClock, &args.output_dir, schedule);

    spider.start().await;
    spider
        .run(async {
            // A dropped sender means the signal listener failed; keep polling.
            if stop_rx.await.is_err() {
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}
