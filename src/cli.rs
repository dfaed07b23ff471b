//! Command-line interface definitions for the telegraph spider.
//!
//! Every option has a default, so running the binary with no arguments polls
//! the CLS telegraph page and writes snapshots under the current directory.
//! The URL and output directory can also come from environment variables.

use crate::scrapers::telegraph::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, TELEGRAPH_URL};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Command-line arguments for the telegraph spider.
///
/// # Examples
///
/// ```sh
/// # Poll forever, writing ./2025-05-06/10.json etc.
/// telegraph_spider
///
/// # Write somewhere else and poll every 30 seconds
/// telegraph_spider -o /var/lib/telegraph --poll-interval-secs 30
///
/// # Check the page once and write a 5-item sample to ./test_output/
/// telegraph_spider --probe
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Page to poll
    #[arg(long, env = "TELEGRAPH_URL", default_value = TELEGRAPH_URL)]
    pub url: Url,

    /// Directory that receives the per-day snapshot directories
    #[arg(short, long, env = "TELEGRAPH_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Seconds to wait between polls
    #[arg(long, default_value_t = 60)]
    pub poll_interval_secs: u64,

    /// Seconds to wait after a cycle whose save failed
    #[arg(long, default_value_t = 10)]
    pub error_delay_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Fetch once, write a small sample under `test_output/` and exit
    #[arg(long)]
    pub probe: bool,

    /// Number of items written by `--probe`
    #[arg(long, default_value_t = 5)]
    pub probe_limit: usize,
}

impl Cli {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn error_delay(&self) -> Duration {
        Duration::from_secs(self.error_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["telegraph_spider"]);

        assert_eq!(cli.url.as_str(), TELEGRAPH_URL);
        assert_eq!(cli.output_dir, PathBuf::from("."));
        assert_eq!(cli.poll_interval(), Duration::from_secs(60));
        assert_eq!(cli.error_delay(), Duration::from_secs(10));
        assert_eq!(cli.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(cli.user_agent, DEFAULT_USER_AGENT);
        assert!(!cli.probe);
        assert_eq!(cli.probe_limit, 5);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "telegraph_spider",
            "-o",
            "/tmp/telegraph",
            "--poll-interval-secs",
            "30",
            "--probe",
        ]);

        assert_eq!(cli.output_dir, PathBuf::from("/tmp/telegraph"));
        assert_eq!(cli.poll_interval(), Duration::from_secs(30));
        assert!(cli.probe);
    }

    #[test]
    fn test_cli_rejects_invalid_url() {
        let result = Cli::try_parse_from(["telegraph_spider", "--url", "not a url"]);
        assert!(result.is_err());
    }
}
