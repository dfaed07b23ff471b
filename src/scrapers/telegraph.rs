//! CLS telegraph scraper.
//!
//! The [telegraph page](https://www.cls.cn/telegraph) is a Next.js frontend: the
//! latest flash items are shipped inside the HTML as a
//! `<script id="__NEXT_DATA__">` JSON block used to hydrate the client. We cut
//! that block out by its literal markers and walk
//! `props.initialState.telegraph.telegraphList`.

use crate::error::FetchError;
use crate::models::RawItem;
use crate::scrapers::NewsSource;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Default page polled by the spider.
pub const TELEGRAPH_URL: &str = "https://www.cls.cn/telegraph";

/// The origin rejects clients that do not look like a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Per-request timeout covering connect, headers and body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const START_MARKER: &str = r#"<script id="__NEXT_DATA__" type="application/json">"#;
const END_MARKER: &str = "</script>";

/// Keys leading from the root of the embedded JSON to the news list.
const LIST_PATH: [&str; 4] = ["props", "initialState", "telegraph", "telegraphList"];

/// HTTP client for the telegraph page.
#[derive(Debug, Clone)]
pub struct TelegraphScraper {
    client: reqwest::Client,
    url: Url,
}

impl TelegraphScraper {
    /// Build a scraper with a fixed User-Agent and a per-request timeout.
    pub fn new(url: Url, user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl NewsSource for TelegraphScraper {
    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn fetch(&self) -> Result<Vec<RawItem>, FetchError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let html = response.text().await?;
        debug!(bytes = html.len(), "Downloaded telegraph page");

        let items = parse_page(&html)?;
        info!(count = items.len(), "Parsed telegraph list");
        Ok(items)
    }
}

/// Extract and parse the news list from a full HTML document.
pub fn parse_page(html: &str) -> Result<Vec<RawItem>, FetchError> {
    let json = extract_embedded_json(html)?;
    parse_telegraph_list(json)
}

/// Return the text between the opening `__NEXT_DATA__` tag and the first
/// `</script>` after it.
pub fn extract_embedded_json(html: &str) -> Result<&str, FetchError> {
    let start = html
        .find(START_MARKER)
        .ok_or(FetchError::MarkerNotFound(START_MARKER))?
        + START_MARKER.len();
    let len = html[start..]
        .find(END_MARKER)
        .ok_or(FetchError::MarkerNotFound(END_MARKER))?;
    Ok(&html[start..start + len])
}

/// Parse the embedded JSON and pull out the telegraph entries.
///
/// Entries whose fields have unexpected types are skipped so one odd record
/// does not cost the whole cycle.
pub fn parse_telegraph_list(json: &str) -> Result<Vec<RawItem>, FetchError> {
    let root: Value = serde_json::from_str(json)?;

    let mut node = &root;
    for key in LIST_PATH {
        node = node
            .get(key)
            .ok_or_else(|| FetchError::SchemaMismatch(key.to_string()))?;
    }
    let entries = node
        .as_array()
        .ok_or_else(|| FetchError::SchemaMismatch(LIST_PATH[LIST_PATH.len() - 1].to_string()))?;

    let items = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match RawItem::deserialize(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed telegraph entry");
                None
            }
        })
        .collect();
    Ok(items)
}
