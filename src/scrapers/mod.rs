//! News sources polled by the spider.
//!
//! A source performs one fetch per cycle and hands back the raw entries it
//! found; deduplication happens later in the accumulator.
//!
//! | Source | Module | Method |
//! |--------|--------|--------|
//! | CLS telegraph | [`telegraph`] | `__NEXT_DATA__` JSON embedded in the HTML page |

pub mod telegraph;

use crate::error::FetchError;
use crate::models::RawItem;

/// Something the spider can poll once per cycle.
///
/// The HTTP scraper implements this for production; tests substitute scripted
/// sources so the cycle can be driven without a network.
pub trait NewsSource {
    /// Fetch the current list of entries from the origin.
    async fn fetch(&self) -> Result<Vec<RawItem>, FetchError>;
}
