//! Data models for telegraph items.
//!
//! - [`RawItem`]: one entry of the page's `telegraphList`, as the origin sent it
//! - [`NewsItem`]: an accepted item as it is kept in memory and written to disk
//! - [`ItemId`]: the origin-assigned identifier used for deduplication

use chrono::TimeZone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder written to `time_str` when an item carries no `ctime`.
pub const MISSING_TIME: &str = "N/A";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Opaque identifier assigned by the origin.
///
/// The page currently sends integers, but strings are accepted too so a change
/// on the origin's side does not break deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ItemId {
    Num(i64),
    Text(String),
}

impl ItemId {
    /// `0` and `""` carry no identity and are never accepted.
    pub fn is_empty(&self) -> bool {
        match self {
            ItemId::Num(n) => *n == 0,
            ItemId::Text(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Num(n) => write!(f, "{n}"),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// An entry of the embedded news list, before deduplication.
///
/// Every field is optional because the origin is not under our control; the
/// accumulator decides what is usable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    /// Creation time in seconds since the Unix epoch.
    #[serde(default)]
    pub ctime: Option<i64>,
}

/// A deduplicated item, as stored in the daily buffer and the hourly files.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsItem {
    pub id: ItemId,
    pub title: Option<String>,
    pub content: Option<String>,
    pub ctime: Option<i64>,
    /// `ctime` rendered in local time as `YYYY-MM-DD HH:MM:SS`, or [`MISSING_TIME`].
    pub time_str: String,
}

impl NewsItem {
    /// Build a stored item from a raw entry, rendering `time_str` in `tz`.
    ///
    /// Returns `None` when the entry has no usable identifier.
    pub fn from_raw<Tz>(raw: RawItem, tz: &Tz) -> Option<Self>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let id = raw.id.filter(|id| !id.is_empty())?;
        let time_str = format_ctime(raw.ctime, tz);
        Some(Self {
            id,
            title: raw.title,
            content: raw.content,
            ctime: raw.ctime,
            time_str,
        })
    }
}

/// Render an epoch timestamp in `tz`, falling back to [`MISSING_TIME`].
pub fn format_ctime<Tz>(ctime: Option<i64>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    ctime
        .and_then(|secs| tz.timestamp_opt(secs, 0).single())
        .map(|dt| dt.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| MISSING_TIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_raw_item_deserialization_ignores_extra_fields() {
        let json = r#"{
            "id": 1875432,
            "title": "央行开展逆回购操作",
            "content": "央行今日开展7天期逆回购操作。",
            "ctime": 1746518400,
            "level": "B",
            "subjects": []
        }"#;

        let raw: RawItem = serde_json::from_str(json).unwrap();
        assert_eq!(raw.id, Some(ItemId::Num(1875432)));
        assert_eq!(raw.title.as_deref(), Some("央行开展逆回购操作"));
        assert_eq!(raw.ctime, Some(1746518400));
    }

    #[test]
    fn test_raw_item_accepts_string_id_and_missing_fields() {
        let raw: RawItem = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        assert_eq!(raw.id, Some(ItemId::Text("a".to_string())));
        assert!(raw.title.is_none());
        assert!(raw.content.is_none());
        assert!(raw.ctime.is_none());
    }

    #[test]
    fn test_empty_ids() {
        assert!(ItemId::Num(0).is_empty());
        assert!(ItemId::Text(String::new()).is_empty());
        assert!(!ItemId::Num(7).is_empty());
        assert!(!ItemId::Text("x".into()).is_empty());
    }

    #[test]
    fn test_from_raw_formats_time() {
        let raw = RawItem {
            id: Some(ItemId::Num(42)),
            title: Some("Title".into()),
            content: Some("Body".into()),
            ctime: Some(1746518400),
        };
        let item = NewsItem::from_raw(raw, &Utc).unwrap();
        assert_eq!(item.time_str, "2025-05-06 08:00:00");
        assert_eq!(item.ctime, Some(1746518400));
    }

    #[test]
    fn test_from_raw_without_ctime_uses_placeholder() {
        let raw = RawItem {
            id: Some(ItemId::Text("a".into())),
            ..Default::default()
        };
        let item = NewsItem::from_raw(raw, &Utc).unwrap();
        assert_eq!(item.time_str, MISSING_TIME);
        assert_eq!(item.ctime, None);
    }

    #[test]
    fn test_from_raw_rejects_missing_or_empty_id() {
        assert!(NewsItem::from_raw(RawItem::default(), &Utc).is_none());

        let raw = RawItem {
            id: Some(ItemId::Num(0)),
            ctime: Some(100),
            ..Default::default()
        };
        assert!(NewsItem::from_raw(raw, &Utc).is_none());
    }

    #[test]
    fn test_news_item_serialization_keeps_id_shape() {
        let item = NewsItem {
            id: ItemId::Num(9),
            title: None,
            content: Some("内容".into()),
            ctime: Some(100),
            time_str: "1970-01-01 00:01:40".into(),
        };
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""id":9"#));
        assert!(json.contains(r#""title":null"#));
        assert!(json.contains("内容"));
    }
}
