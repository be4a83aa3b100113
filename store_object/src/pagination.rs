//! Keyset pagination
//!
//! Pages are ordered by `(order column DESC, id DESC)`. A cursor names the last
//! row of the previous page and travels as URL-safe base64 of
//! `"<rfc3339 timestamp>|<id>"`.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;
use crate::traits::TableMetadata;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Position just after a row in list order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    pub order_key: DateTime<Utc>,
    pub id: String,
}

impl Cursor {
    pub fn after<T: TableMetadata>(record: &T) -> Self {
        Self {
            order_key: record.order_key(),
            id: record.id().to_string(),
        }
    }

    pub fn encode(&self) -> String {
        let raw = format!(
            "{}|{}",
            self.order_key.to_rfc3339_opts(SecondsFormat::Nanos, true),
            self.id
        );
        URL_SAFE_NO_PAD.encode(raw)
    }

    pub fn decode(encoded: &str) -> Result<Self, StoreError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|_| StoreError::InvalidCursor(encoded.to_string()))?;
        let raw = String::from_utf8(bytes).map_err(|_| StoreError::InvalidCursor(encoded.to_string()))?;

        let (timestamp, id) = raw
            .split_once('|')
            .ok_or_else(|| StoreError::InvalidCursor(encoded.to_string()))?;
        if id.is_empty() {
            return Err(StoreError::InvalidCursor(encoded.to_string()));
        }
        let order_key = DateTime::parse_from_rfc3339(timestamp)
            .map_err(|_| StoreError::InvalidCursor(encoded.to_string()))?
            .with_timezone(&Utc);

        Ok(Self {
            order_key,
            id: id.to_string(),
        })
    }

    /// Whether `record` sorts strictly after this cursor in list order
    pub fn precedes<T: TableMetadata>(&self, record: &T) -> bool {
        (record.order_key(), record.id()) < (self.order_key, self.id.as_str())
    }
}

/// Bounded page size plus an optional starting cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub cursor: Option<Cursor>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_LIMIT)
    }
}

impl PageRequest {
    pub fn first(limit: usize) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            cursor: None,
        }
    }

    pub fn after(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    /// Build a request from raw `limit` and `cursor` query values
    ///
    /// A missing or empty limit takes `default_limit`. Anything else is read as a
    /// number and truncated toward zero, with unreadable input counting as 0, then
    /// clamped to `1..=max_limit`.
    pub fn from_query(
        limit: Option<&str>,
        cursor: Option<&str>,
        default_limit: usize,
        max_limit: usize,
    ) -> Result<Self, StoreError> {
        let limit = match limit.map(str::trim) {
            None | Some("") => default_limit,
            Some(raw) => {
                let parsed = raw.parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0);
                let truncated = parsed.trunc();
                if truncated < 1.0 {
                    1
                } else if truncated > max_limit as f64 {
                    max_limit
                } else {
                    truncated as usize
                }
            }
        };

        let cursor = match cursor {
            None | Some("") => None,
            Some(raw) => Some(Cursor::decode(raw)?),
        };

        Ok(Self {
            limit: limit.clamp(1, max_limit.max(1)),
            cursor,
        })
    }

    /// Rows to fetch: one past the limit to learn whether another page exists
    pub fn fetch_limit(&self) -> usize {
        self.limit + 1
    }
}

/// One page of list results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

impl<T: TableMetadata> Page<T> {
    /// Trim an over-fetched, already ordered batch to `limit` and derive `next`
    pub fn from_overfetch(mut rows: Vec<T>, limit: usize) -> Self {
        if rows.len() > limit {
            rows.truncate(limit);
            let next = rows.last().map(|last| Cursor::after(last).encode());
            Self { items: rows, next }
        } else {
            Self {
                items: rows,
                next: None,
            }
        }
    }
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request(limit: Option<&str>) -> PageRequest {
        PageRequest::from_query(limit, None, DEFAULT_LIMIT, MAX_LIMIT).unwrap()
    }

    #[test]
    fn test_limit_defaults_and_clamps() {
        assert_eq!(request(None).limit, 20);
        assert_eq!(request(Some("")).limit, 20);
        assert_eq!(request(Some("5")).limit, 5);
        assert_eq!(request(Some("7.9")).limit, 7);
        assert_eq!(request(Some("0")).limit, 1);
        assert_eq!(request(Some("-3")).limit, 1);
        assert_eq!(request(Some("abc")).limit, 1);
        assert_eq!(request(Some("500")).limit, 100);
    }

    #[test]
    fn test_cursor_survives_encoding() {
        let cursor = Cursor {
            order_key: Utc.with_ymd_and_hms(2023, 10, 25, 8, 30, 0).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
            id: "cli-1|odd".to_string(),
        };
        let encoded = cursor.encode();
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert_eq!(Cursor::decode(&encoded).unwrap(), cursor);
    }

    #[test]
    fn test_bad_cursor_is_rejected() {
        let err = PageRequest::from_query(None, Some("not a cursor!"), 20, 100).unwrap_err();
        assert!(matches!(err, StoreError::InvalidCursor(_)));

        let no_separator = URL_SAFE_NO_PAD.encode("2023-10-25T00:00:00Z");
        assert!(Cursor::decode(&no_separator).is_err());

        let bad_time = URL_SAFE_NO_PAD.encode("yesterday|cli-1");
        assert!(Cursor::decode(&bad_time).is_err());
    }
}
