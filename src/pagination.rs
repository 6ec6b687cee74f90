// SPDX-License-Identifier: MIT

//! Opaque continuation cursors for forward-only feed paging.
//!
//! A cursor captures the identity and sort key (calendar date) of the last
//! record of a page. It is encoded URL-safe base64 so callers can treat it
//! as an opaque token.

use crate::error::{AppError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::NaiveDate;

const CURSOR_PARTS: usize = 2;

/// Resume position within a date-descending record stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCursor {
    /// Sort key of the last returned record.
    pub date: NaiveDate,
    /// Document id of the last returned record (tie-break).
    pub id: String,
}

/// One page of results plus the continuation state.
///
/// `has_more` is an approximation: it is true whenever the page came back
/// full, so a final page that exactly fills the requested size reports a
/// false-positive until the next (empty) page is fetched.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

/// Encode a cursor as an opaque token.
pub fn encode_cursor(cursor: &FeedCursor) -> String {
    let payload = format!("{}:{}", crate::time_utils::format_day_key(cursor.date), cursor.id);
    URL_SAFE_NO_PAD.encode(payload)
}

/// Decode an opaque token back into a cursor.
pub fn parse_cursor(raw: Option<&str>) -> Result<Option<FeedCursor>> {
    raw.map(|raw| {
        let invalid_cursor = || AppError::BadRequest("Invalid 'cursor' parameter".to_string());

        let decoded = URL_SAFE_NO_PAD.decode(raw).map_err(|_| invalid_cursor())?;
        let decoded_str = std::str::from_utf8(&decoded).map_err(|_| invalid_cursor())?;

        let parts: Vec<&str> = decoded_str.splitn(CURSOR_PARTS, ':').collect();
        if parts.len() != CURSOR_PARTS || parts[1].is_empty() {
            return Err(invalid_cursor());
        }

        let date = crate::time_utils::parse_day_key(parts[0]).ok_or_else(invalid_cursor)?;

        Ok(FeedCursor {
            date,
            id: parts[1].to_string(),
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_round_trip() {
        let cursor = FeedCursor {
            date: NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
            id: "doc00000042".to_string(),
        };

        let encoded = encode_cursor(&cursor);
        let decoded = parse_cursor(Some(&encoded)).unwrap().unwrap();

        assert_eq!(decoded, cursor);
    }

    #[test]
    fn test_cursor_rejects_invalid_input() {
        for raw in ["not-base64!", "", "aGVsbG8"] {
            let err = parse_cursor(Some(raw)).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "input: {:?}", raw);
        }
    }

    #[test]
    fn test_absent_cursor_is_none() {
        assert!(parse_cursor(None).unwrap().is_none());
    }
}
