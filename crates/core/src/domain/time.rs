// Instant parsing and UTC normalization

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::domain::error::{DomainError, Result};

/// Parse a caller-supplied timestamp into an absolute UTC instant.
///
/// Accepted shapes, in order:
/// - RFC 3339 with an offset (`2025-01-01T09:00:00+02:00`) - converted to UTC
/// - Naive datetime (`2025-01-01T09:00:00`) - tagged UTC as-is
/// - Bare date (`2025-01-01`, all-day calendar events) - midnight UTC
///
/// Everything inside the core works with `DateTime<Utc>`; this is the only
/// place naive timestamps are interpreted.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        // NaiveDate::and_hms_opt(0, 0, 0) is always valid
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(DomainError::InvalidTimestamp(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339_utc() {
        let dt = parse_instant("2025-01-01T09:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1_735_722_000);
    }

    #[test]
    fn test_parse_offset_converts_to_utc() {
        let with_offset = parse_instant("2025-01-01T11:00:00+02:00").unwrap();
        let utc = parse_instant("2025-01-01T09:00:00Z").unwrap();
        assert_eq!(with_offset, utc);
    }

    #[test]
    fn test_parse_naive_is_tagged_utc() {
        let naive = parse_instant("2025-01-01T09:00:00").unwrap();
        let utc = parse_instant("2025-01-01T09:00:00Z").unwrap();
        assert_eq!(naive, utc);
    }

    #[test]
    fn test_parse_naive_with_fraction() {
        let dt = parse_instant("2025-01-01T09:00:00.500").unwrap();
        assert_eq!(dt.timestamp_millis(), 1_735_722_000_500);
    }

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let dt = parse_instant("2025-01-01").unwrap();
        assert_eq!(dt.timestamp(), 1_735_689_600);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(matches!(
            parse_instant("next tuesday"),
            Err(DomainError::InvalidTimestamp(_))
        ));
    }
}
