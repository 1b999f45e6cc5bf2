use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};

fn parse_epoch(ts: &str) -> Option<DateTime<Utc>> {
    let secs = ts.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(secs, 0)
}

pub fn parse_tz(tz: &str) -> Result<chrono_tz::Tz> {
    tz.parse().map_err(|_| anyhow!("invalid tz: {tz}"))
}

/// Returns YYYY-MM-DD (UTC) for an epoch-seconds string.
pub fn utc_day(ts: &str) -> Option<String> {
    parse_epoch(ts).map(|dt| dt.format("%Y-%m-%d").to_string())
}

/// "YYYY-MM-DD at HH:MM" in the given timezone.
pub fn display_datetime(ts: &str, tz: chrono_tz::Tz) -> Option<String> {
    parse_epoch(ts).map(|dt| dt.with_timezone(&tz).format("%Y-%m-%d at %H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_day_from_seconds() {
        assert_eq!(utc_day("1700000000").as_deref(), Some("2023-11-14"));
        assert_eq!(utc_day("nope"), None);
    }

    #[test]
    fn display_in_zone() {
        let utc = parse_tz("UTC").unwrap();
        assert_eq!(display_datetime("1700000000", utc).as_deref(), Some("2023-11-14 at 22:13"));

        let ba = parse_tz("America/Buenos_Aires").unwrap();
        assert_eq!(display_datetime("1700000000", ba).as_deref(), Some("2023-11-14 at 19:13"));
    }

    #[test]
    fn rejects_unknown_zone() {
        assert!(parse_tz("Mars/Olympus").is_err());
    }
}
