use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Parse interval string like "5s", "30m", "6h", "1d" into seconds
pub fn parse_interval(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();

    if let Some(hours) = s.strip_suffix('h') {
        let h = hours
            .parse::<u64>()
            .map_err(|_| format!("Invalid hours: {}", hours))?;
        scale(h, 3600, &s)
    } else if let Some(minutes) = s.strip_suffix('m') {
        let m = minutes
            .parse::<u64>()
            .map_err(|_| format!("Invalid minutes: {}", minutes))?;
        scale(m, 60, &s)
    } else if let Some(days) = s.strip_suffix('d') {
        let d = days
            .parse::<u64>()
            .map_err(|_| format!("Invalid days: {}", days))?;
        scale(d, 86400, &s)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>()
            .map_err(|_| format!("Invalid seconds: {}", secs))
    } else {
        // Try parsing as raw seconds
        s.parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '5s', '20m', '1h'", s))
    }
}

fn scale(value: u64, unit_secs: u64, input: &str) -> Result<u64, String> {
    value
        .checked_mul(unit_secs)
        .ok_or_else(|| format!("Interval too large: {}", input))
}

/// Format interval for display
pub fn format_interval(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 86400 && secs.is_multiple_of(86400) {
        format!("{}d", secs / 86400)
    } else if secs >= 3600 && secs.is_multiple_of(3600) {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs.is_multiple_of(60) {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInterval {
    Seconds(u64),
    Text(String),
}

/// Serde adapter: accepts either an integer number of seconds or an
/// interval string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = match RawInterval::deserialize(deserializer)? {
        RawInterval::Seconds(secs) => secs,
        RawInterval::Text(text) => parse_interval(&text).map_err(serde::de::Error::custom)?,
    };
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval("1h").unwrap(), 3600);
        assert_eq!(parse_interval("20m").unwrap(), 1200);
        assert_eq!(parse_interval("1d").unwrap(), 86400);
        assert_eq!(parse_interval("5s").unwrap(), 5);
        assert_eq!(parse_interval(" 3600 ").unwrap(), 3600);
        assert_eq!(parse_interval("6H").unwrap(), 21600);
        assert!(parse_interval("invalid").is_err());
        assert!(parse_interval("-5s").is_err());
    }

    #[test]
    fn test_parse_interval_overflow_is_error() {
        assert_eq!(
            parse_interval("999999999999999999h"),
            Err("Interval too large: 999999999999999999h".to_string())
        );
        assert!(parse_interval("999999999999999999d").is_err());
        assert!(parse_interval("999999999999999999m").is_err());
        assert_eq!(parse_interval("18446744073709551615s").unwrap(), u64::MAX);
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(3600)), "1h");
        assert_eq!(format_interval(Duration::from_secs(1200)), "20m");
        assert_eq!(format_interval(Duration::from_secs(86400)), "1d");
        assert_eq!(format_interval(Duration::from_secs(90)), "90s");
        assert_eq!(format_interval(Duration::from_secs(5)), "5s");
    }
}
