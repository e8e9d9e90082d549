use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use std::fmt::Write;

use crate::error::ConfigError;

/// Renders event timestamps for the `timestamp` field.
///
/// Without a pattern the timestamp is written as epoch milliseconds. With a
/// pattern (strftime syntax, e.g. `%Y-%m-%dT%H:%M:%S%.3f%:z`) it is written
/// as a string in the configured time zone. The pattern is compiled once.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampFormatter {
    items: Option<Vec<Item<'static>>>,
    time_zone: Tz,
}

impl TimestampFormatter {
    pub fn new(pattern: Option<&str>, time_zone: Tz) -> Result<Self, ConfigError> {
        let items = pattern.map(compile_pattern).transpose()?;
        Ok(TimestampFormatter { items, time_zone })
    }

    pub fn format(&self, timestamp: &DateTime<Utc>) -> Value {
        let Some(items) = &self.items else {
            return Value::from(timestamp.timestamp_millis());
        };
        let mut text = String::new();
        match write_items(&mut text, &timestamp.with_timezone(&self.time_zone), items) {
            Ok(()) => Value::String(text),
            Err(_) => {
                tracing::warn!(%timestamp, "timestamp pattern failed, writing epoch millis");
                Value::from(timestamp.timestamp_millis())
            }
        }
    }
}

fn write_items<Z: TimeZone>(out: &mut String, at: &DateTime<Z>, items: &[Item<'static>]) -> std::fmt::Result
where
    Z::Offset: std::fmt::Display,
{
    write!(out, "{}", at.format_with_items(items.iter()))
}

/// Parse `pattern` and trial-format a fixed instant, so that items chrono
/// accepts but cannot render (e.g. the parse-only `%#z`) are rejected here.
fn compile_pattern(pattern: &str) -> Result<Vec<Item<'static>>, ConfigError> {
    let invalid = || ConfigError::InvalidTimestampFormat {
        pattern: pattern.to_string(),
    };
    let items = StrftimeItems::new(pattern).parse_to_owned().map_err(|_| invalid())?;
    let sample = DateTime::<Utc>::default().with_timezone(&Tz::UTC);
    write_items(&mut String::new(), &sample, &items).map_err(|_| invalid())?;
    Ok(items)
}

/// Reject patterns chrono cannot format, so formatting per event never fails.
pub fn validate_pattern(pattern: &str) -> Result<(), ConfigError> {
    compile_pattern(pattern).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2012, 11, 16, 5, 0, 47).unwrap()
    }

    #[test]
    fn no_pattern_gives_epoch_millis() {
        let formatter = TimestampFormatter::new(None, Tz::UTC).unwrap();
        assert_eq!(formatter.format(&at()), Value::from(1_353_042_047_000_i64));
    }

    #[test]
    fn pattern_uses_time_zone() {
        let formatter =
            TimestampFormatter::new(Some("%Y-%m-%d %H:%M:%S"), chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(formatter.format(&at()), Value::from("2012-11-16 06:00:47"));
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = TimestampFormatter::new(Some("%Y-%m-%"), Tz::UTC).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidTimestampFormat {
                pattern: "%Y-%m-%".to_string()
            }
        );
    }

    #[test]
    fn parse_only_pattern_is_rejected() {
        assert!(validate_pattern("%Y-%m-%d %#z").is_err());
        assert!(validate_pattern("%Y-%m-%dT%H:%M:%S%.3f%:z").is_ok());
    }
}
