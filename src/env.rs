//! Environment variable helpers for services that configure their layouts
//! from the process environment.
//!
//! These are purely helpers; the layouts themselves never read the
//! environment.

use chrono_tz::Tz;

use crate::error::ConfigError;

/// IANA name of the time zone formatted timestamps are rendered in, e.g.
/// `Europe/Berlin`.
pub const JSON_LAYOUT_TIMEZONE_ENV: &str = "JSON_LAYOUT_TIMEZONE";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an IANA time zone name.
pub fn parse_time_zone(name: &str) -> Result<Tz, ConfigError> {
    name.trim().parse::<Tz>().map_err(|_| ConfigError::UnknownTimeZone {
        name: name.to_string(),
    })
}

/// Time zone named by [`JSON_LAYOUT_TIMEZONE_ENV`], UTC when unset.
pub fn time_zone_from_env() -> Result<Tz, ConfigError> {
    parse_time_zone(&env_or(JSON_LAYOUT_TIMEZONE_ENV, "UTC"))
}
