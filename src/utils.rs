use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{Error, Result};

static DURATION_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d*)?|\.\d+)(ns|us|µs|ms|s|m|h)").expect("valid duration regex")
});

/// Human readable size, floored to whole units: `0 B`, `512 B`, `1 KB`, `3 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} MB", bytes / MB)
    }
}

/// Parse a Go-style duration (`300ms`, `45s`, `5m`, `1h30m`, `1.5h`).
pub fn parse_duration(input: &str) -> Result<Duration> {
    let trimmed = input.trim();
    if trimmed == "0" {
        return Ok(Duration::ZERO);
    }
    if trimmed.is_empty() {
        return Err(Error::InvalidDuration(input.to_string()));
    }

    let mut total = 0f64;
    let mut consumed = 0;
    for caps in DURATION_PART.captures_iter(trimmed) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        // Units must be contiguous: "5m 3s" or "5mx" are rejected.
        if whole.start != consumed {
            return Err(Error::InvalidDuration(input.to_string()));
        }
        consumed = whole.end;

        let value: f64 = caps[1]
            .parse()
            .map_err(|_| Error::InvalidDuration(input.to_string()))?;
        let unit_nanos = match &caps[2] {
            "ns" => 1.0,
            "us" | "µs" => 1e3,
            "ms" => 1e6,
            "s" => 1e9,
            "m" => 60e9,
            "h" => 3600e9,
            _ => unreachable!("regex only matches known units"),
        };
        total += value * unit_nanos;
    }

    if consumed != trimmed.len() {
        return Err(Error::InvalidDuration(input.to_string()));
    }
    Ok(Duration::from_nanos(total.round() as u64))
}

/// `--since` value as whole seconds for the log endpoint.
pub fn since_seconds(input: Option<&str>) -> Result<Option<i64>> {
    match input {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => Ok(Some(parse_duration(s)?.as_secs() as i64)),
    }
}

/// `--tail` value for the log endpoint; any negative number disables the limit.
pub fn tail_lines(tail: i64) -> Option<i64> {
    (tail >= 0).then_some(tail)
}
