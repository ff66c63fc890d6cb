//! Kubernetes-style duration strings (`30s`, `5m`, `1h`, `2d`).

use anyhow::{anyhow, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static DURATION_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?P<number>\d+)(?P<unit>[smhd])$").ok());

/// Parse a `<number><unit>` duration; units are s, m, h and d
///
/// Input is trimmed and matched case-insensitively. Zero is rejected.
pub fn parse_kubernetes_duration(duration_str: &str) -> Result<Duration> {
    let trimmed = duration_str.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Duration string cannot be empty"));
    }

    let pattern = DURATION_PATTERN
        .as_ref()
        .ok_or_else(|| anyhow!("Failed to compile duration pattern"))?;
    let lower = trimmed.to_lowercase();
    let captures = pattern.captures(&lower).ok_or_else(|| {
        anyhow!(
            "Invalid duration format '{}'. Expected format: <number><unit> (e.g., '15s', '5m', '1h')",
            trimmed
        )
    })?;

    let number: u64 = captures["number"]
        .parse()
        .map_err(|e| anyhow!("Invalid duration number in '{}': {}", trimmed, e))?;
    if number == 0 {
        return Err(anyhow!(
            "Duration number must be greater than 0, got '{}'",
            trimmed
        ));
    }

    let multiplier = match &captures["unit"] {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        _ => 86400,
    };
    let seconds = number
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow!("Duration '{}' is too large", trimmed))?;

    Ok(Duration::from_secs(seconds))
}
