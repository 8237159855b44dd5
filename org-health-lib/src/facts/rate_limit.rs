use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use core::time::Duration;
use reqwest::header::HeaderMap;
use serde::Serialize;

/// Rate limit information reported by the API alongside every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitState {
    pub limit: u64,
    pub remaining: u64,
    pub used: u64,
    pub reset_at: DateTime<Utc>,
}

impl RateLimitState {
    /// Extract rate limit information from API response headers.
    ///
    /// Returns `None` unless both the remaining quota and the reset time are present.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = header_u64(headers, "x-ratelimit-remaining")?;
        let reset_timestamp = header_u64(headers, "x-ratelimit-reset").and_then(|t| i64::try_from(t).ok())?;
        let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;

        Some(Self {
            limit: header_u64(headers, "x-ratelimit-limit").unwrap_or(0),
            remaining,
            used: header_u64(headers, "x-ratelimit-used").unwrap_or(0),
            reset_at,
        })
    }

    /// Whether the remaining quota is below `low_water_mark`.
    #[must_use]
    pub const fn is_low(&self, low_water_mark: u64) -> bool {
        self.remaining < low_water_mark
    }

    /// How long to wait for the quota to reset: one second past the reset time.
    ///
    /// Returns `None` when the reset time has already passed.
    #[must_use]
    pub fn backoff_delay(&self, now: DateTime<Utc>) -> Option<Duration> {
        let seconds = self.reset_at.signed_duration_since(now).num_seconds() + 1;
        u64::try_from(seconds).ok().filter(|&s| s > 0).map(Duration::from_secs)
    }

    /// Human-readable summary relative to `now`.
    #[must_use]
    pub fn summary(&self, now: DateTime<Utc>) -> String {
        let minutes = self.reset_at.signed_duration_since(now).num_minutes().max(0);
        let (hours, minutes) = (minutes / 60, minutes % 60);
        let until = if hours > 0 { format!("{hours}h {minutes}m") } else { format!("{minutes}m") };

        format!(
            "API rate limit: {} used, {}/{} remaining, resets in {until}",
            self.used, self.remaining, self.limit
        )
    }
}

impl Display for RateLimitState {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "API rate limit: {} used, {}/{} remaining, resets at {}",
            self.used,
            self.remaining,
            self.limit,
            self.reset_at.format("%H:%M:%S UTC")
        )
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
