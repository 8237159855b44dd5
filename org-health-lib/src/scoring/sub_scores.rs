//! Step functions mapping repository facts to sub-scores in `[0, 100]`.

use crate::facts::Repository;
use chrono::{DateTime, Utc};

/// Repositories younger than this are not penalized for lacking releases.
const RELEASE_GRACE_DAYS: i64 = 30;

const DAYS_PER_MONTH: f64 = 30.0;

/// Recency of the last push, as a stand-in for commit activity.
pub fn commit_frequency(repo: &Repository, now: DateTime<Utc>) -> u8 {
    match repo.days_since_push(now) {
        None => 0,
        Some(d) if d <= 7 => 100,
        Some(d) if d <= 30 => 80,
        Some(d) if d <= 90 => 60,
        Some(d) if d <= 180 => 40,
        Some(d) if d <= 365 => 20,
        Some(_) => 0,
    }
}

/// Volume of closed issues and pull requests. Existing at all earns 10.
pub const fn responsiveness(repo: &Repository) -> u8 {
    match repo.total_closed() {
        100.. => 100,
        50.. => 80,
        20.. => 60,
        10.. => 40,
        5.. => 20,
        _ => 10,
    }
}

/// Days since the latest release. Without releases, young repositories get 50 and older ones 0.
pub fn release_cadence(repo: &Repository, now: DateTime<Utc>) -> u8 {
    let Some(days) = repo.days_since_release(now) else {
        return match repo.age_days(now) {
            Some(age) if age < RELEASE_GRACE_DAYS => 50,
            _ => 0,
        };
    };

    match days {
        ..=30 => 100,
        ..=90 => 80,
        ..=180 => 60,
        ..=365 => 40,
        _ => 20,
    }
}

/// Fork count, as a stand-in for contributor diversity.
pub const fn contributors(repo: &Repository) -> u8 {
    match repo.fork_count {
        50.. => 100,
        20.. => 80,
        10.. => 60,
        5.. => 40,
        2.. => 20,
        _ => 10,
    }
}

/// Stars accumulated per month of age, with age clamped to at least one month.
#[expect(clippy::cast_precision_loss, reason = "star counts and ages are far below 2^52")]
pub fn star_growth(repo: &Repository, now: DateTime<Utc>) -> u8 {
    if repo.stargazer_count == 0 {
        return 0;
    }

    let Some(age_days) = repo.age_days(now) else {
        return 0;
    };

    let age_months = (age_days.max(1) as f64 / DAYS_PER_MONTH).max(1.0);
    let per_month = repo.stargazer_count as f64 / age_months;

    match per_month {
        s if s >= 100.0 => 100,
        s if s >= 50.0 => 90,
        s if s >= 20.0 => 80,
        s if s >= 10.0 => 70,
        s if s >= 5.0 => 60,
        s if s >= 2.0 => 50,
        s if s >= 1.0 => 40,
        s if s >= 0.5 => 30,
        _ => 20,
    }
}

/// Recency of the last push, as a weak stand-in for CI activity. Never below 50.
pub fn ci_health(repo: &Repository, now: DateTime<Utc>) -> u8 {
    match repo.days_since_push(now) {
        None => 50,
        Some(d) if d <= 1 => 100,
        Some(d) if d <= 7 => 90,
        Some(d) if d <= 14 => 80,
        Some(d) if d <= 30 => 70,
        Some(_) => 50,
    }
}
