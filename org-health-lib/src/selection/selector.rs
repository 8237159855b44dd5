use crate::facts::Repository;
use chrono::{DateTime, Utc};

const LOG_TARGET: &str = "  selector";

/// How many repositories are selected when the caller does not say otherwise.
pub const DEFAULT_MAX_COUNT: usize = 30;

/// Smallest selection that may stop early on star coverage.
pub const MIN_REPRESENTATIVE: usize = 5;

/// Fraction of the organization's stars a selection must cover to stop early.
pub const STAR_COVERAGE: f64 = 0.8;

const STAR_WEIGHT: f64 = 1.0;
const FORK_WEIGHT: f64 = 0.5;
const RECENT_PUSH_DAYS: i64 = 30;
const RECENT_PUSH_BOOST: f64 = 1.2;
const STALE_PUSH_DAYS: i64 = 365;
const STALE_PUSH_PENALTY: f64 = 0.8;

/// Whether a repository is a candidate for analysis at all.
#[must_use]
pub const fn is_importable(repo: &Repository) -> bool {
    !(repo.is_archived || repo.is_fork || repo.is_empty || repo.is_private)
}

/// Ranking value for a repository, evaluated at `now`.
///
/// Stars count fully and forks count half. Repositories pushed within the last
/// 30 days get a 20% boost and those untouched for over a year lose 20%.
/// Without a push time no adjustment is made.
#[must_use]
#[expect(clippy::cast_precision_loss, reason = "star and fork counts are far below 2^52")]
pub fn importance(repo: &Repository, now: DateTime<Utc>) -> f64 {
    let base = repo.stargazer_count as f64 * STAR_WEIGHT + repo.fork_count as f64 * FORK_WEIGHT;

    match repo.days_since_push(now) {
        Some(days) if days <= RECENT_PUSH_DAYS => base * RECENT_PUSH_BOOST,
        Some(days) if days > STALE_PUSH_DAYS => base * STALE_PUSH_PENALTY,
        _ => base,
    }
}

/// Select the most important repositories, at most `max_count` of them.
///
/// The result is ordered by descending importance. Equal importance keeps the
/// input order. When no more than `max_count` candidates survive filtering,
/// all of them are returned.
#[must_use]
pub fn select_important(repos: Vec<Repository>, max_count: usize, now: DateTime<Utc>) -> Vec<Repository> {
    let total = repos.len();
    let mut ranked: Vec<(f64, Repository)> = repos
        .into_iter()
        .filter(is_importable)
        .map(|repo| (importance(&repo, now), repo))
        .collect();

    // sort_by is stable, so ties keep fetch order
    ranked.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    let mut sorted: Vec<Repository> = ranked.into_iter().map(|(_, repo)| repo).collect();
    let candidates = sorted.len();

    log::debug!(target: LOG_TARGET, "{candidates} of {total} repositories are candidates for analysis");

    if candidates <= max_count {
        return sorted;
    }

    let len = coverage_prefix_len(&sorted, max_count);
    log::debug!(target: LOG_TARGET, "Selected {len} of {candidates} candidates");

    sorted.truncate(len);
    sorted
}

/// Length of the shortest prefix that reaches `max_count` entries, or at least
/// [`MIN_REPRESENTATIVE`] entries holding [`STAR_COVERAGE`] of all stars.
#[expect(clippy::cast_precision_loss, reason = "star counts are far below 2^52")]
fn coverage_prefix_len(sorted: &[Repository], max_count: usize) -> usize {
    let total_stars: u64 = sorted.iter().map(|r| r.stargazer_count).sum();
    if total_stars == 0 {
        return max_count.min(sorted.len());
    }

    let threshold = total_stars as f64 * STAR_COVERAGE;
    let mut accumulated = 0_u64;

    for (index, repo) in sorted.iter().enumerate() {
        let len = index + 1;
        if len > max_count {
            return max_count;
        }

        accumulated += repo.stargazer_count;
        if len == max_count || (len >= MIN_REPRESENTATIVE && accumulated as f64 >= threshold) {
            return len;
        }
    }

    sorted.len()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn repo(name: &str, stars: u64, forks: u64, pushed_days_ago: Option<i64>) -> Repository {
        Repository {
            name: name.to_string(),
            stargazer_count: stars,
            fork_count: forks,
            pushed_at: pushed_days_ago.map(|d| now() - Duration::days(d)),
            ..Repository::default()
        }
    }

    fn names(repos: &[Repository]) -> Vec<&str> {
        repos.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn filters_out_flagged_repositories() {
        let repos = vec![
            repo("keep", 1, 0, Some(100)),
            Repository { is_archived: true, ..repo("archived", 5, 0, Some(100)) },
            Repository { is_fork: true, ..repo("fork", 5, 0, Some(100)) },
            Repository { is_empty: true, ..repo("empty", 5, 0, Some(100)) },
            Repository { is_private: true, ..repo("private", 5, 0, Some(100)) },
            repo("also-keep", 2, 0, Some(100)),
        ];

        let selected = select_important(repos, DEFAULT_MAX_COUNT, now());
        assert_eq!(names(&selected), ["also-keep", "keep"]);
    }

    #[test]
    fn orders_by_descending_importance() {
        let repos = vec![
            repo("small", 10, 1, Some(100)),
            repo("large", 1000, 100, Some(100)),
            repo("medium", 100, 10, Some(100)),
        ];

        let selected = select_important(repos, DEFAULT_MAX_COUNT, now());
        assert_eq!(names(&selected), ["large", "medium", "small"]);

        let scores: Vec<f64> = selected.iter().map(|r| importance(r, now())).collect();
        assert!(scores.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn importance_applies_recency_multipliers() {
        assert!((importance(&repo("recent", 100, 20, Some(30)), now()) - 132.0).abs() < 1e-9);
        assert!((importance(&repo("normal", 100, 20, Some(31)), now()) - 110.0).abs() < 1e-9);
        assert!((importance(&repo("normal", 100, 20, Some(365)), now()) - 110.0).abs() < 1e-9);
        assert!((importance(&repo("stale", 100, 20, Some(366)), now()) - 88.0).abs() < 1e-9);
        assert!((importance(&repo("never", 100, 20, None), now()) - 110.0).abs() < 1e-9);
    }

    #[test]
    fn recent_push_can_outrank_more_stars() {
        let repos = vec![repo("stale", 110, 0, Some(400)), repo("active", 100, 0, Some(1))];

        let selected = select_important(repos, DEFAULT_MAX_COUNT, now());
        assert_eq!(names(&selected), ["active", "stale"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let repos = vec![repo("b", 10, 0, Some(100)), repo("a", 10, 0, Some(100)), repo("c", 10, 0, Some(100))];

        let selected = select_important(repos, DEFAULT_MAX_COUNT, now());
        assert_eq!(names(&selected), ["b", "a", "c"]);
    }

    #[test]
    fn caps_at_max_count() {
        let repos: Vec<Repository> = (0..50).map(|i| repo(&format!("r{i}"), 10, 0, Some(100))).collect();

        let selected = select_important(repos, 10, now());
        assert_eq!(selected.len(), 10);
    }

    #[test]
    fn returns_all_when_under_max_count() {
        let stars = [9000, 500, 200, 150, 100, 50];
        let repos: Vec<Repository> = stars.iter().enumerate().map(|(i, &s)| repo(&format!("r{i}"), s, 0, Some(100))).collect();

        let selected = select_important(repos, DEFAULT_MAX_COUNT, now());
        assert_eq!(selected.len(), 6);
    }

    #[test]
    fn stops_early_once_stars_are_covered() {
        // The first five hold well over 80% of all stars
        let mut repos = vec![
            repo("a", 5000, 0, Some(100)),
            repo("b", 2000, 0, Some(100)),
            repo("c", 1000, 0, Some(100)),
            repo("d", 500, 0, Some(100)),
            repo("e", 400, 0, Some(100)),
        ];
        repos.extend((0..20).map(|i| repo(&format!("tail{i}"), 1, 0, Some(100))));

        let selected = select_important(repos, 10, now());
        assert_eq!(names(&selected), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn keeps_minimum_sample_even_when_one_repo_dominates() {
        let mut repos = vec![repo("giant", 100_000, 0, Some(100))];
        repos.extend((0..20).map(|i| repo(&format!("tail{i}"), 1, 0, Some(100))));

        let selected = select_important(repos, 10, now());
        assert_eq!(selected.len(), MIN_REPRESENTATIVE);
        assert_eq!(selected[0].name, "giant");
    }

    #[test]
    fn continues_past_minimum_until_coverage() {
        // Stars spread evenly: 80% coverage needs 16 of 20, so the cap of 12 wins
        let repos: Vec<Repository> = (0..20).map(|i| repo(&format!("r{i}"), 10, 0, Some(100))).collect();

        let selected = select_important(repos, 12, now());
        assert_eq!(selected.len(), 12);
    }

    #[test]
    fn zero_total_stars_truncates_to_max_count() {
        let repos: Vec<Repository> = (0..40).map(|i| repo(&format!("r{i}"), 0, 0, None)).collect();

        let selected = select_important(repos, 30, now());
        assert_eq!(selected.len(), 30);
        assert_eq!(selected[0].name, "r0");
    }

    #[test]
    fn zero_max_count_selects_nothing() {
        let repos = vec![repo("a", 10, 0, Some(1)), repo("b", 5, 0, Some(1))];
        assert!(select_important(repos, 0, now()).is_empty());
    }

    #[test]
    fn empty_input() {
        assert!(select_important(Vec::new(), DEFAULT_MAX_COUNT, now()).is_empty());
    }
}
