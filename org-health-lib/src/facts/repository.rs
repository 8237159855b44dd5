use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Metadata for a single repository of an organization.
///
/// Field names follow the GitHub GraphQL schema so cached documents stay
/// readable. Every field has a default, so partially populated records
/// (e.g. from older cache entries) still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Repository {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub is_archived: bool,
    pub is_fork: bool,
    pub is_empty: bool,
    pub is_private: bool,
    pub stargazer_count: u64,
    pub fork_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub pushed_at: Option<DateTime<Utc>>,
    pub primary_language: Option<String>,
    pub topics: Vec<String>,
    pub closed_issue_count: u64,
    pub closed_pull_request_count: u64,
    pub most_recent_release_date: Option<DateTime<Utc>>,
}

impl Repository {
    /// Whole days elapsed since the last push, if the repository was ever pushed to.
    #[must_use]
    pub fn days_since_push(&self, now: DateTime<Utc>) -> Option<i64> {
        self.pushed_at.map(|pushed| whole_days_between(pushed, now))
    }

    /// Whole days elapsed since the repository was created.
    #[must_use]
    pub fn age_days(&self, now: DateTime<Utc>) -> Option<i64> {
        self.created_at.map(|created| whole_days_between(created, now))
    }

    /// Whole days elapsed since the most recent release.
    #[must_use]
    pub fn days_since_release(&self, now: DateTime<Utc>) -> Option<i64> {
        self.most_recent_release_date.map(|released| whole_days_between(released, now))
    }

    /// Closed issues plus closed pull requests.
    #[must_use]
    pub const fn total_closed(&self) -> u64 {
        self.closed_issue_count.saturating_add(self.closed_pull_request_count)
    }
}

/// Number of whole days from `earlier` to `later`, rounded toward negative infinity.
///
/// A timestamp slightly in the future (clock skew) yields `-1`, never `0`.
#[must_use]
pub fn whole_days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> i64 {
    later.signed_duration_since(earlier).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// A repository together with its computed health score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ScoredRepository {
    #[serde(flatten)]
    pub repository: Repository,

    /// Composite health score, always within `0..=100`.
    pub health_score: u8,
}

impl ScoredRepository {
    #[must_use]
    pub const fn new(repository: Repository, health_score: u8) -> Self {
        Self { repository, health_score }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.repository.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn deserialize_graphql_shaped_record() {
        let json = r#"{
            "name": "widget",
            "url": "https://github.com/acme/widget",
            "isArchived": true,
            "stargazerCount": 42,
            "forkCount": 7,
            "pushedAt": "2024-01-01T00:00:00Z",
            "topics": ["cli", "rust"]
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.name, "widget");
        assert!(repo.is_archived);
        assert!(!repo.is_fork);
        assert_eq!(repo.stargazer_count, 42);
        assert_eq!(repo.fork_count, 7);
        assert_eq!(repo.topics, vec!["cli".to_string(), "rust".to_string()]);
        assert!(repo.created_at.is_none());
        assert!(repo.most_recent_release_date.is_none());
    }

    #[test]
    fn whole_days_floors() {
        let now = at(2024, 6, 10);
        assert_eq!(whole_days_between(now, now), 0);
        assert_eq!(whole_days_between(now - Duration::hours(23), now), 0);
        assert_eq!(whole_days_between(now - Duration::hours(25), now), 1);
        assert_eq!(whole_days_between(now + Duration::seconds(5), now), -1);
    }

    #[test]
    fn elapsed_helpers_handle_missing_timestamps() {
        let now = at(2024, 6, 10);
        let repo = Repository {
            pushed_at: Some(at(2024, 6, 1)),
            ..Repository::default()
        };

        assert_eq!(repo.days_since_push(now), Some(9));
        assert_eq!(repo.age_days(now), None);
        assert_eq!(repo.days_since_release(now), None);
    }

    #[test]
    fn total_closed_sums_issues_and_pulls() {
        let repo = Repository {
            closed_issue_count: 30,
            closed_pull_request_count: 12,
            ..Repository::default()
        };
        assert_eq!(repo.total_closed(), 42);
    }

    #[test]
    fn scored_repository_flattens_fields() {
        let scored = ScoredRepository::new(
            Repository {
                name: "widget".into(),
                stargazer_count: 3,
                ..Repository::default()
            },
            77,
        );

        let value = serde_json::to_value(&scored).unwrap();
        assert_eq!(value["name"], "widget");
        assert_eq!(value["stargazerCount"], 3);
        assert_eq!(value["health_score"], 77);

        let back: ScoredRepository = serde_json::from_value(value).unwrap();
        assert_eq!(back, scored);
        assert_eq!(back.name(), "widget");
    }
}
