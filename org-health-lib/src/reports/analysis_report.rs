use crate::facts::ScoredRepository;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The result of analyzing one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub organization: String,
    pub generated_at: DateTime<Utc>,
    pub summary: Summary,

    /// Sorted by descending health score.
    pub repositories: Vec<RepositoryEntry>,
}

/// Aggregate statistics over the analyzed repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Repositories the organization has, before selection.
    pub total_found: usize,
    pub analyzed: usize,

    /// Mean health score, rounded to one decimal place.
    pub average_score: f64,
    pub median_score: f64,
    pub top_score: u8,
    pub bottom_score: u8,
}

/// A scored repository as it appears in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub name: String,
    pub url: String,
    pub description: Option<String>,
    pub health_score: u8,
    pub stars: u64,
    pub forks: u64,
    pub primary_language: Option<String>,
    pub last_pushed: Option<DateTime<Utc>>,
    pub topics: Vec<String>,
}

impl From<ScoredRepository> for RepositoryEntry {
    fn from(scored: ScoredRepository) -> Self {
        let repo = scored.repository;
        Self {
            name: repo.name,
            url: repo.url,
            description: repo.description,
            health_score: scored.health_score,
            stars: repo.stargazer_count,
            forks: repo.fork_count,
            primary_language: repo.primary_language,
            last_pushed: repo.pushed_at,
            topics: repo.topics,
        }
    }
}

impl AnalysisReport {
    /// Build a report from scored repositories, sorting them by descending score.
    ///
    /// Repositories with equal scores keep their relative order.
    #[must_use]
    pub fn new(organization: impl Into<String>, generated_at: DateTime<Utc>, total_found: usize, scored: Vec<ScoredRepository>) -> Self {
        let mut repositories: Vec<RepositoryEntry> = scored.into_iter().map(RepositoryEntry::from).collect();
        repositories.sort_by(|a, b| b.health_score.cmp(&a.health_score));

        let scores: Vec<u8> = repositories.iter().map(|r| r.health_score).collect();

        Self {
            organization: organization.into(),
            generated_at,
            summary: Summary::from_scores(total_found, &scores),
            repositories,
        }
    }

    /// The `count` best scoring repositories.
    #[must_use]
    pub fn top(&self, count: usize) -> &[RepositoryEntry] {
        &self.repositories[..count.min(self.repositories.len())]
    }
}

impl Summary {
    /// Compute statistics for `scores`, which must be sorted in descending order.
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "repository counts are far below 2^52")]
    pub fn from_scores(total_found: usize, scores: &[u8]) -> Self {
        let (Some(&top_score), Some(&bottom_score)) = (scores.first(), scores.last()) else {
            return Self {
                total_found,
                analyzed: 0,
                average_score: 0.0,
                median_score: 0.0,
                top_score: 0,
                bottom_score: 0,
            };
        };

        let sum: u64 = scores.iter().copied().map(u64::from).sum();
        let average = sum as f64 / scores.len() as f64;

        let mid = scores.len() / 2;
        let median_score = if scores.len() % 2 == 0 {
            (f64::from(scores[mid - 1]) + f64::from(scores[mid])) / 2.0
        } else {
            f64::from(scores[mid])
        };

        Self {
            total_found,
            analyzed: scores.len(),
            average_score: (average * 10.0).round() / 10.0,
            median_score,
            top_score,
            bottom_score,
        }
    }
}
