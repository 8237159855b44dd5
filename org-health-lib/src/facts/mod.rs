//! Data retrieval for the repositories of an organization
//!
//! This module is responsible for pulling repository metadata out of the GitHub
//! GraphQL API and handing it to the rest of the pipeline as strongly typed
//! [`Repository`] records.
//!
//! # Implementation Model
//!
//! The [`Fetcher`] walks the organization's repository connection one page at a
//! time. Pagination is cursor based and therefore strictly sequential: each request
//! depends on the end cursor of the previous page. After every page the latest
//! [`RateLimitState`] is recorded and, when the remaining quota drops below the
//! configured low-water mark, the fetcher sleeps until the quota resets.
//!
//! Whole results are cached per organization through [`Cache`], a TTL-aware,
//! directory-backed JSON store guarded by an advisory file lock.
//!
//! Failures are reported as a typed [`FetchError`] so callers can map them to
//! status codes or exit codes without parsing messages.

mod cache;
mod cache_lock;
mod client;
mod credentials;
mod fetch_error;
mod fetcher;
mod path_utils;
mod progress;
mod query;
mod rate_limit;
mod repository;

pub use cache::Cache;
pub use credentials::{Credentials, TOKEN_ENV_VARS};
pub use fetch_error::FetchError;
pub use fetcher::{DEFAULT_API_URL, Fetcher, FetcherConfig, ORG_REPOS_PREFIX};
pub use path_utils::sanitize_path_component;
pub use progress::{NoProgress, Progress};
pub use rate_limit::RateLimitState;
pub use repository::{Repository, ScoredRepository, whole_days_between};
