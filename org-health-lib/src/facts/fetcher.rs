use super::client::Client;
use super::{Cache, Credentials, FetchError, NoProgress, Progress, RateLimitState, Repository};
use chrono::Utc;
use core::time::Duration;
use std::sync::{Arc, Mutex, PoisonError};
use tokio_util::sync::CancellationToken;

const LOG_TARGET: &str = "   fetcher";

/// Cache prefix under which whole organization results are stored.
pub const ORG_REPOS_PREFIX: &str = "org_repos";

/// The public GitHub GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com/graphql";

/// Tuning knobs for [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub api_url: String,

    /// Number of repositories requested per page (the API allows at most 100).
    pub page_size: u8,

    /// Pause for the quota reset once fewer than this many requests remain.
    pub low_water_mark: u64,

    /// Longest pause tolerated for a quota reset before giving up.
    pub max_rate_limit_wait: Duration,

    pub request_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            page_size: 50,
            low_water_mark: 10,
            max_rate_limit_wait: Duration::from_secs(60 * 60),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Retrieves every repository of an organization, one page at a time.
pub struct Fetcher {
    client: Client,
    cache: Option<Cache>,
    config: FetcherConfig,
    progress: Arc<dyn Progress>,
    rate_limit: Mutex<Option<RateLimitState>>,
}

impl core::fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fetcher")
            .field("client", &self.client)
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    /// Create a fetcher. Pass `None` for `cache` to always go to the network.
    pub fn new(credentials: &Credentials, config: FetcherConfig, cache: Option<Cache>) -> crate::Result<Self> {
        let client = Client::new(credentials, config.api_url.clone(), config.request_timeout)?;

        Ok(Self {
            client,
            cache,
            config,
            progress: Arc::new(NoProgress),
            rate_limit: Mutex::new(None),
        })
    }

    /// Report page-by-page progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &FetcherConfig {
        &self.config
    }

    #[must_use]
    pub const fn cache(&self) -> Option<&Cache> {
        self.cache.as_ref()
    }

    /// The rate limit state reported with the most recent response, if any.
    #[must_use]
    pub fn rate_limit(&self) -> Option<RateLimitState> {
        *self.rate_limit.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch all repositories of `org`.
    ///
    /// A fresh cached result short-circuits all network activity. Otherwise pages are
    /// requested sequentially, pausing for the quota reset whenever the remaining quota
    /// drops below the low-water mark, and the complete result is written back to the
    /// cache. Cancelling `cancel` abandons the fetch without touching the cache.
    pub async fn fetch_all_repositories(&self, org: &str, cancel: &CancellationToken) -> Result<Vec<Repository>, FetchError> {
        if let Some(cached) = self.read_cache(org).await {
            log::info!(target: LOG_TARGET, "Using {} cached repositories of '{org}'", cached.len());
            return Ok(cached);
        }

        self.progress.set_phase("Fetching");
        self.progress.set_message(format!("repositories of '{org}'"));

        let mut repositories = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0_u32;

        // Only state reported during this fetch drives backoff
        let mut session_rate_limit: Option<RateLimitState> = None;

        loop {
            let page = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(FetchError::Cancelled),
                page = self.client.fetch_page(org, cursor.as_deref(), self.config.page_size) => page,
            };

            pages += 1;
            if let Some(state) = page.rate_limit {
                log::debug!(target: LOG_TARGET, "{}", state.summary(Utc::now()));
                *self.rate_limit.lock().unwrap_or_else(PoisonError::into_inner) = Some(state);
                session_rate_limit = Some(state);
            }

            let data = page.data?;
            repositories.extend(data.repositories);
            log::debug!(
                target: LOG_TARGET,
                "Page {pages} of '{org}': {}/{} repositories so far",
                repositories.len(),
                data.total_count
            );
            self.progress
                .set_message(format!("{}/{} repositories of '{org}'", repositories.len(), data.total_count));

            if !data.has_next_page {
                break;
            }

            let Some(next) = data.end_cursor else {
                return Err(FetchError::protocol("next page signaled without an end cursor"));
            };
            cursor = Some(next);

            if let Some(state) = session_rate_limit
                && state.is_low(self.config.low_water_mark)
            {
                self.wait_for_reset(state, cancel).await?;
            }
        }

        log::info!(
            target: LOG_TARGET,
            "Fetched {} repositories of '{org}' with {pages} API call(s)",
            repositories.len()
        );

        self.write_cache(org, &repositories).await;
        Ok(repositories)
    }

    async fn wait_for_reset(&self, state: RateLimitState, cancel: &CancellationToken) -> Result<(), FetchError> {
        let Some(delay) = state.backoff_delay(Utc::now()) else {
            return Ok(());
        };

        if delay > self.config.max_rate_limit_wait {
            log::error!(
                target: LOG_TARGET,
                "Rate limit resets in {}s, longer than the allowed wait of {}s",
                delay.as_secs(),
                self.config.max_rate_limit_wait.as_secs()
            );
            return Err(FetchError::RateLimitExceeded {
                reset_at: Some(state.reset_at),
            });
        }

        log::warn!(
            target: LOG_TARGET,
            "Only {} API requests remaining, waiting {}s for the rate limit to reset",
            state.remaining,
            delay.as_secs()
        );
        self.progress
            .set_message(format!("waiting {}s for the rate limit to reset", delay.as_secs()));

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(FetchError::Cancelled),
            () = tokio::time::sleep(delay) => Ok(()),
        }
    }

    async fn read_cache(&self, org: &str) -> Option<Vec<Repository>> {
        let cache = self.cache.as_ref()?;
        match cache.get(ORG_REPOS_PREFIX, &cache_identifier(org)).await {
            Ok(hit) => hit,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Could not read cached repositories of '{org}': {e:#}");
                None
            }
        }
    }

    async fn write_cache(&self, org: &str, repositories: &[Repository]) {
        let Some(cache) = &self.cache else {
            return;
        };

        if let Err(e) = cache.set(ORG_REPOS_PREFIX, &cache_identifier(org), repositories).await {
            log::warn!(target: LOG_TARGET, "Could not cache repositories of '{org}': {e:#}");
        }
    }
}

/// Organization logins are case-insensitive, so `Acme` and `acme` share an entry.
fn cache_identifier(org: &str) -> String {
    org.to_lowercase()
}
