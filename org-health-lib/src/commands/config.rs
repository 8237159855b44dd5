use crate::Result;
use crate::facts::{DEFAULT_API_URL, FetcherConfig};
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked for when none is given explicitly.
pub const CONFIG_FILE_NAME: &str = "org-health.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Duration to keep fetched repository lists cached
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Maximum number of repositories scored per organization
    #[serde(default = "default_max_repos")]
    pub max_repos: usize,

    /// Repositories requested per API call
    #[serde(default = "default_page_size")]
    pub page_size: u8,

    /// Remaining request count below which the fetcher waits for the rate limit to reset
    #[serde(default = "default_rate_limit_low_water")]
    pub rate_limit_low_water: u64,

    /// Longest tolerated wait for a rate limit reset
    #[serde(default = "default_max_rate_limit_wait", with = "humantime_serde")]
    pub max_rate_limit_wait: Duration,

    /// Timeout for a single API request
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// GraphQL endpoint URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Directory where reports are written
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

const fn default_cache_ttl() -> Duration {
    Duration::from_secs(60 * 60)
}

const fn default_max_repos() -> usize {
    crate::selection::DEFAULT_MAX_COUNT
}

const fn default_page_size() -> u8 {
    50
}

const fn default_rate_limit_low_water() -> u64 {
    10
}

const fn default_max_rate_limit_wait() -> Duration {
    Duration::from_secs(60 * 60)
}

const fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// With no explicit path, `org-health.toml` in `base_dir` is used if present.
    pub fn load(base_dir: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = base_dir.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Settings for the repository fetcher.
    #[must_use]
    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            api_url: self.api_url.clone(),
            page_size: self.page_size,
            low_water_mark: self.rate_limit_low_water,
            max_rate_limit_wait: self.max_rate_limit_wait,
            request_timeout: self.request_timeout,
        }
    }

    fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.page_size) {
            return Err(app_err!("page_size must be between 1 and 100, got {}", self.page_size));
        }

        if self.max_repos == 0 {
            return Err(app_err!("max_repos must be at least 1"));
        }

        if self.request_timeout.is_zero() {
            return Err(app_err!("request_timeout must be greater than zero"));
        }

        let url = url::Url::parse(&self.api_url).into_app_err_with(|| format!("api_url '{}' is not a valid URL", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(app_err!("api_url must use http or https, got '{}'", self.api_url));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl: default_cache_ttl(),
            max_repos: default_max_repos(),
            page_size: default_page_size(),
            rate_limit_low_water: default_rate_limit_low_water(),
            max_rate_limit_wait: default_max_rate_limit_wait(),
            request_timeout: default_request_timeout(),
            api_url: default_api_url(),
            results_dir: default_results_dir(),
        }
    }
}
