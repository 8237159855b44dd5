//! A key-value cache backed by JSON files with per-entry expiry.
//!
//! Entries are addressed by a logical prefix plus an identifier (for example
//! `org_repos` + the organization name) and live at
//! `{dir}/{prefix}/{identifier}.json`. Expired entries are treated as absent and
//! removed when encountered.

use super::cache_lock::acquire_cache_lock;
use super::path_utils::sanitize_path_component;
use crate::Result;
use chrono::{DateTime, Utc};
use core::time::Duration;
use ohno::IntoAppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const LOG_TARGET: &str = "     cache";

/// On-disk representation of a cache entry.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct Envelope<T> {
    key: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    value: T,
}

/// Just enough of an [`Envelope`] to decide whether it has expired.
#[derive(Debug, Deserialize)]
struct Expiry {
    expires_at: DateTime<Utc>,
}

/// A TTL-aware, directory-backed JSON cache.
#[derive(Debug, Clone)]
pub struct Cache {
    dir: PathBuf,
    ttl: Duration,
}

impl Cache {
    /// Create a new cache rooted at `cache_dir`, whose entries live for `ttl`.
    #[must_use]
    pub fn new(cache_dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self { dir: cache_dir.into(), ttl }
    }

    /// Returns the cache directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns how long new entries stay valid.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up an entry. Missing, unreadable and expired entries all read as `None`.
    pub async fn get<T>(&self, prefix: &str, identifier: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let _lock = acquire_cache_lock(&self.dir).await?;
        let key = make_key(prefix, identifier);
        let path = self.entry_path(prefix, identifier);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for {key}: {e:#}");
                return Ok(None);
            }
        };

        let envelope: Envelope<T> = match serde_json::from_reader(BufReader::new(file)) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for {key}: {e:#}");
                return Ok(None);
            }
        };

        if envelope.key != key {
            log::debug!(target: LOG_TARGET, "Cache miss for {key}: file holds '{}'", envelope.key);
            return Ok(None);
        }

        let now = Utc::now();
        if now >= envelope.expires_at {
            log::debug!(target: LOG_TARGET, "Cache expired for {key} (expired at {})", envelope.expires_at);
            remove_entry(&path)?;
            return Ok(None);
        }

        log::debug!(
            target: LOG_TARGET,
            "Cache hit for {key} (age: {}s)",
            now.signed_duration_since(envelope.created_at).num_seconds()
        );
        Ok(Some(envelope.value))
    }

    /// Insert or replace an entry.
    pub async fn set<T>(&self, prefix: &str, identifier: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let _lock = acquire_cache_lock(&self.dir).await?;
        let created_at = Utc::now();
        let expires_at = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| created_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let envelope = Envelope {
            key: make_key(prefix, identifier),
            created_at,
            expires_at,
            value,
        };

        write_envelope(&self.entry_path(prefix, identifier), &envelope)
    }

    /// Remove every expired entry, returning how many were removed.
    pub async fn clear_expired(&self) -> Result<usize> {
        let _lock = acquire_cache_lock(&self.dir).await?;
        let now = Utc::now();
        let mut removed = 0;

        for path in self.entry_files() {
            let expired = File::open(&path)
                .ok()
                .and_then(|f| serde_json::from_reader::<_, Expiry>(BufReader::new(f)).ok())
                .is_some_and(|e| now >= e.expires_at);

            if expired {
                remove_entry(&path)?;
                removed += 1;
            }
        }

        log::debug!(target: LOG_TARGET, "Removed {removed} expired cache entries");
        Ok(removed)
    }

    /// Remove every entry, returning how many were removed.
    pub async fn clear_all(&self) -> Result<usize> {
        let _lock = acquire_cache_lock(&self.dir).await?;
        let mut removed = 0;

        for path in self.entry_files() {
            remove_entry(&path)?;
            removed += 1;
        }

        log::info!(target: LOG_TARGET, "Cleared {removed} cache entries from '{}'", self.dir.display());
        Ok(removed)
    }

    fn entry_path(&self, prefix: &str, identifier: &str) -> PathBuf {
        self.dir
            .join(sanitize_path_component(prefix))
            .join(format!("{}.json", sanitize_path_component(identifier)))
    }

    fn entry_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.dir)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(core::result::Result::ok)
            .filter(|e| !e.file_type().is_dir() && e.path().extension().is_some_and(|ext| ext == "json"))
            .map(walkdir::DirEntry::into_path)
            .collect()
    }
}

fn make_key(prefix: &str, identifier: &str) -> String {
    format!("{prefix}:{identifier}")
}

fn remove_entry(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).into_app_err_with(|| format!("removing cache file '{}'", path.display())),
    }
}

fn write_envelope<T: Serialize>(path: &Path, envelope: &Envelope<T>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_app_err_with(|| format!("creating directory '{}'", parent.display()))?;
    }

    let file = File::create(path).into_app_err_with(|| format!("creating cache file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    #[cfg(debug_assertions)]
    let result = serde_json::to_writer_pretty(&mut writer, envelope);
    #[cfg(not(debug_assertions))]
    let result = serde_json::to_writer(&mut writer, envelope);

    result.into_app_err_with(|| format!("writing cache file '{}'", path.display()))?;
    writer
        .flush()
        .into_app_err_with(|| format!("flushing cache file '{}'", path.display()))?;
    Ok(())
}
