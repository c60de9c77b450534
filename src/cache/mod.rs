//! On-disk cache of GitHub responses
//!
//! Entries are created on first successful fetch and never expire. Delete them (or run
//! `reposite cache clear`) to force a refresh.

mod languages;
mod repos;

pub use languages::{LanguageCache, LanguageSync};
pub use repos::RepoListCache;

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use serde::Serialize;
use serde_json::Value;

use crate::config::CacheLayout;
use crate::error::Result;

/// Clear all cached data. The rendered output file is left alone.
pub fn clear_all(layout: &CacheLayout) -> Result<()> {
    RepoListCache::new(&layout.repo_list).clear()?;
    LanguageCache::new(&layout.language_dir).clear()?;
    Ok(())
}

/// Get cache status information
pub fn status(layout: &CacheLayout) -> CacheStatus {
    CacheStatus {
        repo_list: RepoListCache::new(&layout.repo_list).status(),
        languages: LanguageCache::new(&layout.language_dir).status(),
    }
}

/// Overall cache status
#[derive(Debug, Serialize)]
pub struct CacheStatus {
    pub repo_list: CacheEntryStatus,
    pub languages: CacheEntryStatus,
}

/// Status of a single cache entry
#[derive(Debug, Serialize)]
pub struct CacheEntryStatus {
    pub exists: bool,
    pub age_secs: Option<u64>,
    pub count: Option<usize>,
}

/// Pretty-print `value` (2-space indent, key order kept) and write it atomically
pub(crate) fn write_json_pretty(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(value)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)?;

    Ok(())
}

/// Seconds since the file was last modified
pub(crate) fn age_secs(path: &Path) -> Option<u64> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    SystemTime::now()
        .duration_since(modified)
        .ok()
        .map(|d| d.as_secs())
}
