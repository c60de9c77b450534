//! Repository list caching

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cache::{age_secs, write_json_pretty, CacheEntryStatus};
use crate::error::{Result, SiteError};
use crate::github::{GitHubClient, Repository, RepositorySummary};

/// The raw `GET /users/{account}/repos` response, kept verbatim in one file
pub struct RepoListCache {
    cache_file: PathBuf,
}

impl RepoListCache {
    pub fn new(cache_file: &Path) -> Self {
        Self {
            cache_file: cache_file.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.cache_file
    }

    pub fn exists(&self) -> bool {
        self.cache_file.exists()
    }

    /// Fetch and store the repository list unless it is already cached
    ///
    /// Returns `true` when a fetch happened. On any fetch error, or a body that would not
    /// load back, nothing is written.
    pub fn ensure_cached(
        &self,
        client: &GitHubClient,
        account: &str,
        per_page: u32,
    ) -> Result<bool> {
        if self.exists() {
            info!(path = %self.cache_file.display(), "Repository list already cached, skipping");
            return Ok(false);
        }

        info!(account, "Fetching repository list");
        let body = client.list_repositories(account, per_page)?;
        serde_json::from_value::<Vec<Repository>>(body.clone())?;
        write_json_pretty(&self.cache_file, &body)?;
        info!(path = %self.cache_file.display(), "Repository list written");

        Ok(true)
    }

    /// Parse the cached list into summaries, in file order
    pub fn load(&self) -> Result<Vec<RepositorySummary>> {
        if !self.exists() {
            return Err(SiteError::CacheMissing(
                self.cache_file.display().to_string(),
            ));
        }

        let data = std::fs::read_to_string(&self.cache_file)?;
        let repos: Vec<Repository> = serde_json::from_str(&data)?;
        Ok(repos.into_iter().map(RepositorySummary::from).collect())
    }

    /// Clear the repository list cache
    pub fn clear(&self) -> Result<()> {
        if self.exists() {
            std::fs::remove_file(&self.cache_file)?;
        }
        Ok(())
    }

    /// Get cache status
    pub fn status(&self) -> CacheEntryStatus {
        if !self.exists() {
            return CacheEntryStatus {
                exists: false,
                age_secs: None,
                count: None,
            };
        }

        let count = std::fs::read_to_string(&self.cache_file)
            .ok()
            .and_then(|data| serde_json::from_str::<Vec<serde_json::Value>>(&data).ok())
            .map(|repos| repos.len());

        CacheEntryStatus {
            exists: true,
            age_secs: age_secs(&self.cache_file),
            count,
        }
    }
}
