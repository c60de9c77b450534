//! Per-repository language map caching

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

use tracing::{debug, error, info};

use crate::cache::{age_secs, write_json_pretty, CacheEntryStatus};
use crate::error::{Result, SiteError};
use crate::github::{GitHubClient, LanguageMap, RepositorySummary};

/// Result of a fetch-or-skip pass followed by a full re-read
#[derive(Debug)]
pub struct LanguageSync {
    /// Every summary's language map, keyed by repository name
    pub languages: HashMap<String, LanguageMap>,
    /// How many repositories were fetched from the network in this pass
    pub fetched: usize,
}

/// One file per repository under a directory, named after the repository
pub struct LanguageCache {
    dir: PathBuf,
}

impl LanguageCache {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a repository's entry. Names that would leave the directory are rejected.
    pub fn entry_path(&self, repo: &str) -> Result<PathBuf> {
        let escapes = repo.is_empty()
            || repo == "."
            || repo == ".."
            || repo.contains(['/', '\\', '\0']);
        if escapes {
            return Err(SiteError::InvalidArgument(format!(
                "repository name cannot be used as a cache file name: '{repo}'"
            )));
        }
        Ok(self.dir.join(repo))
    }

    pub fn contains(&self, repo: &str) -> Result<bool> {
        Ok(self.entry_path(repo)?.exists())
    }

    /// Fetch every missing entry, then re-read all entries from disk
    ///
    /// Up to `concurrency` fetches run at once. The first failure stops any further
    /// fetches from starting and fails the whole pass. All workers finish before the
    /// re-read begins.
    pub fn ensure_cached(
        &self,
        client: &GitHubClient,
        account: &str,
        summaries: &[RepositorySummary],
        concurrency: usize,
    ) -> Result<LanguageSync> {
        let mut missing = Vec::new();
        for summary in summaries {
            if !self.contains(&summary.name)? {
                debug!(repo = %summary.name, "Languages not cached");
                missing.push(summary.name.as_str());
            }
        }

        let fetched = self.fetch_missing(client, account, &missing, concurrency)?;
        if fetched > 0 {
            info!(fetched, "Language fetch pass complete");
        } else {
            info!("All languages already cached, skipping");
        }

        let languages = self.load_all(summaries)?;
        Ok(LanguageSync { languages, fetched })
    }

    fn fetch_missing(
        &self,
        client: &GitHubClient,
        account: &str,
        missing: &[&str],
        concurrency: usize,
    ) -> Result<usize> {
        if missing.is_empty() {
            return Ok(0);
        }

        let workers = concurrency.clamp(1, missing.len());
        let next = AtomicUsize::new(0);
        let fetched = AtomicUsize::new(0);
        let abort = AtomicBool::new(false);
        let first_error: Mutex<Option<SiteError>> = Mutex::new(None);

        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    while !abort.load(Ordering::Relaxed) {
                        let index = next.fetch_add(1, Ordering::Relaxed);
                        let Some(&repo) = missing.get(index) else {
                            break;
                        };

                        match self.fetch_one(client, account, repo) {
                            Ok(()) => {
                                fetched.fetch_add(1, Ordering::Relaxed);
                            }
                            Err(e) => {
                                error!(repo, error = %e, "Language fetch failed");
                                abort.store(true, Ordering::Relaxed);
                                let mut slot =
                                    first_error.lock().unwrap_or_else(|p| p.into_inner());
                                if slot.is_none() {
                                    *slot = Some(SiteError::language_fetch(repo, e));
                                }
                            }
                        }
                    }
                });
            }
        });

        match first_error.into_inner().unwrap_or_else(|p| p.into_inner()) {
            Some(e) => Err(e),
            None => Ok(fetched.into_inner()),
        }
    }

    fn fetch_one(&self, client: &GitHubClient, account: &str, repo: &str) -> Result<()> {
        info!(repo, "Fetching languages");
        let path = self.entry_path(repo)?;
        let body = client.languages(account, repo)?;
        serde_json::from_value::<LanguageMap>(body.clone())?;
        write_json_pretty(&path, &body)?;
        debug!(path = %path.display(), "Languages written");
        Ok(())
    }

    /// Read one repository's entry
    pub fn load(&self, repo: &str) -> Result<LanguageMap> {
        let path = self.entry_path(repo)?;
        if !path.exists() {
            return Err(SiteError::CacheMissing(path.display().to_string()));
        }
        let data = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Read every summary's entry; a missing entry is an error
    pub fn load_all(&self, summaries: &[RepositorySummary]) -> Result<HashMap<String, LanguageMap>> {
        summaries
            .iter()
            .map(|s| -> Result<(String, LanguageMap)> { Ok((s.name.clone(), self.load(&s.name)?)) })
            .collect()
    }

    /// Read the entries that exist, skipping repositories that were never fetched
    pub fn load_existing(
        &self,
        summaries: &[RepositorySummary],
    ) -> Result<HashMap<String, LanguageMap>> {
        let mut languages = HashMap::new();
        for summary in summaries {
            if self.contains(&summary.name)? {
                languages.insert(summary.name.clone(), self.load(&summary.name)?);
            }
        }
        Ok(languages)
    }

    /// Delete one repository's entry so the next run refetches it
    ///
    /// Returns whether an entry existed.
    pub fn remove(&self, repo: &str) -> Result<bool> {
        let path = self.entry_path(repo)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        Ok(true)
    }

    /// Clear the whole language directory
    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// Number of cached entries
    pub fn count(&self) -> Option<usize> {
        let entries = std::fs::read_dir(&self.dir).ok()?;
        Some(
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                .filter(|e| !e.file_name().to_string_lossy().ends_with(".tmp"))
                .count(),
        )
    }

    /// Get cache status
    pub fn status(&self) -> CacheEntryStatus {
        if !self.dir.is_dir() {
            return CacheEntryStatus {
                exists: false,
                age_secs: None,
                count: None,
            };
        }

        CacheEntryStatus {
            exists: true,
            age_secs: age_secs(&self.dir),
            count: self.count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::{TimeZone, Utc};
    use mockito::Server;
    use tempfile::TempDir;

    fn summary(name: &str) -> RepositorySummary {
        RepositorySummary {
            name: name.to_string(),
            description: None,
            url: format!("https://github.com/endj/{name}"),
            primary_language: None,
            topics: Vec::new(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn client_for(server: &Server) -> GitHubClient {
        let mut config = Config::default();
        config.api.base_url = server.url();
        GitHubClient::new(&config).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entry Path Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_entry_path_is_named_after_repo() {
        let cache = LanguageCache::new(Path::new("/cache/languages"));
        assert_eq!(
            cache.entry_path("my-repo.rs").unwrap(),
            PathBuf::from("/cache/languages/my-repo.rs")
        );
    }

    #[test]
    fn test_entry_path_rejects_escaping_names() {
        let cache = LanguageCache::new(Path::new("/cache/languages"));
        for name in ["", ".", "..", "../etc", "a/b", "a\\b"] {
            assert!(cache.entry_path(name).is_err(), "accepted {name:?}");
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Fetch Pass Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_ensure_cached_fetches_only_missing() {
        let mut server = Server::new();
        let fetch_b = server
            .mock("GET", "/repos/endj/b/languages")
            .with_status(200)
            .with_body(r#"{"TypeScript": 50, "CSS": 10}"#)
            .expect(1)
            .create();
        let fetch_a = server
            .mock("GET", "/repos/endj/a/languages")
            .expect(0)
            .create();

        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(&temp_dir.path().join("languages"));
        std::fs::create_dir_all(cache.dir()).unwrap();
        std::fs::write(cache.dir().join("a"), r#"{"Go": 100}"#).unwrap();

        let sync = cache
            .ensure_cached(
                &client_for(&server),
                "endj",
                &[summary("a"), summary("b")],
                4,
            )
            .unwrap();

        fetch_a.assert();
        fetch_b.assert();
        assert_eq!(sync.fetched, 1);
        assert_eq!(sync.languages["a"].joined_names(), "Go");
        assert_eq!(sync.languages["b"].joined_names(), "TypeScript, CSS");
    }

    #[test]
    fn test_ensure_cached_creates_directory() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/repos/endj/a/languages")
            .with_status(200)
            .with_body(r#"{"Rust": 1}"#)
            .create();

        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(&temp_dir.path().join("deep").join("languages"));

        cache
            .ensure_cached(&client_for(&server), "endj", &[summary("a")], 1)
            .unwrap();

        let contents = std::fs::read_to_string(cache.dir().join("a")).unwrap();
        assert_eq!(contents, "{\n  \"Rust\": 1\n}");
    }

    #[test]
    fn test_ensure_cached_with_everything_cached_makes_no_requests() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .expect(0)
            .create();

        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("a"), "{}").unwrap();

        let sync = cache
            .ensure_cached(&client_for(&server), "endj", &[summary("a")], 4)
            .unwrap();

        mock.assert();
        assert_eq!(sync.fetched, 0);
        assert!(sync.languages["a"].is_empty());
    }

    #[test]
    fn test_serialized_pass_stops_at_first_failure() {
        let mut server = Server::new();
        let ok = server
            .mock("GET", "/repos/endj/a/languages")
            .with_status(200)
            .with_body(r#"{"Go": 1}"#)
            .expect(1)
            .create();
        let failing = server
            .mock("GET", "/repos/endj/b/languages")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .expect(1)
            .create();
        let never = server
            .mock("GET", "/repos/endj/c/languages")
            .expect(0)
            .create();

        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());

        let err = cache
            .ensure_cached(
                &client_for(&server),
                "endj",
                &[summary("a"), summary("b"), summary("c")],
                1,
            )
            .unwrap_err();

        ok.assert();
        failing.assert();
        never.assert();
        match err {
            SiteError::LanguageFetch { repo, source } => {
                assert_eq!(repo, "b");
                assert!(matches!(*source, SiteError::Api { status: 404, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!temp_dir.path().join("b").exists());
        assert!(!temp_dir.path().join("c").exists());
    }

    #[test]
    fn test_unloadable_body_is_not_cached() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/repos/endj/a/languages")
            .with_status(200)
            .with_body(r#"{"Go": 1.5}"#)
            .expect(2)
            .create();

        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());
        let client = client_for(&server);

        let err = cache
            .ensure_cached(&client, "endj", &[summary("a")], 4)
            .unwrap_err();
        match err {
            SiteError::LanguageFetch { repo, source } => {
                assert_eq!(repo, "a");
                assert!(matches!(*source, SiteError::Json(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!temp_dir.path().join("a").exists());

        // The entry is still missing, so the next pass refetches it
        assert!(cache
            .ensure_cached(&client, "endj", &[summary("a")], 4)
            .is_err());
        mock.assert();
    }

    #[test]
    fn test_pooled_pass_reports_failing_repo() {
        let mut server = Server::new();
        let names: Vec<String> = (0..8).map(|i| format!("repo{i}")).collect();
        let mut mocks = Vec::new();
        for name in names.iter().filter(|n| n.as_str() != "repo3") {
            mocks.push(
                server
                    .mock("GET", format!("/repos/endj/{name}/languages").as_str())
                    .with_status(200)
                    .with_body(r#"{"Rust": 1}"#)
                    .expect_at_most(1)
                    .create(),
            );
        }
        let failing = server
            .mock("GET", "/repos/endj/repo3/languages")
            .with_status(500)
            .with_body(r#"{"message": "Server Error"}"#)
            .expect(1)
            .create();

        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());
        let summaries: Vec<_> = names.iter().map(|n| summary(n)).collect();

        let err = cache
            .ensure_cached(&client_for(&server), "endj", &summaries, 4)
            .unwrap_err();

        failing.assert();
        for mock in &mocks {
            mock.assert();
        }
        match err {
            SiteError::LanguageFetch { repo, source } => {
                assert_eq!(repo, "repo3");
                assert!(matches!(*source, SiteError::Api { status: 500, .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!temp_dir.path().join("repo3").exists());
        assert!(!temp_dir.path().join("repo3.tmp").exists());
    }

    #[test]
    fn test_concurrent_pass_fetches_everything() {
        let mut server = Server::new();
        let names: Vec<String> = (0..10).map(|i| format!("repo{i}")).collect();
        let mocks: Vec<_> = names
            .iter()
            .map(|name| {
                server
                    .mock("GET", format!("/repos/endj/{name}/languages").as_str())
                    .with_status(200)
                    .with_body(format!(r#"{{"{name}-lang": 1}}"#))
                    .expect(1)
                    .create()
            })
            .collect();

        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());
        let summaries: Vec<_> = names.iter().map(|n| summary(n)).collect();

        let sync = cache
            .ensure_cached(&client_for(&server), "endj", &summaries, 3)
            .unwrap();

        for mock in &mocks {
            mock.assert();
        }
        assert_eq!(sync.fetched, 10);
        assert_eq!(sync.languages.len(), 10);
        assert_eq!(sync.languages["repo7"].joined_names(), "repo7-lang");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_load_all_fails_on_missing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());

        let err = cache.load_all(&[summary("ghost")]).unwrap_err();
        assert!(matches!(err, SiteError::CacheMissing(_)));
    }

    #[test]
    fn test_load_existing_skips_missing_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("a"), r#"{"Go": 1}"#).unwrap();

        let languages = cache.load_existing(&[summary("a"), summary("ghost")]).unwrap();
        assert_eq!(languages.len(), 1);
        assert!(languages.contains_key("a"));
    }

    #[test]
    fn test_load_malformed_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("a"), "[1, 2]").unwrap();

        assert!(matches!(cache.load("a"), Err(SiteError::Json(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Remove/Clear/Status Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_remove_single_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(temp_dir.path());
        std::fs::write(temp_dir.path().join("a"), "{}").unwrap();

        assert!(cache.remove("a").unwrap());
        assert!(!cache.remove("a").unwrap());
    }

    #[test]
    fn test_status_counts_entries() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(&temp_dir.path().join("languages"));
        std::fs::create_dir_all(cache.dir()).unwrap();
        std::fs::write(cache.dir().join("a"), "{}").unwrap();
        std::fs::write(cache.dir().join("b"), "{}").unwrap();

        let status = cache.status();
        assert!(status.exists);
        assert_eq!(status.count, Some(2));
    }

    #[test]
    fn test_clear_removes_directory() {
        let temp_dir = TempDir::new().unwrap();
        let cache = LanguageCache::new(&temp_dir.path().join("languages"));
        std::fs::create_dir_all(cache.dir()).unwrap();
        std::fs::write(cache.dir().join("a"), "{}").unwrap();

        cache.clear().unwrap();
        assert!(!cache.dir().exists());
        assert!(!cache.status().exists);
    }
}
