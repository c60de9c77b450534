use serde::{Deserialize, Serialize};
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use super::paths::Paths;
use crate::error::{Result, SiteError};

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";
pub const DEFAULT_ACCOUNT: &str = "endj";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Whose repositories, and how the page is titled
    #[serde(default)]
    pub site: SiteConfig,

    /// Cache file locations
    #[serde(default)]
    pub cache: CacheConfig,

    /// Output file and report format
    #[serde(default)]
    pub output: OutputConfig,

    /// Language fetch pass tuning
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Rendering behavior
    #[serde(default)]
    pub render: RenderConfig,
}

/// API-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// GitHub token; unauthenticated requests work with a lower rate limit
    pub token: Option<String>,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            per_page: default_per_page(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_account")]
    pub account: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_headings")]
    pub headings: Vec<String>,
}

fn default_account() -> String {
    DEFAULT_ACCOUNT.to_string()
}

fn default_title() -> String {
    "Repositories".to_string()
}

fn default_headings() -> Vec<String> {
    vec![
        "This is my website.".to_string(),
        "Here are some repositories.".to_string(),
    ]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            account: default_account(),
            title: default_title(),
            headings: default_headings(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Raw repository list JSON
    #[serde(default = "default_repo_list")]
    pub repo_list: PathBuf,
    /// One file per repository holding its language map
    #[serde(default = "default_language_dir")]
    pub language_dir: PathBuf,
}

fn default_repo_list() -> PathBuf {
    PathBuf::from("repos.json")
}

fn default_language_dir() -> PathBuf {
    PathBuf::from("languages")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            repo_list: default_repo_list(),
            language_dir: default_language_dir(),
        }
    }
}

/// Output file and report formatting preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    /// Default report format when `--output` is not given
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_format() -> String {
    "pretty".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: default_format(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Maximum concurrent language fetches; 1 serializes the pass
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    4
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub missing_languages: MissingLanguages,
}

/// What the renderer does with a repository that has no cached language map
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingLanguages {
    /// Fail the render
    #[default]
    Error,
    /// Render an empty language list
    Empty,
}

/// Resolved filesystem locations used by the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheLayout {
    pub repo_list: PathBuf,
    pub language_dir: PathBuf,
    pub output: PathBuf,
}

impl Config {
    /// Load configuration from a specific paths instance
    pub fn load_from(paths: &Paths) -> Result<Self> {
        if !paths.config_exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&paths.config_file)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific paths instance
    pub fn save_to(&self, paths: &Paths) -> Result<()> {
        if let Some(parent) = paths.config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(&paths.config_file, &contents)?;

        // Config may contain an API token
        #[cfg(unix)]
        {
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&paths.config_file, perms)?;
        }

        Ok(())
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.site.account.trim().is_empty() {
            return Err(SiteError::Config("site.account must not be empty".to_string()));
        }
        if !(1..=100).contains(&self.api.per_page) {
            return Err(SiteError::Config(
                "api.per_page must be between 1 and 100".to_string(),
            ));
        }
        if self.fetch.concurrency == 0 {
            return Err(SiteError::Config(
                "fetch.concurrency must be at least 1".to_string(),
            ));
        }
        if self.output.format != "pretty" && self.output.format != "json" {
            return Err(SiteError::Config(
                "output.format must be 'pretty' or 'json'".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve cache and output locations against the config root
    pub fn layout(&self, paths: &Paths) -> CacheLayout {
        CacheLayout {
            repo_list: paths.anchor(&self.cache.repo_list),
            language_dir: paths.anchor(&self.cache.language_dir),
            output: paths.anchor(&self.output.path),
        }
    }

    /// Set the API token
    pub fn set_token(&mut self, token: String) {
        self.api.token = Some(token);
    }

    /// Set a value by dotted key, as used by `config set`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.token" => self.set_token(value.to_string()),
            "api.base_url" => self.api.base_url = value.to_string(),
            "api.per_page" => self.api.per_page = parse_number(key, value)?,
            "api.timeout_secs" => self.api.timeout_secs = parse_number(key, value)?,
            "site.account" => self.site.account = value.to_string(),
            "site.title" => self.site.title = value.to_string(),
            "cache.repo_list" => self.cache.repo_list = PathBuf::from(value),
            "cache.language_dir" => self.cache.language_dir = PathBuf::from(value),
            "output.path" => self.output.path = PathBuf::from(value),
            "output.format" => self.output.format = value.to_string(),
            "fetch.concurrency" => self.fetch.concurrency = parse_number(key, value)?,
            "render.missing_languages" => {
                self.render.missing_languages = match value {
                    "error" => MissingLanguages::Error,
                    "empty" => MissingLanguages::Empty,
                    _ => {
                        return Err(SiteError::InvalidArgument(
                            "render.missing_languages must be 'error' or 'empty'".to_string(),
                        ))
                    }
                }
            }
            _ => {
                return Err(SiteError::InvalidArgument(format!(
                    "Unknown config key: {}. Valid keys: {}",
                    key,
                    SETTABLE_KEYS.join(", ")
                )));
            }
        }
        self.validate()
    }
}

/// Keys accepted by [`Config::set_value`]
pub const SETTABLE_KEYS: &[&str] = &[
    "api.token",
    "api.base_url",
    "api.per_page",
    "api.timeout_secs",
    "site.account",
    "site.title",
    "cache.repo_list",
    "cache.language_dir",
    "output.path",
    "output.format",
    "fetch.concurrency",
    "render.missing_languages",
];

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SiteError::InvalidArgument(format!("{key} expects a number, got '{value}'")))
}
