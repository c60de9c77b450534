//! Fetch, cache and render, in that order

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use crate::cache::{LanguageCache, RepoListCache};
use crate::config::{CacheLayout, Config};
use crate::error::Result;
use crate::github::{GitHubClient, LanguageMap, RepositorySummary};
use crate::render::{render_site, RenderOptions};

/// Everything the fetch steps produced
#[derive(Debug)]
pub struct FetchOutcome {
    pub summaries: Vec<RepositorySummary>,
    pub languages: HashMap<String, LanguageMap>,
    /// Whether the repository list came from the network this run
    pub repo_list_fetched: bool,
    /// Number of language maps fetched this run
    pub languages_fetched: usize,
}

/// Summary of a pipeline run, printed by the CLI
#[derive(Debug, Serialize)]
pub struct BuildReport {
    pub account: String,
    pub output: PathBuf,
    pub repositories: usize,
    pub repo_list_fetched: bool,
    pub languages_fetched: usize,
    #[serde(skip)]
    pub html: String,
}

/// Run the repository lister, then the language fetcher
pub fn fetch(client: &GitHubClient, config: &Config, layout: &CacheLayout) -> Result<FetchOutcome> {
    let account = config.site.account.as_str();

    let repo_list = RepoListCache::new(&layout.repo_list);
    let repo_list_fetched = repo_list.ensure_cached(client, account, config.api.per_page)?;
    let summaries = repo_list.load()?;

    let language_cache = LanguageCache::new(&layout.language_dir);
    let sync = language_cache.ensure_cached(client, account, &summaries, config.fetch.concurrency)?;

    Ok(FetchOutcome {
        summaries,
        languages: sync.languages,
        repo_list_fetched,
        languages_fetched: sync.fetched,
    })
}

/// Full run: fetch anything missing, render, write the output file
pub fn build(client: &GitHubClient, config: &Config, layout: &CacheLayout) -> Result<BuildReport> {
    let outcome = fetch(client, config, layout)?;
    let html = render_site(
        &outcome.summaries,
        &outcome.languages,
        &RenderOptions::from_config(config),
    )?;
    write_output(layout, &html)?;

    Ok(BuildReport {
        account: config.site.account.clone(),
        output: layout.output.clone(),
        repositories: outcome.summaries.len(),
        repo_list_fetched: outcome.repo_list_fetched,
        languages_fetched: outcome.languages_fetched,
        html,
    })
}

/// Render from whatever is cached, without touching the network
pub fn render_cached(config: &Config, layout: &CacheLayout) -> Result<BuildReport> {
    let summaries = RepoListCache::new(&layout.repo_list).load()?;
    let languages = LanguageCache::new(&layout.language_dir).load_existing(&summaries)?;

    let html = render_site(&summaries, &languages, &RenderOptions::from_config(config))?;
    write_output(layout, &html)?;

    Ok(BuildReport {
        account: config.site.account.clone(),
        output: layout.output.clone(),
        repositories: summaries.len(),
        repo_list_fetched: false,
        languages_fetched: 0,
        html,
    })
}

fn write_output(layout: &CacheLayout, html: &str) -> Result<()> {
    if let Some(parent) = layout.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&layout.output, html)?;
    info!(path = %layout.output.display(), bytes = html.len(), "Site written");
    Ok(())
}
