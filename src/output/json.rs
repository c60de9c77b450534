use serde::Serialize;

use crate::error::Result;
use crate::pipeline::{BuildReport, FetchOutcome};

/// Format a build or render report as JSON
pub fn format_build_report(report: &BuildReport) -> Result<String> {
    format_json(report)
}

/// Format a fetch-only run as JSON
pub fn format_fetch(outcome: &FetchOutcome) -> Result<String> {
    format_json(&serde_json::json!({
        "repositories": outcome.summaries.len(),
        "repo_list_fetched": outcome.repo_list_fetched,
        "languages_cached": outcome.languages.len(),
        "languages_fetched": outcome.languages_fetched,
    }))
}

/// Format any serializable value as JSON
pub fn format_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
