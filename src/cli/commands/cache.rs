//! Cache management commands

use colored::Colorize;

use crate::cache::{self, CacheEntryStatus, LanguageCache};
use crate::cli::args::{CacheArgs, CacheCommands, OutputFormat};
use crate::config::CacheLayout;
use crate::error::Result;

/// Handle cache commands
pub fn cache(layout: &CacheLayout, args: &CacheArgs, format: OutputFormat) -> Result<String> {
    match &args.command {
        CacheCommands::Status => status(layout, format),
        CacheCommands::Clear { repo: None } => clear(layout, format),
        CacheCommands::Clear { repo: Some(repo) } => clear_repo(layout, repo, format),
    }
}

fn status(layout: &CacheLayout, format: OutputFormat) -> Result<String> {
    let status = cache::status(layout);

    match format {
        OutputFormat::Pretty => {
            let mut output = String::new();
            output.push_str(&format!("{}\n", "Cache Status".bold()));

            output.push_str(&format!(
                "\n{} {}\n",
                "Repository list:".dimmed(),
                layout.repo_list.display()
            ));
            push_entry(&mut output, &status.repo_list, "Repositories");

            output.push_str(&format!(
                "\n{} {}\n",
                "Languages:".dimmed(),
                layout.language_dir.display()
            ));
            push_entry(&mut output, &status.languages, "Entries");

            Ok(output.trim_end().to_string())
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "repo_list_path": layout.repo_list.to_string_lossy(),
                "language_dir": layout.language_dir.to_string_lossy(),
                "repo_list": status.repo_list,
                "languages": status.languages,
            });
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}

fn push_entry(output: &mut String, entry: &CacheEntryStatus, count_label: &str) {
    if !entry.exists {
        output.push_str(&format!("  {}\n", "Not cached".dimmed()));
        return;
    }
    if let Some(count) = entry.count {
        output.push_str(&format!("  {}: {}\n", count_label, count));
    }
    if let Some(age) = entry.age_secs {
        output.push_str(&format!("  Age: {}\n", format_age(age)));
    }
}

fn clear(layout: &CacheLayout, format: OutputFormat) -> Result<String> {
    cache::clear_all(layout)?;

    match format {
        OutputFormat::Pretty => Ok(format!("{} Cache cleared", "✓".green())),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "status": "cleared"
            });
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}

fn clear_repo(layout: &CacheLayout, repo: &str, format: OutputFormat) -> Result<String> {
    let removed = LanguageCache::new(&layout.language_dir).remove(repo)?;

    match format {
        OutputFormat::Pretty if removed => Ok(format!(
            "{} Cleared cached languages for {}",
            "✓".green(),
            repo.bold()
        )),
        OutputFormat::Pretty => Ok(format!("No cached languages for {}", repo)),
        OutputFormat::Json => {
            let json = serde_json::json!({
                "repo": repo,
                "status": if removed { "cleared" } else { "not_cached" },
            });
            Ok(serde_json::to_string_pretty(&json)?)
        }
    }
}

/// Format age in human-readable form
fn format_age(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86_400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86_400, (secs % 86_400) / 3600)
    }
}
