//! HTML rendering of the repository list
//!
//! Rendering is a pure function of the summaries, their language maps and the options.

mod template;

pub use template::page;

use std::collections::HashMap;

use tracing::warn;

use crate::config::{Config, MissingLanguages};
use crate::error::{Result, SiteError};
use crate::github::{LanguageMap, RepositorySummary};

/// Page text and lookup policy
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub title: String,
    pub headings: Vec<String>,
    pub missing_languages: MissingLanguages,
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            title: config.site.title.clone(),
            headings: config.site.headings.clone(),
            missing_languages: config.render.missing_languages,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Render the full HTML document
pub fn render_site(
    summaries: &[RepositorySummary],
    languages: &HashMap<String, LanguageMap>,
    options: &RenderOptions,
) -> Result<String> {
    let body = render_body(summaries, languages, options)?;
    Ok(page(&options.title, &body))
}

/// Render headings plus the sorted list, without the page shell
pub fn render_body(
    summaries: &[RepositorySummary],
    languages: &HashMap<String, LanguageMap>,
    options: &RenderOptions,
) -> Result<String> {
    let empty = LanguageMap::default();
    let mut items = String::new();

    for summary in sort_by_updated(summaries) {
        let repo_languages = match languages.get(&summary.name) {
            Some(map) => map,
            None => match options.missing_languages {
                MissingLanguages::Error => {
                    return Err(SiteError::MissingLanguages(summary.name.clone()))
                }
                MissingLanguages::Empty => {
                    warn!(repo = %summary.name, "No cached languages, rendering an empty list");
                    &empty
                }
            },
        };
        items.push_str(&render_item(summary, repo_languages));
    }

    let headings: String = options
        .headings
        .iter()
        .map(|h| format!("<h1>{}</h1>", escape_html(h)))
        .collect();

    Ok(format!("    {headings}\n    <ul>{items}\n    </ul>"))
}

/// Newest first; repositories updated at the same instant keep their input order
pub fn sort_by_updated(summaries: &[RepositorySummary]) -> Vec<&RepositorySummary> {
    let mut sorted: Vec<_> = summaries.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted
}

fn render_item(summary: &RepositorySummary, languages: &LanguageMap) -> String {
    format!(
        r#"
        <li>
            <a href="{url}" target="_blank" rel="noopener">
                <div class="row">
                    <div>
                        <b>{name}</b>
                        <span> - {description}</span>
                    </div>
                    <div>
                        <span>{languages}</span>
                    </div>
                </div>
            </a>
        </li>"#,
        url = escape_html(&summary.url),
        name = escape_html(&summary.name),
        description = escape_html(summary.description.as_deref().unwrap_or("")),
        languages = escape_html(&languages.joined_names()),
    )
}

/// Escape text for use in element content and double-quoted attributes
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
