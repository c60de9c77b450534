use colored::Colorize;

use crate::pipeline::{BuildReport, FetchOutcome};

fn fetched_or_cached(fetched: bool) -> colored::ColoredString {
    if fetched {
        "fetched".green()
    } else {
        "cached".dimmed()
    }
}

/// Format a build or render report for pretty output
pub fn format_build_report(report: &BuildReport) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "{} Site written to {}\n",
        "✓".green(),
        report.output.display().to_string().bold()
    ));
    output.push_str(&format!("  {} {}\n", "Account:".cyan(), report.account));
    output.push_str(&format!(
        "  {} {} ({})\n",
        "Repositories:".cyan(),
        report.repositories,
        fetched_or_cached(report.repo_list_fetched)
    ));
    output.push_str(&format!(
        "  {} {} fetched this run",
        "Languages:".cyan(),
        report.languages_fetched
    ));
    output
}

/// Format a fetch-only run for pretty output
pub fn format_fetch(outcome: &FetchOutcome) -> String {
    let mut output = String::new();
    output.push_str(&format!("{} Cache up to date\n", "✓".green()));
    output.push_str(&format!(
        "  {} {} ({})\n",
        "Repositories:".cyan(),
        outcome.summaries.len(),
        fetched_or_cached(outcome.repo_list_fetched)
    ));
    output.push_str(&format!(
        "  {} {} cached, {} fetched this run",
        "Languages:".cyan(),
        outcome.languages.len(),
        outcome.languages_fetched
    ));
    output
}
