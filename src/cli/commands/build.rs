//! Pipeline commands: build, fetch, render

use crate::cli::args::{BuildArgs, OutputFormat};
use crate::config::{CacheLayout, Config};
use crate::error::Result;
use crate::github::GitHubClient;
use crate::output;
use crate::pipeline::{self, BuildReport};

/// Handle the build command (also the default when no command is given)
pub fn build(
    client: &GitHubClient,
    config: &Config,
    layout: &CacheLayout,
    args: &BuildArgs,
    format: OutputFormat,
) -> Result<String> {
    let report = pipeline::build(client, config, layout)?;
    finish(report, args, format)
}

/// Handle the fetch command
pub fn fetch(
    client: &GitHubClient,
    config: &Config,
    layout: &CacheLayout,
    format: OutputFormat,
) -> Result<String> {
    let outcome = pipeline::fetch(client, config, layout)?;
    output::format_fetch(&outcome, format)
}

/// Handle the render command
pub fn render(
    config: &Config,
    layout: &CacheLayout,
    args: &BuildArgs,
    format: OutputFormat,
) -> Result<String> {
    let report = pipeline::render_cached(config, layout)?;
    finish(report, args, format)
}

/// With `--stdout` the HTML replaces the report on stdout
fn finish(report: BuildReport, args: &BuildArgs, format: OutputFormat) -> Result<String> {
    if args.stdout {
        return Ok(report.html);
    }
    output::format_build_report(&report, format)
}
