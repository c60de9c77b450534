pub mod json;
pub mod pretty;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::pipeline::{BuildReport, FetchOutcome};

/// Format a build or render report based on output format
pub fn format_build_report(report: &BuildReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_build_report(report)),
        OutputFormat::Json => json::format_build_report(report),
    }
}

/// Format a fetch-only run based on output format
pub fn format_fetch(outcome: &FetchOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Pretty => Ok(pretty::format_fetch(outcome)),
        OutputFormat::Json => json::format_fetch(outcome),
    }
}
