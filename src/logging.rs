//! Tracing subscriber setup
//!
//! Events go to stderr so stdout stays usable for reports and `--stdout` HTML.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Result, SiteError};

/// Pick the default filter directive from the verbosity flags
pub fn level_for(verbose: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| SiteError::Logging(e.to_string()))?;

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr),
    );

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| SiteError::Logging(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), "info");
        assert_eq!(level_for(true, false), "debug");
        assert_eq!(level_for(false, true), "error");
    }
}
