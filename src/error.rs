use thiserror::Error;

/// Result type alias for reposite operations
pub type Result<T> = std::result::Result<T, SiteError>;

/// Errors that can occur while fetching, caching, or rendering
#[derive(Error, Debug)]
pub enum SiteError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// API error with HTTP status
    #[error("GitHub API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsed but had the wrong shape
    #[error("Unexpected response from {endpoint}: expected {expected}")]
    UnexpectedResponse {
        endpoint: String,
        expected: &'static str,
    },

    /// TOML parsing error
    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Failed to write config file: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Invalid API base URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A language fetch failed and aborted the fetch pass
    #[error("Failed to fetch languages for repository {repo}: {source}")]
    LanguageFetch {
        repo: String,
        #[source]
        source: Box<SiteError>,
    },

    /// A repository has no cached language map at render time
    #[error("No cached languages for repository: {0}")]
    MissingLanguages(String),

    /// A cache file required for rendering does not exist
    #[error("Cache not found: {0}. Run 'reposite fetch' first.")]
    CacheMissing(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Logging could not be initialized
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

impl SiteError {
    /// Create an API error from HTTP status and message
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Wrap a per-repository failure
    pub fn language_fetch(repo: impl Into<String>, source: SiteError) -> Self {
        Self::LanguageFetch {
            repo: repo.into(),
            source: Box::new(source),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_)
            | Self::Toml(_)
            | Self::TomlSerialize(_)
            | Self::Url(_)
            | Self::InvalidArgument(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_for_config_errors() {
        assert_eq!(SiteError::Config("bad".to_string()).exit_code(), 2);
        assert_eq!(SiteError::InvalidArgument("bad".to_string()).exit_code(), 2);
    }

    #[test]
    fn test_exit_code_for_runtime_errors() {
        assert_eq!(SiteError::api(500, "boom").exit_code(), 1);
        assert_eq!(SiteError::MissingLanguages("a".to_string()).exit_code(), 1);
    }

    #[test]
    fn test_language_fetch_wraps_source() {
        let err = SiteError::language_fetch("demo", SiteError::api(404, "Not Found"));
        let message = err.to_string();
        assert!(message.contains("demo"));
        assert!(message.contains("HTTP 404"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
