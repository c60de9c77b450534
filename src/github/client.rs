use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{Result, SiteError};

const USER_AGENT: &str = concat!("reposite/", env!("CARGO_PKG_VERSION"));
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Blocking GitHub REST client
///
/// `reqwest::blocking::Client` is `Sync`, so one instance is shared by the language fetch workers.
pub struct GitHubClient {
    client: Client,
    base_url: Url,
}

impl GitHubClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.api.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(SiteError::Config(format!(
                "api.base_url is not a usable base URL: {}",
                config.api.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        if let Some(token) = config.api.token.as_deref().filter(|t| !t.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| SiteError::Config("api.token contains invalid characters".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL under the base, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make a GET request and parse the body as JSON
    fn get_json(&self, url: Url) -> Result<Value> {
        debug!(%url, "GET");
        let response = self.client.get(url).send()?;
        let response = check_response(response)?;

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Repository Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// List up to `per_page` repositories owned by `account`, as the raw JSON array
    pub fn list_repositories(&self, account: &str, per_page: u32) -> Result<Value> {
        let mut url = self.endpoint(&["users", account, "repos"]);
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string());

        let body = self.get_json(url)?;
        if !body.is_array() {
            return Err(SiteError::UnexpectedResponse {
                endpoint: format!("/users/{account}/repos"),
                expected: "a JSON array of repositories",
            });
        }
        Ok(body)
    }

    /// Get the language breakdown of one repository, as the raw JSON object
    pub fn languages(&self, account: &str, repo: &str) -> Result<Value> {
        let url = self.endpoint(&["repos", account, repo, "languages"]);

        let body = self.get_json(url)?;
        if !body.is_object() {
            return Err(SiteError::UnexpectedResponse {
                endpoint: format!("/repos/{account}/{repo}/languages"),
                expected: "a JSON object of language byte counts",
            });
        }
        Ok(body)
    }
}

/// Turn non-success statuses into errors, naming rate limiting when GitHub reports it
fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let remaining = header_u64(&response, "x-ratelimit-remaining");
    let reset = header_u64(&response, "x-ratelimit-reset");
    let text = response.text().unwrap_or_default();
    let message = api_message(&text);

    if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS) && remaining == Some(0)
    {
        let reset_at = reset
            .and_then(|r| chrono::DateTime::from_timestamp(r as i64, 0))
            .map(|dt| dt.format("%H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return Err(SiteError::api(
            status.as_u16(),
            format!("rate limit exceeded, resets at {reset_at}. Configure api.token to raise the limit"),
        ));
    }

    Err(SiteError::api(status.as_u16(), message))
}

fn header_u64(response: &Response, name: &str) -> Option<u64> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// GitHub error bodies look like `{"message": "..."}`; fall back to the raw text
fn api_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
