use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Repository object as returned by `GET /users/{account}/repos`
///
/// Only the fields the site uses; everything else stays in the raw cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// Normalized repository metadata used for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositorySummary {
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub primary_language: Option<String>,
    pub topics: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl From<Repository> for RepositorySummary {
    fn from(repo: Repository) -> Self {
        Self {
            name: repo.name,
            description: repo.description,
            url: repo.html_url,
            primary_language: repo.language,
            topics: repo.topics,
            updated_at: repo.updated_at,
        }
    }
}

/// Language name to byte count, in the order GitHub (or the cache file) listed them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct LanguageMap {
    entries: Vec<(String, u64)>,
}

impl LanguageMap {
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, u64)>,
        S: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Language names in map order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Names joined with ", " for display
    pub fn joined_names(&self) -> String {
        self.names().collect::<Vec<_>>().join(", ")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Map<String, Value>> for LanguageMap {
    type Error = String;

    fn try_from(map: Map<String, Value>) -> std::result::Result<Self, Self::Error> {
        let entries = map
            .into_iter()
            .map(|(name, value)| match value.as_u64() {
                Some(bytes) => Ok((name, bytes)),
                None => Err(format!(
                    "byte count for language '{name}' must be a non-negative integer, got {value}"
                )),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }
}

impl From<LanguageMap> for Map<String, Value> {
    fn from(languages: LanguageMap) -> Self {
        languages
            .entries
            .into_iter()
            .map(|(name, bytes)| (name, Value::from(bytes)))
            .collect()
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC), or a bare date
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
    }

    None
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_repository_from_github_json() {
        let json = r#"{
            "id": 1,
            "name": "reposite",
            "description": null,
            "html_url": "https://github.com/endj/reposite",
            "language": "Rust",
            "topics": ["cli", "github"],
            "updated_at": "2024-06-01T12:30:00Z",
            "stargazers_count": 3
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        let summary = RepositorySummary::from(repo);

        assert_eq!(summary.name, "reposite");
        assert!(summary.description.is_none());
        assert_eq!(summary.url, "https://github.com/endj/reposite");
        assert_eq!(summary.primary_language.as_deref(), Some("Rust"));
        assert_eq!(summary.topics, vec!["cli", "github"]);
        assert_eq!(summary.updated_at.month(), 6);
    }

    #[test]
    fn test_repository_missing_topics_defaults_to_empty() {
        let json = r#"{"name": "a", "description": "d", "html_url": "u",
                       "language": null, "updated_at": "2024-01-01"}"#;
        let repo: Repository = serde_json::from_str(json).unwrap();
        assert!(repo.topics.is_empty());
    }

    #[test]
    fn test_repository_rejects_bad_timestamp() {
        let json = r#"{"name": "a", "description": null, "html_url": "u",
                       "language": null, "updated_at": "yesterday"}"#;
        assert!(serde_json::from_str::<Repository>(json).is_err());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let rfc = parse_timestamp("2024-06-01T10:00:00+02:00").unwrap();
        assert_eq!(rfc.to_rfc3339(), "2024-06-01T08:00:00+00:00");

        let naive = parse_timestamp("2024-06-01T10:00:00").unwrap();
        assert_eq!(naive.to_rfc3339(), "2024-06-01T10:00:00+00:00");

        let date = parse_timestamp("2024-01-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-01-01T00:00:00+00:00");

        assert!(parse_timestamp("not a date").is_none());
    }

    #[test]
    fn test_language_map_preserves_key_order() {
        let map: LanguageMap =
            serde_json::from_str(r#"{"TypeScript": 50, "CSS": 10, "HTML": 900}"#).unwrap();

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["TypeScript", "CSS", "HTML"]);
        assert_eq!(map.joined_names(), "TypeScript, CSS, HTML");
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_language_map_serializes_in_order() {
        let map = LanguageMap::from_pairs([("Zig", 5), ("C", 7)]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Zig":5,"C":7}"#);
    }

    #[test]
    fn test_language_map_rejects_non_integer_counts() {
        let result = serde_json::from_str::<LanguageMap>(r#"{"Go": "lots"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_language_map() {
        let map: LanguageMap = serde_json::from_str("{}").unwrap();
        assert!(map.is_empty());
        assert_eq!(map.joined_names(), "");
    }
}
