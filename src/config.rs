use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::constants::DEFAULT_SEMANTIC_API_URL;
use crate::db::CommentVoteFilter;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Database
    pub database_path: PathBuf,

    // Semantic analysis service
    pub semantic_api_url: String,
    pub semantic_api_key: Option<String>,
    pub semantic_lang: String,
    pub semantic_topic_types: String,
    pub enrich_interval: Duration,

    // Scraping
    pub scrape_concurrency: usize,
    pub http_timeout: Duration,

    // Local text analysis
    pub topic_count: usize,
    pub terms_per_topic: usize,

    // Interactions
    pub comment_votes_respect_deleted: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Database
            database_path: PathBuf::from(env_or_default("DATABASE_PATH", "./data/boards.sqlite")),

            // Semantic analysis service
            semantic_api_url: env_or_default("SEMANTIC_API_URL", DEFAULT_SEMANTIC_API_URL),
            semantic_api_key: optional_env("SEMANTIC_API_KEY"),
            semantic_lang: env_or_default("SEMANTIC_LANG", "en"),
            semantic_topic_types: env_or_default("SEMANTIC_TOPIC_TYPES", "ec"),
            enrich_interval: Duration::from_millis(parse_env_u64("ENRICH_INTERVAL_MS", 1000)?),

            // Scraping
            scrape_concurrency: parse_env_usize("SCRAPE_CONCURRENCY", 4)?,
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 30)?),

            // Local text analysis
            topic_count: parse_env_usize("TOPIC_COUNT", 2)?,
            terms_per_topic: parse_env_usize("TERMS_PER_TOPIC", 5)?,

            // Interactions
            comment_votes_respect_deleted: parse_env_bool("COMMENT_VOTES_RESPECT_DELETED", false)?,
        })
    }

    /// Configuration with defaults suitable for tests; no API key, short interval.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            database_path: PathBuf::from(":memory:"),
            semantic_api_url: DEFAULT_SEMANTIC_API_URL.to_string(),
            semantic_api_key: None,
            semantic_lang: "en".to_string(),
            semantic_topic_types: "ec".to_string(),
            enrich_interval: Duration::from_millis(10),
            scrape_concurrency: 2,
            http_timeout: Duration::from_secs(5),
            topic_count: 2,
            terms_per_topic: 5,
            comment_votes_respect_deleted: false,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scrape_concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                name: "SCRAPE_CONCURRENCY".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.enrich_interval.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "ENRICH_INTERVAL_MS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.topic_count == 0 || self.terms_per_topic == 0 {
            return Err(ConfigError::InvalidValue {
                name: "TOPIC_COUNT/TERMS_PER_TOPIC".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.semantic_api_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "SEMANTIC_API_URL".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Deletion policy applied to comment votes.
    #[must_use]
    pub fn comment_vote_filter(&self) -> CommentVoteFilter {
        if self.comment_votes_respect_deleted {
            CommentVoteFilter::ExcludeDeleted
        } else {
            CommentVoteFilter::IncludeAll
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
