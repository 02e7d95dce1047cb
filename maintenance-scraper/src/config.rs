use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::Deserialize;
use anyhow::{Context, Result};
use shared::protocol::{DEFAULT_API_KEY_ENV, DEFAULT_COMPLETION_BASE_URL, DEFAULT_COMPLETION_MODEL};
use crate::completion::RetryPolicy;
use crate::error::PipelineError;

/// Help center article listing current server and update status
pub const DEFAULT_PAGE_URL: &str =
    "https://help.bungie.net/hc/en-us/articles/360049199271-Destiny-Server-and-Update-Status";

const DEFAULT_PROMPT_TEMPLATE: &str = include_str!("../prompts/maintenance.txt");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// RSS feed, filtered down to matching items
    Rss,
    /// HTML page, reduced to the article body
    Html,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_source_kind")]
    pub kind: SourceKind,
    /// Required for RSS; HTML falls back to the status article
    pub url: Option<String>,
    /// Overall client timeout; defaults depend on `kind`
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
    #[serde(default = "default_replacements")]
    pub replacements: Vec<Replacement>,
    #[serde(default = "default_article_selector")]
    pub article_selector: String,
}

/// Literal rewrite applied to feed text before keyword matching
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_attempt_timeout")]
    pub attempt_timeout_secs: u64,
    #[serde(default = "default_backoff")]
    pub backoff_secs: u64,
    /// Replaces the built-in instruction template
    pub prompt_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
}

fn default_source_kind() -> SourceKind {
    SourceKind::Html
}

fn default_keywords() -> Vec<String> {
    vec!["destiny 2".to_string(), "destiny2".to_string()]
}

fn default_replacements() -> Vec<Replacement> {
    vec![Replacement {
        from: "bung.ie/destiny2help".to_string(),
        to: "HELP_LINK".to_string(),
    }]
}

fn default_article_selector() -> String {
    "[itemprop='articleBody']".to_string()
}

fn default_base_url() -> String {
    DEFAULT_COMPLETION_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_COMPLETION_MODEL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_temperature() -> f32 {
    0.6
}

fn default_max_tokens() -> u32 {
    8000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_attempt_timeout() -> u64 {
    10
}

fn default_backoff() -> u64 {
    2
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: default_source_kind(),
            url: None,
            timeout_secs: None,
            keywords: default_keywords(),
            replacements: default_replacements(),
            article_selector: default_article_selector(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_attempts: default_max_attempts(),
            attempt_timeout_secs: default_attempt_timeout(),
            backoff_secs: default_backoff(),
            prompt_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

impl SourceConfig {
    pub fn resolved_url(&self) -> Result<String, PipelineError> {
        match (&self.url, self.kind) {
            (Some(url), _) => Ok(url.clone()),
            (None, SourceKind::Html) => Ok(DEFAULT_PAGE_URL.to_string()),
            (None, SourceKind::Rss) => Err(PipelineError::Configuration(
                "source.url is required for rss sources".to_string(),
            )),
        }
    }

    pub fn timeout(&self) -> Duration {
        let secs = self.timeout_secs.unwrap_or(match self.kind {
            SourceKind::Rss => 10,
            SourceKind::Html => 60,
        });
        Duration::from_secs(secs)
    }
}

impl CompletionConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            attempt_timeout: Duration::from_secs(self.attempt_timeout_secs),
            backoff: Duration::from_secs(self.backoff_secs),
        }
    }

    /// Read the API key from the configured environment variable.
    /// A missing or empty variable is fatal.
    pub fn resolve_api_key(&self) -> Result<ApiKey, PipelineError> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(ApiKey::new(key)),
            _ => Err(PipelineError::Configuration(format!(
                "failed to get {} env",
                self.api_key_env
            ))),
        }
    }

    pub fn prompt_template(&self) -> Result<String, PipelineError> {
        match &self.prompt_path {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                PipelineError::Configuration(format!(
                    "failed to read prompt template {}: {}",
                    path.display(),
                    e
                ))
            }),
            None => Ok(DEFAULT_PROMPT_TEMPLATE.to_string()),
        }
    }
}

/// Completion API credential. Never printed.
#[derive(Clone)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}
