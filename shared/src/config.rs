//! Persisted bot configuration
//!
//! The `config` subcommand writes a [`BotConfig`] to disk; `follow` and
//! `unfollow` read it back and layer [`RunOverrides`] from the command line
//! on top of it.

use crate::errors::{SharedError, SharedResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "./data/.instabot_config";
pub const DEFAULT_TAGS_FILE: &str = "./data/tags";
pub const DEFAULT_COMMENTS_FILE: &str = "./data/comments";
pub const DEFAULT_DATABASE: &str = "./data/.instabot_db";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_COMMENT_PROBABILITY: f64 = 0.1;
pub const DEFAULT_COOLDOWN_DAYS: i64 = 15;
pub const DEFAULT_SETTLE_SECS: f64 = 3.0;

/// Credentials and default tunables for every run
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    pub username: String,
    pub password: String,
    #[serde(default = "default_tags_file")]
    pub tags_file: PathBuf,
    #[serde(default = "default_comments_file")]
    pub comments_file: PathBuf,
    #[serde(default = "default_comment_probability")]
    pub comment_probability: f64,
    /// Whole days between a follow and the matching unfollow, and between
    /// an unfollow and a re-follow
    #[serde(default = "default_cooldown_days")]
    pub cooldown_days: i64,
    /// Pause after each state-changing UI action
    #[serde(default = "default_settle_secs")]
    pub settle_secs: f64,
    #[serde(default = "default_database")]
    pub database: PathBuf,
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tags_file", &self.tags_file)
            .field("comments_file", &self.comments_file)
            .field("comment_probability", &self.comment_probability)
            .field("cooldown_days", &self.cooldown_days)
            .field("settle_secs", &self.settle_secs)
            .field("database", &self.database)
            .field("webdriver_url", &self.webdriver_url)
            .finish()
    }
}

fn default_tags_file() -> PathBuf {
    PathBuf::from(DEFAULT_TAGS_FILE)
}

fn default_comments_file() -> PathBuf {
    PathBuf::from(DEFAULT_COMMENTS_FILE)
}

fn default_comment_probability() -> f64 {
    DEFAULT_COMMENT_PROBABILITY
}

fn default_cooldown_days() -> i64 {
    DEFAULT_COOLDOWN_DAYS
}

fn default_settle_secs() -> f64 {
    DEFAULT_SETTLE_SECS
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

fn default_webdriver_url() -> String {
    DEFAULT_WEBDRIVER_URL.to_string()
}

/// Per-run values that take precedence over the persisted config
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    pub comment_probability: Option<f64>,
    pub cooldown_days: Option<i64>,
    pub settle_secs: Option<f64>,
}

impl BotConfig {
    /// Create a config with the given credentials and default tunables
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            tags_file: default_tags_file(),
            comments_file: default_comments_file(),
            comment_probability: DEFAULT_COMMENT_PROBABILITY,
            cooldown_days: DEFAULT_COOLDOWN_DAYS,
            settle_secs: DEFAULT_SETTLE_SECS,
            database: default_database(),
            webdriver_url: default_webdriver_url(),
        }
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> SharedResult<()> {
        if self.username.trim().is_empty() {
            return Err(SharedError::invalid("username", "<empty>"));
        }
        if !(0.0..=1.0).contains(&self.comment_probability) {
            return Err(SharedError::invalid("comment_probability", self.comment_probability));
        }
        if !self.settle_secs.is_finite() || self.settle_secs < 0.0 {
            return Err(SharedError::invalid("settle_secs", self.settle_secs));
        }
        Ok(())
    }

    /// Read and validate a config file
    pub fn load(path: &Path) -> SharedResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| SharedError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: BotConfig = serde_json::from_str(&content).map_err(|e| SharedError::ConfigFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate and write the config, creating parent directories
    pub fn save(&self, path: &Path) -> SharedResult<()> {
        self.validate()?;
        let io_err = |source| SharedError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(self).map_err(|e| SharedError::ConfigFormat {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        fs::write(path, content).map_err(io_err)
    }

    /// Apply command-line overrides and re-validate
    pub fn with_overrides(mut self, overrides: &RunOverrides) -> SharedResult<Self> {
        if let Some(probability) = overrides.comment_probability {
            self.comment_probability = probability;
        }
        if let Some(days) = overrides.cooldown_days {
            self.cooldown_days = days;
        }
        if let Some(secs) = overrides.settle_secs {
            self.settle_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    /// Hashtags to crawl, without any leading `#`
    pub fn load_tags(&self) -> SharedResult<Vec<String>> {
        Ok(load_word_list(&self.tags_file)?
            .into_iter()
            .map(|tag| tag.trim_start_matches('#').to_string())
            .filter(|tag| !tag.is_empty())
            .collect())
    }

    /// Comment phrases to post on liked content
    pub fn load_comments(&self) -> SharedResult<Vec<String>> {
        load_word_list(&self.comments_file)
    }
}

/// Read a one-entry-per-line file.
///
/// Blank lines and lines starting with `#` followed by a space are skipped.
/// A missing file is an empty list.
pub fn load_word_list(path: &Path) -> SharedResult<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(SharedError::ConfigIo {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("# "))
        .map(str::to_string)
        .collect())
}
