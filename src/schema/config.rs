/// Bot configuration — RON file settings plus credentials from the environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::composer::ComposerSettings;
use crate::core::hashtag::{DEFAULT_TAG_CHANCE, DEFAULT_TAG_TOKENS};
use crate::core::sampler::{DEFAULT_MAX_ATTEMPTS, DEFAULT_START_OFFSET};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

/// Everything the bot needs besides credentials. Missing fields take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub corpus_path: PathBuf,
    /// Directory holding WordNet `index.noun`, `index.verb` and `index.adj`.
    pub wordnet_dir: PathBuf,
    /// (min, max) token window of the main phrase.
    pub phrase_tokens: (usize, usize),
    /// (min, max) token window of each standalone hashtag.
    pub hashtag_tokens: (usize, usize),
    /// Probability that an eligible content word becomes a hashtag.
    pub hashtag_chance: f64,
    pub max_standalone_hashtags: usize,
    pub max_tweet_length: usize,
    pub start_offset: usize,
    pub max_sample_attempts: u32,
    pub max_compose_attempts: u32,
    pub api_base_url: String,
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        let composer = ComposerSettings::default();
        Self {
            corpus_path: PathBuf::from("words.txt"),
            wordnet_dir: PathBuf::from("wordnet"),
            phrase_tokens: composer.phrase_tokens,
            hashtag_tokens: DEFAULT_TAG_TOKENS,
            hashtag_chance: DEFAULT_TAG_CHANCE,
            max_standalone_hashtags: composer.max_standalone_hashtags,
            max_tweet_length: composer.max_length,
            start_offset: DEFAULT_START_OFFSET,
            max_sample_attempts: DEFAULT_MAX_ATTEMPTS,
            max_compose_attempts: composer.max_attempts,
            api_base_url: "https://api.twitter.com".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl BotConfig {
    /// Load from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: BotConfig = ron::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_window("phrase_tokens", self.phrase_tokens)?;
        check_window("hashtag_tokens", self.hashtag_tokens)?;
        if !(0.0..=1.0).contains(&self.hashtag_chance) {
            return Err(ConfigError::Invalid(format!(
                "hashtag_chance must be within 0.0..=1.0, got {}",
                self.hashtag_chance
            )));
        }
        if self.max_tweet_length == 0 {
            return Err(ConfigError::Invalid("max_tweet_length must be positive".into()));
        }
        if self.max_sample_attempts == 0 || self.max_compose_attempts == 0 {
            return Err(ConfigError::Invalid("attempt bounds must be positive".into()));
        }
        Ok(())
    }

    pub fn composer_settings(&self) -> ComposerSettings {
        ComposerSettings {
            phrase_tokens: self.phrase_tokens,
            max_standalone_hashtags: self.max_standalone_hashtags,
            max_length: self.max_tweet_length,
            max_attempts: self.max_compose_attempts,
        }
    }
}

fn check_window(name: &str, (min, max): (usize, usize)) -> Result<(), ConfigError> {
    if min == 0 || min > max {
        return Err(ConfigError::Invalid(format!(
            "{name} must satisfy 0 < min <= max, got ({min}, {max})"
        )));
    }
    Ok(())
}

pub const CONSUMER_KEY_VAR: &str = "BOT_CONSUMER_KEY";
pub const CONSUMER_SECRET_VAR: &str = "BOT_CONSUMER_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "BOT_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "BOT_ACCESS_TOKEN_SECRET";

/// OAuth 1.0a user-context credentials for the posting API.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve each variable through `lookup`; empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let get = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };
        Ok(Self {
            consumer_key: get(CONSUMER_KEY_VAR)?,
            consumer_secret: get(CONSUMER_SECRET_VAR)?,
            access_token: get(ACCESS_TOKEN_VAR)?,
            access_token_secret: get(ACCESS_TOKEN_SECRET_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = BotConfig::default();
        assert_eq!(config.phrase_tokens, (8, 12));
        assert_eq!(config.hashtag_tokens, (3, 5));
        assert_eq!(config.hashtag_chance, 0.25);
        assert_eq!(config.max_standalone_hashtags, 2);
        assert_eq!(config.max_tweet_length, 137);
        assert_eq!(config.start_offset, 5);
        config.validate().unwrap();
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = BotConfig::load_from_ron(Path::new("config/bot.ron")).unwrap();
        assert_eq!(config, BotConfig::default());
    }

    #[test]
    fn partial_ron_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "(corpus_path: \"corpus/shakespeare.txt\", phrase_tokens: (6, 10), log_level: \"debug\")"
        )
        .unwrap();

        let config = BotConfig::load_from_ron(file.path()).unwrap();
        assert_eq!(config.corpus_path, PathBuf::from("corpus/shakespeare.txt"));
        assert_eq!(config.phrase_tokens, (6, 10));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_tweet_length, 137);
    }

    #[test]
    fn malformed_ron_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(phrase_tokens: oops)").unwrap();
        assert!(matches!(
            BotConfig::load_from_ron(file.path()),
            Err(ConfigError::Ron(_))
        ));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let inverted = BotConfig {
            phrase_tokens: (12, 8),
            ..BotConfig::default()
        };
        assert!(matches!(inverted.validate(), Err(ConfigError::Invalid(_))));

        let chance = BotConfig {
            hashtag_chance: 1.5,
            ..BotConfig::default()
        };
        assert!(chance.validate().is_err());

        let attempts = BotConfig {
            max_compose_attempts: 0,
            ..BotConfig::default()
        };
        assert!(attempts.validate().is_err());
    }

    #[test]
    fn credentials_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (CONSUMER_KEY_VAR, "ck"),
            (CONSUMER_SECRET_VAR, "cs"),
            (ACCESS_TOKEN_VAR, "at"),
            (ACCESS_TOKEN_SECRET_VAR, "ats"),
        ]
        .into_iter()
        .collect();

        let creds = Credentials::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(creds.consumer_key, "ck");
        assert_eq!(creds.access_token_secret, "ats");
        assert!(!format!("{creds:?}").contains("ats"));
    }

    #[test]
    fn credentials_missing_variable() {
        let err = Credentials::from_lookup(|name| {
            (name != ACCESS_TOKEN_VAR).then(|| "x".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv(ACCESS_TOKEN_VAR)));
    }
}
