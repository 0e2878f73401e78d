//! Runtime settings: `settings.json` in the platform config directory, then
//! `RUNE_BREAK_*` environment variables. CLI flags are applied last by the
//! binary.

use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::domain::Locale;
use crate::infra::{
    cache::{DEFAULT_IMAGE_CAPACITY, DEFAULT_IMAGE_TTL},
    dofusdude::DEFAULT_BASE_URL,
    fanout::{RetryPolicy, DEFAULT_CONCURRENCY, DEFAULT_MAX_ATTEMPTS},
};
use crate::util::persistence::project_dirs;

const SETTINGS_FILE: &str = "settings.json";
pub const ENV_PREFIX: &str = "RUNE_BREAK_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings: {0}")]
    Io(#[from] io::Error),
    #[error("malformed settings file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub locale: Locale,
    pub api_base_url: String,
    pub lookup_concurrency: usize,
    pub retry_attempts: u32,
    pub retry_base_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub image_cache_ttl_secs: u64,
    pub image_cache_capacity: usize,
    /// Snapshot file for the rune image cache. Defaults to the local data dir.
    pub image_cache_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: Locale::Es,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            lookup_concurrency: DEFAULT_CONCURRENCY,
            retry_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay_ms: 1_000,
            request_timeout_secs: 60,
            image_cache_ttl_secs: DEFAULT_IMAGE_TTL.as_secs(),
            image_cache_capacity: DEFAULT_IMAGE_CAPACITY,
            image_cache_path: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn settings_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    /// Settings file (if any) plus process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match Self::settings_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        debug!(path = %path.display(), "loaded settings file");
        Ok(settings)
    }

    /// Overrides fields from `RUNE_BREAK_<FIELD>` variables found by `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let var = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("LOCALE") {
            self.locale = value.parse().map_err(|err: crate::domain::UnknownLocale| {
                ConfigError::invalid(&key, err.to_string())
            })?;
        }
        if let Some((_, value)) = var("API_BASE_URL") {
            self.api_base_url = value;
        }
        if let Some((key, value)) = var("LOOKUP_CONCURRENCY") {
            self.lookup_concurrency = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = var("RETRY_ATTEMPTS") {
            self.retry_attempts = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = var("RETRY_BASE_DELAY_MS") {
            self.retry_base_delay_ms = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = var("REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = var("IMAGE_CACHE_TTL_SECS") {
            self.image_cache_ttl_secs = parse_number(&key, &value)?;
        }
        if let Some((key, value)) = var("IMAGE_CACHE_CAPACITY") {
            self.image_cache_capacity = parse_number(&key, &value)?;
        }
        if let Some((_, value)) = var("IMAGE_CACHE_PATH") {
            self.image_cache_path = Some(PathBuf::from(value));
        }
        if let Some((_, value)) = var("LOG_LEVEL") {
            self.log_level = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.api_base_url)
            .map_err(|err| ConfigError::invalid("api_base_url", err.to_string()))?;
        if self.lookup_concurrency == 0 {
            return Err(ConfigError::invalid("lookup_concurrency", "must be at least 1"));
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::invalid("retry_attempts", "must be at least 1"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid("request_timeout_secs", "must be at least 1"));
        }
        if self.image_cache_capacity == 0 {
            return Err(ConfigError::invalid("image_cache_capacity", "must be at least 1"));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::invalid("log_level", "must not be empty"));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn image_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.image_cache_ttl_secs)
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid(key, format!("`{value}` is not a valid number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.locale, Locale::Es);
        assert_eq!(settings.lookup_concurrency, 5);
        assert_eq!(settings.retry_policy(), RetryPolicy::default());
        assert_eq!(settings.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut settings = Settings {
            locale: Locale::Fr,
            ..Settings::default()
        };
        settings
            .apply_env(env(&[
                ("RUNE_BREAK_LOCALE", "en"),
                ("RUNE_BREAK_LOOKUP_CONCURRENCY", "2"),
                ("RUNE_BREAK_RETRY_BASE_DELAY_MS", " 250 "),
                ("RUNE_BREAK_LOG_LEVEL", "debug"),
                ("UNRELATED", "x"),
            ]))
            .unwrap();
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.lookup_concurrency, 2);
        assert_eq!(settings.retry_policy().base_delay, Duration::from_millis(250));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.retry_attempts, 3);
    }

    #[test]
    fn bad_env_values_are_reported() {
        let mut settings = Settings::default();
        let err = settings
            .apply_env(env(&[("RUNE_BREAK_RETRY_ATTEMPTS", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { ref key, .. } if key == "RUNE_BREAK_RETRY_ATTEMPTS"
        ));

        let err = settings
            .apply_env(env(&[("RUNE_BREAK_LOCALE", "de")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn validation_rejects_zero_limits_and_bad_urls() {
        let zero = Settings {
            lookup_concurrency: 0,
            ..Settings::default()
        };
        assert!(zero.validate().is_err());

        let bad_url = Settings {
            api_base_url: "not a url".into(),
            ..Settings::default()
        };
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn partial_settings_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "locale": "fr", "image_cache_capacity": 64 }"#).unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.locale, Locale::Fr);
        assert_eq!(settings.image_cache_capacity, 64);
        assert_eq!(settings.api_base_url, DEFAULT_BASE_URL);
    }
}
