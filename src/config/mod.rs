//! Configuration management for the mindtalk application.
//!
//! This module handles loading and validating configuration settings from
//! environment variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `MINDTALK_DB`: Path to the diary database (defaults to ~/.local/share/mindtalk/mindtalk_diary.db)
//! - `MINDTALK_OLLAMA_URL`: Ollama API base URL (defaults to http://127.0.0.1:11434)
//! - `MINDTALK_CHAT_MODEL`: Model used for chat and summaries (defaults to llama3.2:3b)
//! - `MINDTALK_GENERATION_TIMEOUT_SECS`: Per-request generator timeout (defaults to 120)

use crate::constants::{
    DEFAULT_CHAT_MODEL, DEFAULT_DB_PATH, DEFAULT_GENERATION_TIMEOUT_SECS, DEFAULT_OLLAMA_URL,
    ENV_VAR_MINDTALK_CHAT_MODEL, ENV_VAR_MINDTALK_DB, ENV_VAR_MINDTALK_OLLAMA_URL,
    ENV_VAR_MINDTALK_TIMEOUT, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the mindtalk application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use mindtalk::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     db_path: PathBuf::from("/path/to/diary.db"),
///     ollama_url: "http://127.0.0.1:11434".to_string(),
///     chat_model: "llama3.2:3b".to_string(),
///     generation_timeout_secs: 60,
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone)]
pub struct Config {
    /// SQLite database file holding entries, trash, settings and usage.
    pub db_path: PathBuf,

    /// Base URL of the Ollama API.
    pub ollama_url: String,

    /// Model name passed to Ollama.
    pub chat_model: String,

    /// Upper bound on a single generator request.
    pub generation_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("db_path", &REDACTED_PLACEHOLDER)
            .field("ollama_url", &self.ollama_url)
            .field("chat_model", &self.chat_model)
            .field("generation_timeout_secs", &self.generation_timeout_secs)
            .finish()
    }
}

impl Default for Config {
    /// Default values before path expansion.
    fn default() -> Self {
        Config {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The database path is expanded with `shellexpand`, so `~` and `$VAR`
    /// references work. The result is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path cannot be expanded
    /// - The timeout is not a positive integer
    /// - Validation fails (see `validate`)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use mindtalk::Config;
    ///
    /// match Config::load() {
    ///     Ok(config) => println!("Using model {}", config.chat_model),
    ///     Err(err) => eprintln!("Failed to load config: {}", err),
    /// }
    /// ```
    pub fn load() -> AppResult<Self> {
        let db_raw = env_or(ENV_VAR_MINDTALK_DB, DEFAULT_DB_PATH);
        let expanded = shellexpand::full(&db_raw)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let timeout_raw = env_or(
            ENV_VAR_MINDTALK_TIMEOUT,
            &DEFAULT_GENERATION_TIMEOUT_SECS.to_string(),
        );
        let generation_timeout_secs = timeout_raw.trim().parse::<u64>().map_err(|_| {
            AppError::Config(format!(
                "{} must be a whole number of seconds, got '{}'",
                ENV_VAR_MINDTALK_TIMEOUT, timeout_raw
            ))
        })?;

        let config = Config {
            db_path: PathBuf::from(expanded.into_owned()),
            ollama_url: env_or(ENV_VAR_MINDTALK_OLLAMA_URL, DEFAULT_OLLAMA_URL)
                .trim()
                .to_string(),
            chat_model: env_or(ENV_VAR_MINDTALK_CHAT_MODEL, DEFAULT_CHAT_MODEL)
                .trim()
                .to_string(),
            generation_timeout_secs,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The database path is empty or relative
    /// - The Ollama URL is empty or not http(s)
    /// - The model name is empty
    /// - The timeout is zero
    pub fn validate(&self) -> AppResult<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("Database path is empty".to_string()));
        }

        if !self.db_path.is_absolute() {
            return Err(AppError::Config(
                "Database path must be an absolute path".to_string(),
            ));
        }

        if self.ollama_url.is_empty() {
            return Err(AppError::Config("Ollama URL is empty".to_string()));
        }

        if !(self.ollama_url.starts_with("http://") || self.ollama_url.starts_with("https://")) {
            return Err(AppError::Config(
                "Ollama URL must start with http:// or https://".to_string(),
            ));
        }

        if self.chat_model.is_empty() {
            return Err(AppError::Config("Chat model name is empty".to_string()));
        }

        if self.generation_timeout_secs == 0 {
            return Err(AppError::Config(
                "Generation timeout must be at least one second".to_string(),
            ));
        }

        Ok(())
    }
}
