//! Error handling utilities for the mindtalk application.
//!
//! This module provides the central error type `AppError`, which represents all
//! possible error conditions in the application, and the convenience alias
//! `AppResult`. Concern-specific enums (`ValidationError`, `AIError`,
//! `DatabaseError`) carry the detail; `AppError::kind` collapses them into the
//! coarse categories a front end needs to decide how to react.

use std::path::PathBuf;
use thiserror::Error;

/// Input the user can fix, or an operation attempted in the wrong session state.
///
/// None of these change any state: the caller shows the message and lets the
/// user try again.
///
/// # Examples
///
/// ```
/// use mindtalk::errors::ValidationError;
///
/// let error = ValidationError::TooManyKeywords { max: 4, given: 5 };
/// assert!(format!("{}", error).contains("4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A chat message was empty or whitespace only.
    #[error("Please type a message before sending.")]
    EmptyMessage,

    /// Save was requested before anything was said.
    #[error("There is nothing to save yet. Say something first!")]
    EmptyTranscript,

    /// No keyword was selected on confirmation.
    #[error("Pick at least one emotion keyword before saving.")]
    NoKeywordsSelected,

    /// More keywords than an entry may hold.
    #[error("Too many emotion keywords: at most {max} can be saved, {given} were selected.")]
    TooManyKeywords {
        /// Maximum allowed
        max: usize,
        /// Number selected
        given: usize,
    },

    /// More than the allowed number of user-authored keywords.
    #[error("Only {max} keyword of your own can be added, {given} were given.")]
    TooManyCustomKeywords {
        /// Maximum allowed
        max: usize,
        /// Number of custom keywords given
        given: usize,
    },

    /// The requested transition is not legal from the current state.
    #[error("Cannot {action} while in {state}.")]
    InvalidTransition {
        /// What was attempted
        action: &'static str,
        /// The state the session was in
        state: String,
    },

    /// A mood label that does not name a mood.
    #[error("Unknown mood '{0}'. Choose good, neutral or bad.")]
    UnknownMood(String),

    /// A setting key that does not exist.
    #[error("Unknown setting '{0}'.")]
    UnknownSetting(String),

    /// An irreversible command was run without its confirmation flag.
    #[error("This cannot be undone. Run `{0}` to confirm.")]
    ConfirmationRequired(&'static str),
}

/// Failures of the external text generator.
///
/// These are always recoverable: the session keeps its previous state and the
/// user may retry.
///
/// # Examples
///
/// ```
/// use mindtalk::errors::AIError;
///
/// let error = AIError::ModelNotFound("llama3.2:3b".to_string());
/// assert!(format!("{}", error).contains("llama3.2:3b"));
/// ```
#[derive(Debug, Error)]
pub enum AIError {
    /// Ollama API is not reachable.
    #[error("Ollama API error: {0}. Is Ollama running? Try: ollama serve")]
    OllamaOffline(#[source] reqwest::Error),

    /// The generator did not answer within the configured time.
    #[error("The assistant took too long to answer (over {0} seconds). Please try again.")]
    Timeout(u64),

    /// Requested model not found in Ollama.
    #[error("Model not found: {0}. Try: ollama pull {0}")]
    ModelNotFound(String),

    /// Invalid or unexpected response from the generator.
    #[error("Invalid response from the assistant: {0}")]
    InvalidResponse(String),
}

/// Represents specific error cases that can occur during database operations.
///
/// # Examples
///
/// ```
/// use mindtalk::errors::DatabaseError;
///
/// let error = DatabaseError::NotFound("Entry with id 123 not found".to_string());
/// assert!(format!("{}", error).contains("not found"));
/// ```
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLite database error.
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("Failed to get connection from pool: {0}")]
    Pool(#[from] r2d2::Error),

    /// Requested entry not found in database.
    #[error("Entry not found: {0}")]
    NotFound(String),

    /// A stored row could not be decoded.
    #[error("Corrupt record in {table}: {message}")]
    Corrupt {
        /// Table the row came from
        table: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Another process holds the writer lock.
    #[error("The diary database {path} is in use by another mindtalk process. Close it and try again.")]
    Busy {
        /// Path of the lock file
        path: PathBuf,
    },
}

/// Coarse error categories used by front ends to pick a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// User-fixable input; nothing changed.
    Validation,
    /// The referenced entry does not exist.
    NotFound,
    /// The generator failed; retry is possible.
    Generation,
    /// The durable medium failed; the mutation did not happen.
    Storage,
    /// Configuration is missing or invalid.
    Config,
    /// Terminal or filesystem I/O failed.
    Io,
}

/// Represents all possible errors that can occur in the mindtalk application.
///
/// This type does not implement `Clone` to avoid losing error context when
/// cloning `std::io::Error` values.
///
/// # Examples
///
/// ```
/// use mindtalk::errors::{AppError, ErrorKind, ValidationError};
///
/// let error: AppError = ValidationError::EmptyMessage.into();
/// assert_eq!(error.kind(), ErrorKind::Validation);
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Errors related to configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/output errors from terminal or filesystem operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// User input that must be corrected.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Errors related to database operations.
    #[error("Storage error: {0}")]
    Database(#[from] DatabaseError),

    /// Errors from the text generator.
    #[error("AI error: {0}")]
    AI(#[from] AIError),
}

impl AppError {
    /// Returns the category this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Config(_) => ErrorKind::Config,
            AppError::Io(_) => ErrorKind::Io,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Database(DatabaseError::NotFound(_)) => ErrorKind::NotFound,
            AppError::Database(_) => ErrorKind::Storage,
            AppError::AI(_) => ErrorKind::Generation,
        }
    }

    /// True when the same call may succeed if simply retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Generation | ErrorKind::Storage)
    }
}

/// A type alias for `Result<T, AppError>` to simplify function signatures.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_app_error_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let app_error: AppError = io_error.into();

        match app_error {
            AppError::Io(ref inner) => {
                assert_eq!(inner.kind(), io::ErrorKind::NotFound);
            }
            _ => panic!("Expected AppError::Io variant"),
        }
        assert_eq!(app_error.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_validation_error_displays_bare_message() {
        let error: AppError = ValidationError::EmptyTranscript.into();
        assert_eq!(
            format!("{}", error),
            "There is nothing to save yet. Say something first!"
        );
    }

    #[test]
    fn test_error_kinds() {
        let not_found: AppError = DatabaseError::NotFound("entry 7".to_string()).into();
        assert_eq!(not_found.kind(), ErrorKind::NotFound);
        assert!(!not_found.is_retryable());

        let corrupt: AppError = DatabaseError::Corrupt {
            table: "diary_entries",
            message: "bad mood".to_string(),
        }
        .into();
        assert_eq!(corrupt.kind(), ErrorKind::Storage);
        assert!(corrupt.is_retryable());

        let timeout: AppError = AIError::Timeout(30).into();
        assert_eq!(timeout.kind(), ErrorKind::Generation);
        assert!(timeout.is_retryable());

        let config = AppError::Config("missing".to_string());
        assert_eq!(config.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_invalid_transition_message() {
        let error = ValidationError::InvalidTransition {
            action: "save",
            state: "MoodSelection".to_string(),
        };
        assert_eq!(format!("{}", error), "Cannot save while in MoodSelection.");
    }
}
