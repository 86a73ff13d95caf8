//! Constants used throughout the application.
//!
//! This module contains all constants used in mindtalk, organized into
//! logical groups. Having constants centralized makes them easier to find,
//! modify, and reference consistently.

// Application Metadata
/// The name of the application.
pub const APP_NAME: &str = "mindtalk";
/// The description of the application used in CLI help text.
pub const APP_DESCRIPTION: &str = "A journaling companion that turns short mood chats into diary entries";

// CLI Arguments & Defaults
/// Log format identifier for plain text.
pub const LOG_FORMAT_TEXT: &str = "text";
/// Log format identifier for JSON.
pub const LOG_FORMAT_JSON: &str = "json";
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Configuration Keys & Environment Variables
/// Environment variable for the diary database path.
pub const ENV_VAR_MINDTALK_DB: &str = "MINDTALK_DB";
/// Environment variable for the Ollama base URL.
pub const ENV_VAR_MINDTALK_OLLAMA_URL: &str = "MINDTALK_OLLAMA_URL";
/// Environment variable for the chat model name.
pub const ENV_VAR_MINDTALK_CHAT_MODEL: &str = "MINDTALK_CHAT_MODEL";
/// Environment variable for the per-call generator timeout in seconds.
pub const ENV_VAR_MINDTALK_TIMEOUT: &str = "MINDTALK_GENERATION_TIMEOUT_SECS";
/// Default database location.
pub const DEFAULT_DB_PATH: &str = "~/.local/share/mindtalk/mindtalk_diary.db";
/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
/// Default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "llama3.2:3b";
/// Default generator timeout in seconds.
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 120;
/// Placeholder string for redacted information in debug output.
pub const REDACTED_PLACEHOLDER: &str = "[REDACTED]";

// Storage
/// Days a trashed entry is kept before automatic purge.
pub const TRASH_RETENTION_DAYS: i64 = 30;
/// Date format for stored calendar dates.
pub const DATE_FORMAT_ISO: &str = "%Y-%m-%d";
/// Time format for stored times of day.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Timestamp format for stored deletion times.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Milliseconds SQLite waits on a locked database before failing.
pub const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

// Settings
/// Default assistant display name.
pub const DEFAULT_AI_NAME: &str = "루나";
/// Default visual theme.
pub const DEFAULT_THEME: &str = "라벤더";

// Conversation
/// Transcript messages forwarded with each chat turn.
pub const RECENT_TRANSCRIPT_WINDOW: usize = 5;
/// Prior-session summaries forwarded as context.
pub const CONTEXT_SUMMARY_LIMIT: usize = 2;
/// Keywords an entry may carry.
pub const MAX_ENTRY_KEYWORDS: usize = 4;
/// User-authored keywords an entry may carry.
pub const MAX_CUSTOM_KEYWORDS: usize = 1;
/// Characters of user text fed to summarization prompts.
pub const SUMMARY_INPUT_CHAR_LIMIT: usize = 1500;
/// Sentences kept from a chat reply.
pub const MAX_REPLY_SENTENCES: usize = 3;

// Generation parameters
/// Token budget for a chat reply.
pub const CHAT_MAX_TOKENS: u32 = 150;
/// Sampling temperature for a chat reply.
pub const CHAT_TEMPERATURE: f32 = 0.7;
/// Token budget for the structured summary.
pub const SUMMARY_MAX_TOKENS: u32 = 300;
/// Sampling temperature for the structured summary.
pub const SUMMARY_TEMPERATURE: f32 = 0.3;
/// Token budget for keyword suggestions.
pub const KEYWORDS_MAX_TOKENS: u32 = 200;
/// Sampling temperature for keyword suggestions.
pub const KEYWORDS_TEMPERATURE: f32 = 0.7;

// Summary extraction
/// Label introducing the summary line.
pub const LABEL_SUMMARY: &str = "요약:";
/// Label introducing the keyword line.
pub const LABEL_KEYWORDS: &str = "감정키워드:";
/// Label introducing the advice list.
pub const LABEL_ACTION_ITEMS: &str = "액션아이템:";
/// Keywords kept from a summary block.
pub const MAX_EXTRACTED_KEYWORDS: usize = 5;
/// Advice lines kept from a summary block.
pub const MAX_ACTION_ITEMS: usize = 3;
/// Summary used when none could be extracted.
pub const DEFAULT_SUMMARY: &str = "오늘의 감정을 나누었어요";
/// Keyword used when none could be extracted.
pub const DEFAULT_KEYWORD: &str = "#감정나눔";
/// Advice used when none could be extracted.
pub const DEFAULT_ACTION_ITEM: &str = "오늘도 고생 많았어요";
/// Number of emotion keywords suggested for confirmation.
pub const SUGGESTED_KEYWORD_COUNT: usize = 5;
/// Filler keywords used to pad suggestions.
pub const FILLER_KEYWORDS: [&str; 5] = ["#감정나눔", "#일상", "#생각", "#마음", "#기분"];

// Statistics
/// Keywords listed in the popularity ranking.
pub const POPULAR_KEYWORD_LIMIT: usize = 10;
