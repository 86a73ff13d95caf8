//! Core diary types without I/O operations.
//!
//! This module holds the value types shared by the store, the conversation
//! session and the command-line front end: moods, transcript messages, the
//! saved `Entry` and its trashed counterpart, plus the keyword rules that keep
//! an entry's invariants intact.

pub mod stats;
pub mod streak;

use crate::constants::{MAX_CUSTOM_KEYWORDS, MAX_ENTRY_KEYWORDS, TRASH_RETENTION_DAYS};
use crate::errors::ValidationError;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the user said their day went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// A good day.
    Good,
    /// An ordinary day.
    Neutral,
    /// A hard day.
    Bad,
}

impl Mood {
    /// All moods in display order.
    pub const ALL: [Mood; 3] = [Mood::Good, Mood::Neutral, Mood::Bad];

    /// Stable identifier used in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Good => "good",
            Mood::Neutral => "neutral",
            Mood::Bad => "bad",
        }
    }

    /// Label used in prompts and shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Good => "좋음",
            Mood::Neutral => "보통",
            Mood::Bad => "나쁨",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "good" | "좋음" | "1" => Ok(Mood::Good),
            "neutral" | "보통" | "2" => Ok(Mood::Neutral),
            "bad" | "나쁨" | "3" => Ok(Mood::Bad),
            other => Err(ValidationError::UnknownMood(other.to_string())),
        }
    }
}

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person journaling.
    User,
    /// The assistant.
    Assistant,
}

/// One line of a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Speaker
    pub role: Role,
    /// What was said
    pub content: String,
}

impl ChatMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Store-assigned identity of a diary entry.
///
/// The id is handed out by `create_entry` and stays the same while the entry
/// sits in the trash and after it is restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntryId {
    fn from(id: i64) -> Self {
        EntryId(id)
    }
}

/// A diary entry that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mood: Mood,
    pub summary: String,
    /// Keywords the user confirmed.
    pub keywords: Vec<String>,
    /// Keywords the generator proposed.
    pub suggested_keywords: Vec<String>,
    pub action_items: Vec<String>,
    pub transcript: Vec<ChatMessage>,
}

impl NewEntry {
    /// Checks the keyword invariant: at most four keywords, at most one of
    /// which is not among the suggestions.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_keyword_limits(&self.keywords, &self.suggested_keywords)
    }

    /// Attaches the id the store assigned.
    pub fn into_entry(self, id: EntryId) -> Entry {
        Entry {
            id,
            date: self.date,
            time: self.time,
            mood: self.mood,
            summary: self.summary,
            keywords: self.keywords,
            suggested_keywords: self.suggested_keywords,
            action_items: self.action_items,
            transcript: self.transcript,
        }
    }
}

/// A saved diary entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mood: Mood,
    pub summary: String,
    pub keywords: Vec<String>,
    pub suggested_keywords: Vec<String>,
    pub action_items: Vec<String>,
    pub transcript: Vec<ChatMessage>,
}

impl Entry {
    /// Case-insensitive match against the summary and confirmed keywords.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return false;
        }
        self.summary.to_lowercase().contains(&query)
            || self.keywords.join(" ").to_lowercase().contains(&query)
    }
}

/// An entry waiting in the trash.
#[derive(Debug, Clone, PartialEq)]
pub struct TrashEntry {
    /// The entry exactly as it was when deleted.
    pub entry: Entry,
    pub deleted_at: NaiveDateTime,
    /// First day on which the entry is purged automatically.
    pub purge_after: NaiveDate,
}

impl TrashEntry {
    /// Wraps an entry deleted at `deleted_at`, computing its purge date.
    pub fn new(entry: Entry, deleted_at: NaiveDateTime) -> Self {
        Self {
            entry,
            deleted_at,
            purge_after: purge_date_for(deleted_at),
        }
    }

    /// Whether the retention window has run out as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.purge_after <= today
    }

    /// Whole days left before automatic purge, never negative.
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.purge_after - today).num_days().max(0)
    }
}

/// Date on which an entry deleted at `deleted_at` becomes eligible for purge.
pub fn purge_date_for(deleted_at: NaiveDateTime) -> NaiveDate {
    (deleted_at + Duration::days(TRASH_RETENTION_DAYS)).date()
}

/// Normalizes a raw keyword: trims it and prefixes `#` when missing.
///
/// Returns `None` for blank input.
///
/// ```
/// use mindtalk::diary_core::normalize_keyword;
///
/// assert_eq!(normalize_keyword(" 설렘 "), Some("#설렘".to_string()));
/// assert_eq!(normalize_keyword("#기쁨"), Some("#기쁨".to_string()));
/// assert_eq!(normalize_keyword("  "), None);
/// ```
pub fn normalize_keyword(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    match trimmed.trim_start_matches('#').trim() {
        "" => None,
        bare => Some(format!("#{}", bare)),
    }
}

/// Turns the user's selection into the keyword list stored on an entry.
///
/// Keywords are normalized and de-duplicated in order, then checked: at least
/// one, at most four, and at most one that the generator did not suggest.
pub fn select_keywords(
    selected: &[String],
    suggested: &[String],
) -> Result<Vec<String>, ValidationError> {
    let mut keywords: Vec<String> = Vec::with_capacity(selected.len());
    for keyword in selected.iter().filter_map(|k| normalize_keyword(k)) {
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }

    if keywords.is_empty() {
        return Err(ValidationError::NoKeywordsSelected);
    }
    check_keyword_limits(&keywords, suggested)?;
    Ok(keywords)
}

fn check_keyword_limits(keywords: &[String], suggested: &[String]) -> Result<(), ValidationError> {
    if keywords.len() > MAX_ENTRY_KEYWORDS {
        return Err(ValidationError::TooManyKeywords {
            max: MAX_ENTRY_KEYWORDS,
            given: keywords.len(),
        });
    }

    let custom = keywords.iter().filter(|k| !suggested.contains(k)).count();
    if custom > MAX_CUSTOM_KEYWORDS {
        return Err(ValidationError::TooManyCustomKeywords {
            max: MAX_CUSTOM_KEYWORDS,
            given: custom,
        });
    }

    Ok(())
}
