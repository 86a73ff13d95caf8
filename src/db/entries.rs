//! Diary entry persistence.
//!
//! This module provides functions for inserting, reading and removing rows of
//! the `diary_entries` table, and the row codec shared with the trash table.

use crate::constants::{DATE_FORMAT_ISO, TIME_FORMAT};
use crate::diary_core::{ChatMessage, Entry, EntryId, Mood, NewEntry};
use crate::errors::{AppResult, DatabaseError};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Columns selected for an entry, in the order `entry_from_row` reads them.
pub(crate) const ENTRY_COLUMNS: &str = "id, date, time, mood, summary, keywords_json, \
     suggested_keywords_json, action_items_json, transcript_json";

/// Entry fields encoded as stored column values.
pub(crate) struct EncodedEntry {
    pub date: String,
    pub time: String,
    pub mood: &'static str,
    pub keywords: String,
    pub suggested_keywords: String,
    pub action_items: String,
    pub transcript: String,
}

impl EncodedEntry {
    pub fn new(
        table: &'static str,
        date: NaiveDate,
        time: NaiveTime,
        mood: Mood,
        keywords: &[String],
        suggested_keywords: &[String],
        action_items: &[String],
        transcript: &[ChatMessage],
    ) -> AppResult<Self> {
        Ok(Self {
            date: date.format(DATE_FORMAT_ISO).to_string(),
            time: time.format(TIME_FORMAT).to_string(),
            mood: mood.as_str(),
            keywords: to_json(table, keywords)?,
            suggested_keywords: to_json(table, suggested_keywords)?,
            action_items: to_json(table, action_items)?,
            transcript: to_json(table, transcript)?,
        })
    }

    pub fn from_entry(table: &'static str, entry: &Entry) -> AppResult<Self> {
        Self::new(
            table,
            entry.date,
            entry.time,
            entry.mood,
            &entry.keywords,
            &entry.suggested_keywords,
            &entry.action_items,
            &entry.transcript,
        )
    }
}

fn to_json<T: Serialize + ?Sized>(table: &'static str, value: &T) -> AppResult<String> {
    serde_json::to_string(value).map_err(|e| {
        DatabaseError::Corrupt {
            table,
            message: format!("failed to encode column: {}", e),
        }
        .into()
    })
}

pub(crate) fn conversion_error<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, e))
}

/// Decodes columns 0..=8 (see `ENTRY_COLUMNS`) into an `Entry`.
pub(crate) fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let date: String = row.get(1)?;
    let time: String = row.get(2)?;
    let mood: String = row.get(3)?;

    Ok(Entry {
        id: EntryId(row.get(0)?),
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT_ISO)
            .map_err(|e| conversion_error(1, e))?,
        time: NaiveTime::parse_from_str(&time, TIME_FORMAT).map_err(|e| conversion_error(2, e))?,
        mood: mood.parse::<Mood>().map_err(|e| conversion_error(3, e))?,
        summary: row.get(4)?,
        keywords: json_column(row, 5)?,
        suggested_keywords: json_column(row, 6)?,
        action_items: json_column(row, 7)?,
        transcript: json_column(row, 8)?,
    })
}

/// Inserts a new entry and returns the id the database assigned.
///
/// # Errors
///
/// Returns an error if the entry breaks the keyword invariant or the
/// database operation fails.
pub fn insert_entry(conn: &Connection, entry: &NewEntry) -> AppResult<EntryId> {
    entry.validate()?;
    let encoded = EncodedEntry::new(
        "diary_entries",
        entry.date,
        entry.time,
        entry.mood,
        &entry.keywords,
        &entry.suggested_keywords,
        &entry.action_items,
        &entry.transcript,
    )?;

    conn.execute(
        r#"
        INSERT INTO diary_entries
            (date, time, mood, summary, keywords_json, suggested_keywords_json,
             action_items_json, transcript_json)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
        params![
            encoded.date,
            encoded.time,
            encoded.mood,
            entry.summary,
            encoded.keywords,
            encoded.suggested_keywords,
            encoded.action_items,
            encoded.transcript,
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    let id = EntryId(conn.last_insert_rowid());
    debug!("Inserted diary entry {} for {}", id, entry.date);
    Ok(id)
}

/// Re-inserts an entry under its existing id. Used when restoring from trash.
pub(crate) fn insert_entry_with_id(conn: &Connection, entry: &Entry) -> AppResult<()> {
    let encoded = EncodedEntry::from_entry("diary_entries", entry)?;

    conn.execute(
        r#"
        INSERT INTO diary_entries
            (id, date, time, mood, summary, keywords_json, suggested_keywords_json,
             action_items_json, transcript_json)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
        params![
            entry.id.0,
            encoded.date,
            encoded.time,
            encoded.mood,
            entry.summary,
            encoded.keywords,
            encoded.suggested_keywords,
            encoded.action_items,
            encoded.transcript,
        ],
    )
    .map_err(DatabaseError::Sqlite)?;

    Ok(())
}

/// Retrieves an active entry by id.
///
/// Returns `Ok(None)` if there is no active entry with that id.
pub fn get_entry(conn: &Connection, id: EntryId) -> AppResult<Option<Entry>> {
    let sql = format!("SELECT {} FROM diary_entries WHERE id = ?1", ENTRY_COLUMNS);
    conn.query_row(&sql, params![id.0], entry_from_row)
        .optional()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Lists all active entries ordered by date and time, oldest first.
pub fn list_entries(conn: &Connection) -> AppResult<Vec<Entry>> {
    let sql = format!(
        "SELECT {} FROM diary_entries ORDER BY date ASC, time ASC, id ASC",
        ENTRY_COLUMNS
    );
    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let entries = stmt
        .query_map([], entry_from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Loaded {} diary entries", entries.len());
    Ok(entries)
}

/// Returns the distinct dates that carry at least one active entry.
pub fn list_entry_dates(conn: &Connection) -> AppResult<Vec<NaiveDate>> {
    let mut stmt = conn
        .prepare("SELECT DISTINCT date FROM diary_entries ORDER BY date ASC")
        .map_err(DatabaseError::Sqlite)?;
    let dates = stmt
        .query_map([], |row| {
            let raw: String = row.get(0)?;
            NaiveDate::parse_from_str(&raw, DATE_FORMAT_ISO).map_err(|e| conversion_error(0, e))
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(dates)
}

/// Summaries of the most recent entries, oldest of them first.
pub fn recent_summaries(conn: &Connection, limit: usize) -> AppResult<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "SELECT summary FROM diary_entries ORDER BY date DESC, time DESC, id DESC LIMIT ?1",
        )
        .map_err(DatabaseError::Sqlite)?;
    let mut summaries = stmt
        .query_map(params![limit as i64], |row| row.get::<_, String>(0))
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    summaries.reverse();
    Ok(summaries)
}

/// Deletes an active entry row. Returns the number of rows removed.
pub(crate) fn delete_entry_row(conn: &Connection, id: EntryId) -> AppResult<usize> {
    conn.execute("DELETE FROM diary_entries WHERE id = ?1", params![id.0])
        .map_err(|e| DatabaseError::Sqlite(e).into())
}
