//! The diary store: one handle over every persisted entity.
//!
//! `DiaryStore` wraps a `Database` and exposes the entry lifecycle (create,
//! list, soft delete, restore, purge), settings and the usage counter. Every
//! operation that reads the trash sweeps expired entries first, so callers
//! never see an entry past its purge date.
//!
//! Operations that depend on the clock take `now` or `today` from the caller.

pub mod reaper;

use crate::db::settings::{self, SettingKey, Settings};
use crate::db::{entries, trash, usage, Database};
use crate::diary_core::stats::{emotion_stats, EmotionStats};
use crate::diary_core::streak::calculate_streak;
use crate::diary_core::{Entry, EntryId, NewEntry, TrashEntry};
use crate::errors::{AppResult, ValidationError};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use tracing::{debug, info};

/// Durable store for entries, trash, settings and token usage.
pub struct DiaryStore {
    db: Database,
}

impl DiaryStore {
    /// Opens the store at `path` and makes sure the schema exists.
    pub fn open(path: &Path) -> AppResult<Self> {
        let db = Database::open(path)?;
        db.initialize_schema()?;
        Ok(Self { db })
    }

    /// Wraps an already opened database. The schema must be initialized.
    pub fn from_database(db: Database) -> Self {
        Self { db }
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Stores a new entry and returns its id.
    pub fn create_entry(&self, entry: &NewEntry) -> AppResult<EntryId> {
        let conn = self.db.get_conn()?;
        let id = entries::insert_entry(&conn, entry)?;
        info!("Created diary entry {} ({})", id, entry.mood.as_str());
        Ok(id)
    }

    pub fn get_entry(&self, id: EntryId) -> AppResult<Option<Entry>> {
        let conn = self.db.get_conn()?;
        entries::get_entry(&conn, id)
    }

    /// Active entries ordered by date and time, oldest first.
    pub fn list_entries(&self) -> AppResult<Vec<Entry>> {
        let conn = self.db.get_conn()?;
        entries::list_entries(&conn)
    }

    /// Active entries whose summary or keywords contain `query`.
    pub fn search(&self, query: &str) -> AppResult<Vec<Entry>> {
        let found: Vec<Entry> = self
            .list_entries()?
            .into_iter()
            .filter(|entry| entry.matches(query))
            .collect();
        debug!("Search matched {} entries", found.len());
        Ok(found)
    }

    /// Mood distribution and top keywords, `None` with no entries.
    pub fn emotion_stats(&self) -> AppResult<Option<EmotionStats>> {
        let entries = self.list_entries()?;
        Ok(emotion_stats(&entries))
    }

    /// Summaries of the `limit` most recent entries, oldest first.
    pub fn recent_summaries(&self, limit: usize) -> AppResult<Vec<String>> {
        let conn = self.db.get_conn()?;
        entries::recent_summaries(&conn, limit)
    }

    /// Current streak as of `today`, computed from stored entry dates.
    pub fn current_streak(&self, today: NaiveDate) -> AppResult<u32> {
        let conn = self.db.get_conn()?;
        let dates = entries::list_entry_dates(&conn)?;
        Ok(calculate_streak(dates, today))
    }

    /// Recomputes the streak as of `today` and stores it with `today` as the
    /// last entry date.
    pub fn record_streak(&self, today: NaiveDate) -> AppResult<u32> {
        let streak = self.current_streak(today)?;
        let conn = self.db.get_conn()?;
        settings::save_streak(&conn, streak, today)?;
        info!("Streak is now {} day(s)", streak);
        Ok(streak)
    }

    /// Moves an active entry to the trash.
    pub fn soft_delete(&self, id: EntryId, now: NaiveDateTime) -> AppResult<TrashEntry> {
        let conn = self.db.get_conn()?;
        trash::soft_delete(&conn, id, now)
    }

    /// Restores a trashed entry, unless it has already expired.
    pub fn restore(&self, id: EntryId, today: NaiveDate) -> AppResult<Entry> {
        let conn = self.db.get_conn()?;
        reaper::sweep_expired_trash(&conn, today)?;
        trash::restore(&conn, id)
    }

    /// Irreversibly deletes one trashed entry.
    pub fn purge_permanently(&self, id: EntryId, today: NaiveDate) -> AppResult<()> {
        let conn = self.db.get_conn()?;
        reaper::sweep_expired_trash(&conn, today)?;
        trash::purge_permanently(&conn, id)
    }

    /// Irreversibly deletes everything in the trash.
    pub fn purge_all_trash(&self) -> AppResult<usize> {
        let conn = self.db.get_conn()?;
        trash::purge_all_trash(&conn)
    }

    /// Trash contents as of `today`, most recently deleted first.
    pub fn list_trash(&self, today: NaiveDate) -> AppResult<Vec<TrashEntry>> {
        let conn = self.db.get_conn()?;
        reaper::sweep_expired_trash(&conn, today)?;
        trash::list_trash(&conn)
    }

    /// Runs the retention sweep on its own.
    pub fn sweep_expired_trash(&self, today: NaiveDate) -> AppResult<usize> {
        let conn = self.db.get_conn()?;
        reaper::sweep_expired_trash(&conn, today)
    }

    pub fn settings(&self) -> AppResult<Settings> {
        let conn = self.db.get_conn()?;
        settings::load_settings(&conn)
    }

    /// Sets a user-editable setting.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::UnknownSetting` for keys derived from entries,
    /// and `ValidationError::EmptyMessage` for a blank value.
    pub fn set_setting(&self, key: SettingKey, value: &str) -> AppResult<()> {
        if !key.is_user_editable() {
            return Err(ValidationError::UnknownSetting(key.as_str().to_string()).into());
        }
        let value = value.trim();
        if value.is_empty() {
            return Err(ValidationError::EmptyMessage.into());
        }
        let conn = self.db.get_conn()?;
        settings::save_setting(&conn, key, value)
    }

    pub fn token_usage(&self) -> AppResult<u64> {
        let conn = self.db.get_conn()?;
        usage::load_token_usage(&conn)
    }

    /// Adds to the usage counter and returns the new total.
    pub fn add_token_usage(&self, tokens: u64) -> AppResult<u64> {
        let conn = self.db.get_conn()?;
        usage::add_token_usage(&conn, tokens)
    }

    pub fn reset_token_usage(&self) -> AppResult<()> {
        let conn = self.db.get_conn()?;
        usage::reset_token_usage(&conn)?;
        info!("Token usage reset");
        Ok(())
    }
}
