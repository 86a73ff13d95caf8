//! Key/value application settings.

use crate::constants::{DATE_FORMAT_ISO, DEFAULT_AI_NAME, DEFAULT_THEME};
use crate::errors::{AppResult, DatabaseError, ValidationError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Known setting keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    /// Display name of the assistant.
    AiName,
    /// Selected visual theme.
    Theme,
    /// Running streak, recomputed on every save.
    ConsecutiveDays,
    /// Date of the most recent save.
    LastEntryDate,
}

impl SettingKey {
    pub const ALL: [SettingKey; 4] = [
        SettingKey::AiName,
        SettingKey::Theme,
        SettingKey::ConsecutiveDays,
        SettingKey::LastEntryDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::AiName => "ai_name",
            SettingKey::Theme => "selected_theme",
            SettingKey::ConsecutiveDays => "consecutive_days",
            SettingKey::LastEntryDate => "last_entry_date",
        }
    }

    /// Whether the user may set this key directly. The streak keys are
    /// derived from saved entries.
    pub fn is_user_editable(&self) -> bool {
        matches!(self, SettingKey::AiName | SettingKey::Theme)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ai_name" | "name" => Ok(SettingKey::AiName),
            "selected_theme" | "theme" => Ok(SettingKey::Theme),
            "consecutive_days" => Ok(SettingKey::ConsecutiveDays),
            "last_entry_date" => Ok(SettingKey::LastEntryDate),
            other => Err(ValidationError::UnknownSetting(other.to_string())),
        }
    }
}

/// All settings with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ai_name: String,
    pub theme: String,
    pub consecutive_days: u32,
    pub last_entry_date: Option<NaiveDate>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ai_name: DEFAULT_AI_NAME.to_string(),
            theme: DEFAULT_THEME.to_string(),
            consecutive_days: 0,
            last_entry_date: None,
        }
    }
}

/// Reads a raw setting value. `Ok(None)` when the key was never written.
pub fn get_setting(conn: &Connection, key: SettingKey) -> AppResult<Option<String>> {
    conn.query_row(
        "SELECT setting_value FROM app_settings WHERE setting_key = ?1",
        params![key.as_str()],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Writes a setting, replacing any previous value.
pub fn save_setting(conn: &Connection, key: SettingKey, value: &str) -> AppResult<()> {
    conn.execute(
        r#"
        INSERT INTO app_settings (setting_key, setting_value, updated_at)
        VALUES (?1, ?2, CURRENT_TIMESTAMP)
        ON CONFLICT(setting_key) DO UPDATE SET
            setting_value = excluded.setting_value,
            updated_at = excluded.updated_at
        "#,
        params![key.as_str(), value],
    )
    .map_err(DatabaseError::Sqlite)?;

    debug!("Saved setting {}", key);
    Ok(())
}

fn corrupt(key: SettingKey, value: &str) -> DatabaseError {
    DatabaseError::Corrupt {
        table: "app_settings",
        message: format!("invalid value {:?} for {}", value, key),
    }
}

/// Loads every setting, falling back to defaults for missing keys.
///
/// # Errors
///
/// Returns `DatabaseError::Corrupt` if a stored streak or date cannot be parsed.
pub fn load_settings(conn: &Connection) -> AppResult<Settings> {
    let mut settings = Settings::default();

    if let Some(name) = get_setting(conn, SettingKey::AiName)? {
        settings.ai_name = name;
    }
    if let Some(theme) = get_setting(conn, SettingKey::Theme)? {
        settings.theme = theme;
    }
    if let Some(days) = get_setting(conn, SettingKey::ConsecutiveDays)? {
        settings.consecutive_days = days
            .trim()
            .parse()
            .map_err(|_| corrupt(SettingKey::ConsecutiveDays, &days))?;
    }
    if let Some(date) = get_setting(conn, SettingKey::LastEntryDate)? {
        // An empty value means no entry was ever saved
        if !date.trim().is_empty() {
            settings.last_entry_date = Some(
                NaiveDate::parse_from_str(date.trim(), DATE_FORMAT_ISO)
                    .map_err(|_| corrupt(SettingKey::LastEntryDate, &date))?,
            );
        }
    }

    Ok(settings)
}

/// Stores the recomputed streak and the date of the entry that produced it.
pub fn save_streak(conn: &Connection, streak: u32, last_entry_date: NaiveDate) -> AppResult<()> {
    let tx = conn.unchecked_transaction().map_err(DatabaseError::Sqlite)?;
    save_setting(&tx, SettingKey::ConsecutiveDays, &streak.to_string())?;
    save_setting(
        &tx,
        SettingKey::LastEntryDate,
        &last_entry_date.format(DATE_FORMAT_ISO).to_string(),
    )?;
    tx.commit().map_err(DatabaseError::Sqlite)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entries::tests::setup_test_db;
    use crate::errors::AppError;

    #[test]
    fn test_defaults_when_empty() {
        let conn = setup_test_db();
        let settings = load_settings(&conn).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ai_name, "루나");
        assert_eq!(settings.theme, "라벤더");
    }

    #[test]
    fn test_save_and_load_last_writer_wins() {
        let conn = setup_test_db();
        save_setting(&conn, SettingKey::AiName, "별이").unwrap();
        save_setting(&conn, SettingKey::AiName, "해님").unwrap();

        assert_eq!(
            get_setting(&conn, SettingKey::AiName).unwrap().as_deref(),
            Some("해님")
        );
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM app_settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_save_streak() {
        let conn = setup_test_db();
        let date = NaiveDate::from_ymd_opt(2024, 5, 12).unwrap();
        save_streak(&conn, 3, date).unwrap();

        let settings = load_settings(&conn).unwrap();
        assert_eq!(settings.consecutive_days, 3);
        assert_eq!(settings.last_entry_date, Some(date));
    }

    #[test]
    fn test_empty_last_entry_date_is_absent() {
        let conn = setup_test_db();
        save_setting(&conn, SettingKey::LastEntryDate, "").unwrap();
        assert_eq!(load_settings(&conn).unwrap().last_entry_date, None);
    }

    #[test]
    fn test_corrupt_streak_value() {
        let conn = setup_test_db();
        save_setting(&conn, SettingKey::ConsecutiveDays, "many").unwrap();
        assert!(matches!(
            load_settings(&conn),
            Err(AppError::Database(DatabaseError::Corrupt { .. }))
        ));
    }

    #[test]
    fn test_setting_key_parsing() {
        assert_eq!("theme".parse::<SettingKey>().unwrap(), SettingKey::Theme);
        assert_eq!("ai_name".parse::<SettingKey>().unwrap(), SettingKey::AiName);
        assert!("colour".parse::<SettingKey>().is_err());
        assert!(!SettingKey::ConsecutiveDays.is_user_editable());
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), key);
        }
    }
}
