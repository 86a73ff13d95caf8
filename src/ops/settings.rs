//! Settings and token-usage commands.

use crate::db::settings::SettingKey;
use crate::errors::AppResult;
use crate::store::DiaryStore;
use std::io::Write;
use tracing::info;

pub fn show_settings<W: Write>(store: &DiaryStore, out: &mut W) -> AppResult<()> {
    let settings = store.settings()?;
    writeln!(out, "{:<18} {}", SettingKey::AiName, settings.ai_name)?;
    writeln!(out, "{:<18} {}", SettingKey::Theme, settings.theme)?;
    writeln!(out, "{:<18} {}", SettingKey::ConsecutiveDays, settings.consecutive_days)?;
    let last = settings
        .last_entry_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    writeln!(out, "{:<18} {}", SettingKey::LastEntryDate, last)?;
    Ok(())
}

/// Parses `key` and stores `value` under it.
///
/// # Errors
///
/// `ValidationError::UnknownSetting` for unknown or read-only keys and
/// `ValidationError::EmptyMessage` for a blank value.
pub fn update_setting<W: Write>(
    store: &DiaryStore,
    out: &mut W,
    key: &str,
    value: &str,
) -> AppResult<()> {
    let key: SettingKey = key.parse()?;
    store.set_setting(key, value)?;
    info!("Setting {} updated", key);
    writeln!(out, "{} = {}", key, value.trim())?;
    Ok(())
}

/// Prints the lifetime token counter, optionally resetting it first.
pub fn show_usage<W: Write>(store: &DiaryStore, out: &mut W, reset: bool) -> AppResult<()> {
    if reset {
        store.reset_token_usage()?;
        writeln!(out, "토큰 사용량을 0으로 초기화했어요.")?;
        return Ok(());
    }
    writeln!(out, "누적 토큰 사용량: {}", store.token_usage()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{AppError, ValidationError};
    use tempfile::TempDir;

    fn open_store() -> (TempDir, DiaryStore) {
        let dir = TempDir::new().unwrap();
        let store = DiaryStore::open(&dir.path().join("diary.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_show_defaults() {
        let (_dir, store) = open_store();
        let mut out = Vec::new();
        show_settings(&store, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("ai_name"));
        assert!(text.contains("루나"));
        assert!(text.contains("last_entry_date    -"));
    }

    #[test]
    fn test_update_and_show() {
        let (_dir, store) = open_store();
        let mut out = Vec::new();
        update_setting(&store, &mut out, "name", " 별이 ").unwrap();
        assert_eq!(store.settings().unwrap().ai_name, "별이");

        let mut out = Vec::new();
        show_settings(&store, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("별이"));
    }

    #[test]
    fn test_update_rejects_read_only_key() {
        let (_dir, store) = open_store();
        let mut out = Vec::new();
        let result = update_setting(&store, &mut out, "consecutive_days", "99");
        assert!(matches!(
            result,
            Err(AppError::Validation(ValidationError::UnknownSetting(_)))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_usage_show_and_reset() {
        let (_dir, store) = open_store();
        store.add_token_usage(42).unwrap();

        let mut out = Vec::new();
        show_usage(&store, &mut out, false).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("42"));

        let mut out = Vec::new();
        show_usage(&store, &mut out, true).unwrap();
        assert_eq!(store.token_usage().unwrap(), 0);
    }
}
