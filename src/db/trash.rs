//! Soft delete, restore and purge of diary entries.
//!
//! A trashed entry keeps its id as `original_id`, so restoring it puts it back
//! under the same id with every field unchanged. Moves between the two tables
//! happen inside a single transaction.

use crate::constants::{DATETIME_FORMAT, DATE_FORMAT_ISO};
use crate::db::entries::{self, conversion_error, entry_from_row, EncodedEntry, ENTRY_COLUMNS};
use crate::diary_core::{Entry, EntryId, TrashEntry};
use crate::errors::{AppResult, DatabaseError};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

fn trash_select() -> String {
    // original_id stands in for id so entry_from_row reads the same positions
    format!(
        "SELECT {}, deleted_date, auto_delete_date FROM deleted_entries",
        ENTRY_COLUMNS.replacen("id,", "original_id,", 1)
    )
}

fn trash_from_row(row: &Row<'_>) -> rusqlite::Result<TrashEntry> {
    let entry = entry_from_row(row)?;
    let deleted: String = row.get(9)?;
    let purge_after: String = row.get(10)?;

    Ok(TrashEntry {
        entry,
        deleted_at: NaiveDateTime::parse_from_str(&deleted, DATETIME_FORMAT)
            .map_err(|e| conversion_error(9, e))?,
        purge_after: NaiveDate::parse_from_str(&purge_after, DATE_FORMAT_ISO)
            .map_err(|e| conversion_error(10, e))?,
    })
}

fn not_found(id: EntryId, place: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("no {} entry with id {}", place, id))
}

/// Moves an active entry into the trash, stamped with `now`.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if no active entry has this id. On any
/// failure the entry stays where it was.
pub fn soft_delete(conn: &Connection, id: EntryId, now: NaiveDateTime) -> AppResult<TrashEntry> {
    let tx = conn.unchecked_transaction().map_err(DatabaseError::Sqlite)?;

    let entry = entries::get_entry(&tx, id)?.ok_or_else(|| not_found(id, "active"))?;
    let trashed = TrashEntry::new(entry, now);
    insert_trash_row(&tx, &trashed)?;
    entries::delete_entry_row(&tx, id)?;

    tx.commit().map_err(DatabaseError::Sqlite)?;
    info!(
        "Moved entry {} to trash, purge after {}",
        id, trashed.purge_after
    );
    Ok(trashed)
}

fn insert_trash_row(conn: &Connection, trashed: &TrashEntry) -> AppResult<()> {
    let entry = &trashed.entry;
    let encoded = EncodedEntry::from_entry("deleted_entries", entry)?;

    conn.execute(
        r#"
        INSERT INTO deleted_entries
            (original_id, date, time, mood, summary, keywords_json, suggested_keywords_json,
             action_items_json, transcript_json, deleted_date, auto_delete_date)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
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
            trashed.deleted_at.format(DATETIME_FORMAT).to_string(),
            trashed.purge_after.format(DATE_FORMAT_ISO).to_string(),
        ],
    )
    .map_err(DatabaseError::Sqlite)?;
    Ok(())
}

/// Returns a trashed entry by its original id.
pub fn get_trash_entry(conn: &Connection, id: EntryId) -> AppResult<Option<TrashEntry>> {
    let sql = format!("{} WHERE original_id = ?1", trash_select());
    conn.query_row(&sql, params![id.0], trash_from_row)
        .optional()
        .map_err(|e| DatabaseError::Sqlite(e).into())
}

/// Puts a trashed entry back into the active set under its original id.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if the trash holds no entry with this id.
pub fn restore(conn: &Connection, id: EntryId) -> AppResult<Entry> {
    let tx = conn.unchecked_transaction().map_err(DatabaseError::Sqlite)?;

    let trashed = get_trash_entry(&tx, id)?.ok_or_else(|| not_found(id, "trashed"))?;
    entries::insert_entry_with_id(&tx, &trashed.entry)?;
    tx.execute(
        "DELETE FROM deleted_entries WHERE original_id = ?1",
        params![id.0],
    )
    .map_err(DatabaseError::Sqlite)?;

    tx.commit().map_err(DatabaseError::Sqlite)?;
    info!("Restored entry {} from trash", id);
    Ok(trashed.entry)
}

/// Irreversibly removes one trashed entry.
///
/// # Errors
///
/// Returns `DatabaseError::NotFound` if the trash holds no entry with this id.
pub fn purge_permanently(conn: &Connection, id: EntryId) -> AppResult<()> {
    let removed = conn
        .execute(
            "DELETE FROM deleted_entries WHERE original_id = ?1",
            params![id.0],
        )
        .map_err(DatabaseError::Sqlite)?;

    if removed == 0 {
        return Err(not_found(id, "trashed").into());
    }
    info!("Permanently deleted entry {}", id);
    Ok(())
}

/// Irreversibly removes every trashed entry. Returns how many were removed.
pub fn purge_all_trash(conn: &Connection) -> AppResult<usize> {
    let removed = conn
        .execute("DELETE FROM deleted_entries", [])
        .map_err(DatabaseError::Sqlite)?;
    info!("Emptied trash, {} entries removed", removed);
    Ok(removed)
}

/// Lists trashed entries, most recently deleted first.
pub fn list_trash(conn: &Connection) -> AppResult<Vec<TrashEntry>> {
    let sql = format!(
        "{} ORDER BY deleted_date DESC, original_id DESC",
        trash_select()
    );
    let mut stmt = conn.prepare(&sql).map_err(DatabaseError::Sqlite)?;
    let trash = stmt
        .query_map([], trash_from_row)
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;

    debug!("Loaded {} trashed entries", trash.len());
    Ok(trash)
}

/// Ids of trashed entries whose purge date is on or before `today`.
pub fn expired_ids(conn: &Connection, today: NaiveDate) -> AppResult<Vec<EntryId>> {
    let mut stmt = conn
        .prepare(
            "SELECT original_id FROM deleted_entries WHERE auto_delete_date <= ?1 ORDER BY original_id",
        )
        .map_err(DatabaseError::Sqlite)?;
    let ids = stmt
        .query_map(params![today.format(DATE_FORMAT_ISO).to_string()], |row| {
            row.get::<_, i64>(0).map(EntryId)
        })
        .map_err(DatabaseError::Sqlite)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DatabaseError::Sqlite)?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entries::tests::{sample_entry, setup_test_db};
    use crate::db::entries::{get_entry, insert_entry, list_entries};
    use crate::errors::AppError;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_soft_delete_moves_entry() {
        let conn = setup_test_db();
        let id = insert_entry(&conn, &sample_entry(10, 21, "산책")).unwrap();

        let trashed = soft_delete(&conn, id, at(1, 9)).unwrap();

        assert_eq!(trashed.entry.id, id);
        assert_eq!(trashed.purge_after, NaiveDate::from_ymd_opt(2024, 7, 1).unwrap());
        assert!(get_entry(&conn, id).unwrap().is_none());
        assert_eq!(list_trash(&conn).unwrap(), vec![trashed]);
    }

    #[test]
    fn test_soft_delete_restore_round_trip() {
        let conn = setup_test_db();
        let id = insert_entry(&conn, &sample_entry(10, 21, "산책")).unwrap();
        let original = get_entry(&conn, id).unwrap().unwrap();

        soft_delete(&conn, id, at(1, 9)).unwrap();
        let restored = restore(&conn, id).unwrap();

        assert_eq!(restored, original);
        assert_eq!(get_entry(&conn, id).unwrap(), Some(original));
        assert!(list_trash(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_soft_delete_missing_is_not_found() {
        let conn = setup_test_db();
        let result = soft_delete(&conn, EntryId(7), at(1, 9));
        assert!(matches!(
            result,
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[test]
    fn test_restore_missing_is_not_found() {
        let conn = setup_test_db();
        let id = insert_entry(&conn, &sample_entry(10, 21, "산책")).unwrap();

        // Active, not trashed
        assert!(matches!(
            restore(&conn, id),
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
        assert!(get_entry(&conn, id).unwrap().is_some());
    }

    #[test]
    fn test_identical_content_entries_stay_distinct() {
        let conn = setup_test_db();
        let entry = sample_entry(10, 21, "같은 요약");
        let first = insert_entry(&conn, &entry).unwrap();
        let second = insert_entry(&conn, &entry).unwrap();

        soft_delete(&conn, second, at(1, 9)).unwrap();

        let active = list_entries(&conn).unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, first);
        assert_eq!(list_trash(&conn).unwrap()[0].entry.id, second);
    }

    #[test]
    fn test_purge_permanently() {
        let conn = setup_test_db();
        let id = insert_entry(&conn, &sample_entry(10, 21, "산책")).unwrap();
        soft_delete(&conn, id, at(1, 9)).unwrap();

        purge_permanently(&conn, id).unwrap();

        assert!(list_trash(&conn).unwrap().is_empty());
        assert!(get_entry(&conn, id).unwrap().is_none());
        assert!(matches!(
            purge_permanently(&conn, id),
            Err(AppError::Database(DatabaseError::NotFound(_)))
        ));
    }

    #[test]
    fn test_purge_all_trash_leaves_active_entries() {
        let conn = setup_test_db();
        let keep = insert_entry(&conn, &sample_entry(10, 8, "keep")).unwrap();
        for hour in 9..12 {
            let id = insert_entry(&conn, &sample_entry(10, hour, "drop")).unwrap();
            soft_delete(&conn, id, at(1, hour)).unwrap();
        }

        assert_eq!(purge_all_trash(&conn).unwrap(), 3);
        assert!(list_trash(&conn).unwrap().is_empty());
        assert_eq!(list_entries(&conn).unwrap()[0].id, keep);
    }

    #[test]
    fn test_list_trash_newest_deletion_first() {
        let conn = setup_test_db();
        let a = insert_entry(&conn, &sample_entry(10, 8, "a")).unwrap();
        let b = insert_entry(&conn, &sample_entry(11, 8, "b")).unwrap();
        soft_delete(&conn, b, at(1, 9)).unwrap();
        soft_delete(&conn, a, at(2, 9)).unwrap();

        let order: Vec<EntryId> = list_trash(&conn)
            .unwrap()
            .into_iter()
            .map(|t| t.entry.id)
            .collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_expired_ids_boundary() {
        let conn = setup_test_db();
        let id = insert_entry(&conn, &sample_entry(10, 8, "a")).unwrap();
        soft_delete(&conn, id, at(1, 23)).unwrap();

        let day_before = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let purge_day = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert!(expired_ids(&conn, day_before).unwrap().is_empty());
        assert_eq!(expired_ids(&conn, purge_day).unwrap(), vec![id]);
    }
}
