//! Retention sweep for the trash.

use crate::db::trash;
use crate::errors::{AppResult, DatabaseError};
use chrono::NaiveDate;
use rusqlite::Connection;
use tracing::{debug, info};

/// Permanently deletes every trashed entry whose purge date is on or before
/// `today`. Returns how many entries were removed.
///
/// Running it again with the same `today` removes nothing.
pub fn sweep_expired_trash(conn: &Connection, today: NaiveDate) -> AppResult<usize> {
    let expired = trash::expired_ids(conn, today)?;
    if expired.is_empty() {
        debug!("Trash sweep for {}: nothing expired", today);
        return Ok(0);
    }

    let tx = conn.unchecked_transaction().map_err(DatabaseError::Sqlite)?;
    for id in &expired {
        trash::purge_permanently(&tx, *id)?;
    }
    tx.commit().map_err(DatabaseError::Sqlite)?;

    info!(
        "Trash sweep for {} purged {} expired entries",
        today,
        expired.len()
    );
    Ok(expired.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entries::insert_entry;
    use crate::db::entries::tests::{sample_entry, setup_test_db};
    use crate::db::trash::{list_trash, soft_delete};
    use chrono::Duration;

    #[test]
    fn test_sweep_respects_purge_date() {
        let conn = setup_test_db();
        let deleted_at = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let id = insert_entry(&conn, &sample_entry(10, 8, "a")).unwrap();
        let trashed = soft_delete(&conn, id, deleted_at).unwrap();

        let day_before = trashed.purge_after - Duration::days(1);
        assert_eq!(sweep_expired_trash(&conn, day_before).unwrap(), 0);
        assert_eq!(list_trash(&conn).unwrap().len(), 1);

        assert_eq!(sweep_expired_trash(&conn, trashed.purge_after).unwrap(), 1);
        assert!(list_trash(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_sweep_is_idempotent_and_selective() {
        let conn = setup_test_db();
        let old = NaiveDate::from_ymd_opt(2024, 4, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let recent = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let a = insert_entry(&conn, &sample_entry(10, 8, "a")).unwrap();
        let b = insert_entry(&conn, &sample_entry(11, 8, "b")).unwrap();
        soft_delete(&conn, a, old).unwrap();
        soft_delete(&conn, b, recent).unwrap();

        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        assert_eq!(sweep_expired_trash(&conn, today).unwrap(), 1);
        assert_eq!(sweep_expired_trash(&conn, today).unwrap(), 0);

        let remaining = list_trash(&conn).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].entry.id, b);
    }
}
