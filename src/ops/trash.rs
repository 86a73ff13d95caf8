//! Trash commands: soft delete, listing, restore and purge.
//!
//! Every command that reads the trash sweeps expired items first, so an
//! entry past its purge date is never shown or restored.

use crate::diary_core::EntryId;
use crate::errors::{AppResult, ValidationError};
use crate::store::DiaryStore;
use chrono::NaiveDateTime;
use std::io::Write;
use tracing::info;

/// Moves an entry to the trash and reports its purge date.
pub fn delete_entry<W: Write>(
    store: &DiaryStore,
    out: &mut W,
    id: i64,
    now: NaiveDateTime,
) -> AppResult<()> {
    let trashed = store.soft_delete(EntryId(id), now)?;
    writeln!(
        out,
        "🗑  #{} 일기를 휴지통으로 옮겼어요. {}에 완전히 삭제돼요.",
        trashed.entry.id, trashed.purge_after
    )?;
    Ok(())
}

pub fn list_trash<W: Write>(store: &DiaryStore, out: &mut W, now: NaiveDateTime) -> AppResult<()> {
    let today = now.date();
    let items = store.list_trash(today)?;
    if items.is_empty() {
        writeln!(out, "휴지통이 비어 있어요.")?;
        return Ok(());
    }

    for item in &items {
        writeln!(
            out,
            "#{:<4} {}  [{}]  {}  (삭제 {}, {}일 남음)",
            item.entry.id,
            item.entry.date,
            item.entry.mood.label(),
            item.entry.summary,
            item.deleted_at.format("%Y-%m-%d %H:%M"),
            item.days_remaining(today)
        )?;
    }
    Ok(())
}

pub fn restore_entry<W: Write>(
    store: &DiaryStore,
    out: &mut W,
    id: i64,
    now: NaiveDateTime,
) -> AppResult<()> {
    let entry = store.restore(EntryId(id), now.date())?;
    writeln!(out, "♻️  #{} 일기를 되살렸어요: {}", entry.id, entry.summary)?;
    Ok(())
}

pub fn purge_entry<W: Write>(
    store: &DiaryStore,
    out: &mut W,
    id: i64,
    now: NaiveDateTime,
) -> AppResult<()> {
    store.purge_permanently(EntryId(id), now.date())?;
    writeln!(out, "#{} 일기를 완전히 삭제했어요.", id)?;
    Ok(())
}

/// Permanently deletes everything in the trash. Refuses unless `confirmed`.
pub fn empty_trash<W: Write>(store: &DiaryStore, out: &mut W, confirmed: bool) -> AppResult<()> {
    if !confirmed {
        return Err(ValidationError::ConfirmationRequired("empty-trash --yes").into());
    }
    let removed = store.purge_all_trash()?;
    info!("Emptied trash ({} entries)", removed);
    writeln!(out, "휴지통에서 {}개의 일기를 완전히 삭제했어요.", removed)?;
    Ok(())
}
