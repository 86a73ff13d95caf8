//! Read-only views over saved entries: list, search, statistics and streak.

use crate::diary_core::Entry;
use crate::errors::{AppResult, ValidationError};
use crate::store::DiaryStore;
use chrono::NaiveDate;
use std::io::Write;
use tracing::debug;

/// Prints every entry, oldest first.
pub fn list_entries<W: Write>(store: &DiaryStore, out: &mut W) -> AppResult<()> {
    let entries = store.list_entries()?;
    if entries.is_empty() {
        writeln!(out, "아직 저장된 일기가 없어요.")?;
        return Ok(());
    }
    for entry in &entries {
        print_entry_line(out, entry)?;
    }
    writeln!(out, "\n총 {}개의 일기", entries.len())?;
    Ok(())
}

/// Prints entries whose summary or keywords contain `query`.
pub fn search_entries<W: Write>(store: &DiaryStore, out: &mut W, query: &str) -> AppResult<()> {
    let query = query.trim();
    if query.is_empty() {
        return Err(ValidationError::EmptyMessage.into());
    }

    let matches = store.search(query)?;
    debug!("Search matched {} entries", matches.len());
    if matches.is_empty() {
        writeln!(out, "'{}'에 해당하는 일기가 없어요.", query)?;
        return Ok(());
    }
    for entry in &matches {
        print_entry_line(out, entry)?;
    }
    Ok(())
}

pub fn show_stats<W: Write>(store: &DiaryStore, out: &mut W) -> AppResult<()> {
    let stats = match store.emotion_stats()? {
        Some(stats) => stats,
        None => {
            writeln!(out, "통계를 낼 일기가 아직 없어요.")?;
            return Ok(());
        }
    };

    writeln!(out, "기분 분포")?;
    for stat in &stats.mood_stats {
        writeln!(
            out,
            "  {:<4} {:>3}개  {:>5.1}%",
            stat.mood.label(),
            stat.count,
            stat.percentage
        )?;
    }

    if !stats.popular_keywords.is_empty() {
        writeln!(out, "\n자주 쓴 감정 키워드")?;
        for (rank, (keyword, count)) in stats.popular_keywords.iter().enumerate() {
            writeln!(out, "  {:>2}. {} ({})", rank + 1, keyword, count)?;
        }
    }
    Ok(())
}

/// Prints the streak as of `today`.
pub fn show_streak<W: Write>(store: &DiaryStore, out: &mut W, today: NaiveDate) -> AppResult<()> {
    let streak = store.current_streak(today)?;
    if streak == 0 {
        writeln!(out, "연속 기록이 없어요. 오늘 첫 일기를 써볼까요?")?;
    } else {
        writeln!(out, "🔥 {}일 연속으로 기록하고 있어요!", streak)?;
    }
    Ok(())
}

pub(crate) fn print_entry_line<W: Write>(out: &mut W, entry: &Entry) -> AppResult<()> {
    writeln!(
        out,
        "#{:<4} {} {}  [{}]  {}  {}",
        entry.id,
        entry.date,
        entry.time.format("%H:%M"),
        entry.mood.label(),
        entry.summary,
        entry.keywords.join(" ")
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entries::tests::sample_entry;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, DiaryStore) {
        let dir = TempDir::new().unwrap();
        let store = DiaryStore::open(&dir.path().join("diary.db")).unwrap();
        (dir, store)
    }

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> AppResult<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_list_empty_and_filled() {
        let (_dir, store) = open_store();
        assert!(render(|out| list_entries(&store, out)).contains("없어요"));

        store.create_entry(&sample_entry(10, 9, "산책을 했다")).unwrap();
        store.create_entry(&sample_entry(11, 9, "책을 읽었다")).unwrap();

        let text = render(|out| list_entries(&store, out));
        let walk = text.find("산책을 했다").unwrap();
        let book = text.find("책을 읽었다").unwrap();
        assert!(walk < book);
        assert!(text.contains("총 2개"));
    }

    #[test]
    fn test_search_reports_matches_and_misses() {
        let (_dir, store) = open_store();
        store.create_entry(&sample_entry(10, 9, "산책을 했다")).unwrap();

        assert!(render(|out| search_entries(&store, out, "산책")).contains("산책을 했다"));
        assert!(render(|out| search_entries(&store, out, "수영")).contains("없어요"));

        let mut out = Vec::new();
        assert!(search_entries(&store, &mut out, "  ").is_err());
    }

    #[test]
    fn test_stats_output() {
        let (_dir, store) = open_store();
        assert!(render(|out| show_stats(&store, out)).contains("없어요"));

        store.create_entry(&sample_entry(10, 9, "산책을 했다")).unwrap();
        let text = render(|out| show_stats(&store, out));
        assert!(text.contains("100.0%"));
        assert!(text.contains("#기쁨"));
    }

    #[test]
    fn test_streak_output() {
        let (_dir, store) = open_store();
        let today = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        assert!(render(|out| show_streak(&store, out, today)).contains("없어요"));

        store.create_entry(&sample_entry(10, 9, "어제")).unwrap();
        store.create_entry(&sample_entry(11, 9, "오늘")).unwrap();
        assert!(render(|out| show_streak(&store, out, today)).contains("2일 연속"));
    }
}
