//! Mood and keyword statistics over saved entries.

use super::{Entry, Mood};
use crate::constants::POPULAR_KEYWORD_LIMIT;
use std::collections::HashMap;

/// How often one mood was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodStat {
    pub mood: Mood,
    pub count: usize,
    /// Share of all entries, rounded to one decimal place.
    pub percentage: f64,
}

/// Aggregate view over a set of entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EmotionStats {
    /// Moods by descending count.
    pub mood_stats: Vec<MoodStat>,
    /// Most frequent confirmed keywords with their counts.
    pub popular_keywords: Vec<(String, usize)>,
}

/// Computes mood distribution and keyword popularity.
///
/// Returns `None` when there are no entries. Only keywords the user confirmed
/// are counted, not the generator's suggestions. Ties keep first-seen order.
pub fn emotion_stats(entries: &[Entry]) -> Option<EmotionStats> {
    if entries.is_empty() {
        return None;
    }

    let mut mood_counts: Vec<(Mood, usize)> = Vec::new();
    let mut keyword_order: Vec<String> = Vec::new();
    let mut keyword_counts: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        match mood_counts.iter_mut().find(|(mood, _)| *mood == entry.mood) {
            Some((_, count)) => *count += 1,
            None => mood_counts.push((entry.mood, 1)),
        }

        for keyword in &entry.keywords {
            let count = keyword_counts.entry(keyword.as_str()).or_insert(0);
            if *count == 0 {
                keyword_order.push(keyword.clone());
            }
            *count += 1;
        }
    }

    let total = entries.len() as f64;
    let mut mood_stats: Vec<MoodStat> = mood_counts
        .into_iter()
        .map(|(mood, count)| MoodStat {
            mood,
            count,
            percentage: (count as f64 / total * 1000.0).round() / 10.0,
        })
        .collect();
    mood_stats.sort_by(|a, b| b.count.cmp(&a.count));

    let mut popular_keywords: Vec<(String, usize)> = keyword_order
        .into_iter()
        .map(|keyword| {
            let count = keyword_counts[keyword.as_str()];
            (keyword, count)
        })
        .collect();
    popular_keywords.sort_by(|a, b| b.1.cmp(&a.1));
    popular_keywords.truncate(POPULAR_KEYWORD_LIMIT);

    Some(EmotionStats {
        mood_stats,
        popular_keywords,
    })
}
