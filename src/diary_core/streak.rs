//! Consecutive-day streak over entry dates.

use chrono::{Duration, NaiveDate};
use std::collections::HashSet;

/// Counts consecutive days with at least one entry, ending today or yesterday.
///
/// Several entries on the same day count once. If there is an entry today the
/// walk starts at today; otherwise it starts at yesterday and only counts if
/// yesterday has an entry. The walk stops at the first day without an entry.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use mindtalk::diary_core::streak::calculate_streak;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap();
/// assert_eq!(calculate_streak([day(10), day(11), day(12)], day(12)), 3);
/// assert_eq!(calculate_streak([day(12)], day(13)), 1);
/// assert_eq!(calculate_streak([day(10), day(11)], day(13)), 0);
/// ```
pub fn calculate_streak<I>(dates: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: HashSet<NaiveDate> = dates.into_iter().collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_empty_dates() {
        assert_eq!(calculate_streak(Vec::new(), day(12)), 0);
    }

    #[test]
    fn test_three_days_ending_today() {
        assert_eq!(calculate_streak(vec![day(10), day(11), day(12)], day(12)), 3);
    }

    #[test]
    fn test_two_day_gap_breaks_streak() {
        assert_eq!(calculate_streak(vec![day(10), day(11)], day(13)), 0);
    }

    #[test]
    fn test_yesterday_anchor() {
        assert_eq!(calculate_streak(vec![day(12)], day(13)), 1);
        assert_eq!(calculate_streak(vec![day(10), day(11), day(12)], day(13)), 3);
    }

    #[test]
    fn test_today_only() {
        assert_eq!(calculate_streak(vec![day(12)], day(12)), 1);
    }

    #[test]
    fn test_duplicate_dates_count_once() {
        assert_eq!(
            calculate_streak(vec![day(11), day(11), day(12), day(12)], day(12)),
            2
        );
    }

    #[test]
    fn test_gap_is_never_bridged() {
        // 9, 10 then a hole on 11, then 12 and 13
        let dates = vec![day(9), day(10), day(12), day(13)];
        assert_eq!(calculate_streak(dates, day(13)), 2);
    }

    #[test]
    fn test_future_dates_are_ignored() {
        assert_eq!(calculate_streak(vec![day(14), day(15)], day(13)), 0);
    }

    #[test]
    fn test_zero_iff_neither_today_nor_yesterday() {
        let today = day(20);
        let sets = vec![
            vec![],
            vec![day(1)],
            vec![day(18)],
            vec![day(19)],
            vec![day(20)],
            vec![day(17), day(18)],
            vec![day(19), day(20)],
        ];
        for dates in sets {
            let has_anchor = dates.contains(&today) || dates.contains(&day(19));
            let streak = calculate_streak(dates.clone(), today);
            assert_eq!(streak == 0, !has_anchor, "dates: {:?}", dates);
        }
    }
}
