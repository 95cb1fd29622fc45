//! Read-only presentation helpers: derived display values over stored
//! documents. No state mutation.

use chrono::{DateTime, Utc};

use crate::achievements::Achievement;
use crate::model::Comment;

/// Human-readable abbreviation of a large count.
///
/// Below 1000 the literal integer; below one million a one-decimal "K"
/// value; above that a one-decimal "M" value. The decimal is truncated,
/// not rounded: 1999 is "1.9K".
pub fn compact_count(n: u64) -> String {
    if n < 1_000 {
        n.to_string()
    } else if n < 1_000_000 {
        format!("{}.{}K", n / 1_000, n / 100 % 10)
    } else {
        format!("{}.{}M", n / 1_000_000, n / 100_000 % 10)
    }
}

/// Human phrase for how long ago `timestamp` was, relative to a fixed
/// `now` supplied by the caller. Not re-evaluated unless re-invoked.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds().max(0);

    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;
    const WEEK: i64 = 7 * DAY;
    const MONTH: i64 = 30 * DAY;
    const YEAR: i64 = 365 * DAY;

    if seconds < MINUTE {
        "just now".to_string()
    } else if seconds < HOUR {
        plural(seconds / MINUTE, "minute")
    } else if seconds < DAY {
        plural(seconds / HOUR, "hour")
    } else if seconds < WEEK {
        plural(seconds / DAY, "day")
    } else if seconds < MONTH {
        plural(seconds / WEEK, "week")
    } else if seconds < YEAR {
        plural(seconds / MONTH, "month")
    } else {
        plural(seconds / YEAR, "year")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Stable descending sort by creation time. Comments with equal
/// timestamps keep their relative insertion order.
pub fn sort_comments_newest_first(comments: &[Comment]) -> Vec<Comment> {
    let mut sorted = comments.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

/// Maps displayed-badge ids to catalog entries in stored order, silently
/// dropping ids with no catalog match (removed achievements).
pub fn resolve_displayed_badges(
    displayed_badge_ids: &[String],
    catalog: &'static [Achievement],
) -> Vec<&'static Achievement> {
    displayed_badge_ids
        .iter()
        .filter_map(|id| catalog.iter().find(|a| a.id == id))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::achievements::ACHIEVEMENTS;

    #[test]
    fn compact_count_boundaries() {
        assert_eq!(compact_count(0), "0");
        assert_eq!(compact_count(999), "999");
        assert_eq!(compact_count(1_000), "1.0K");
        assert_eq!(compact_count(1_500), "1.5K");
        assert_eq!(compact_count(1_999), "1.9K");
        assert_eq!(compact_count(999_999), "999.9K");
        assert_eq!(compact_count(1_000_000), "1.0M");
        assert_eq!(compact_count(26_800_000), "26.8M");
    }

    #[test]
    fn relative_time_ladder() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().expect("timestamp");
        let at = |d: Duration| relative_time(now - d, now);

        assert_eq!(at(Duration::seconds(5)), "just now");
        assert_eq!(at(Duration::minutes(1)), "1 minute ago");
        assert_eq!(at(Duration::minutes(59)), "59 minutes ago");
        assert_eq!(at(Duration::hours(3)), "3 hours ago");
        assert_eq!(at(Duration::days(2)), "2 days ago");
        assert_eq!(at(Duration::weeks(3)), "3 weeks ago");
        assert_eq!(at(Duration::days(70)), "2 months ago");
        assert_eq!(at(Duration::days(800)), "2 years ago");
    }

    #[test]
    fn relative_time_clamps_future_timestamps() {
        let now = Utc::now();
        assert_eq!(relative_time(now + Duration::hours(1), now), "just now");
    }

    fn comment(id: &str, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id: id.to_string(),
            author_id: "u1".into(),
            author_name: "alice".into(),
            author_avatar_url: String::new(),
            text: "hi".into(),
            created_at,
        }
    }

    #[test]
    fn comments_sort_newest_first() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("timestamp");
        let list = vec![
            comment("old", t0),
            comment("new", t0 + Duration::hours(2)),
            comment("mid", t0 + Duration::hours(1)),
        ];
        let sorted = sort_comments_newest_first(&list);
        let ids: Vec<_> = sorted.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().expect("timestamp");
        let list = vec![comment("first", t0), comment("second", t0), comment("third", t0)];
        let sorted = sort_comments_newest_first(&list);
        let ids: Vec<_> = sorted.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn unknown_badge_ids_are_dropped() {
        let ids = vec![
            "popular_post".to_string(),
            "retired_badge".to_string(),
            "first_post".to_string(),
        ];
        let resolved = resolve_displayed_badges(&ids, ACHIEVEMENTS);
        let titles: Vec<_> = resolved.iter().map(|a| a.id).collect();
        assert_eq!(titles, vec!["popular_post", "first_post"]);
    }
}
