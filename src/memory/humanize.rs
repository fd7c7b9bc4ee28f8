//! Human-friendly time rendering for the feed and timeline views

use chrono::{DateTime, Local, Utc};

/// Distance between `then` and `now` in words with a suffix, e.g.
/// `"5 minutes ago"`, `"about 3 hours ago"` or `"in 2 days"`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let distance = distance_in_words(seconds.unsigned_abs());
    if seconds < 0 {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}

fn distance_in_words(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const MONTH: u64 = 30 * DAY;
    const YEAR: u64 = 365 * DAY;

    // Rounded minutes drive the buckets below a day
    let minutes = (seconds + 30) / MINUTE;

    if seconds < 30 {
        "less than a minute".to_string()
    } else if minutes < 45 {
        plural(minutes.max(1), "minute")
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if seconds < DAY {
        format!("about {}", plural((seconds + HOUR / 2) / HOUR, "hour"))
    } else if seconds < 42 * HOUR {
        "1 day".to_string()
    } else if seconds < MONTH {
        plural((seconds + DAY / 2) / DAY, "day")
    } else if seconds < 2 * MONTH {
        format!("about {}", plural((seconds + MONTH / 2) / MONTH, "month"))
    } else if seconds < YEAR {
        plural((seconds + MONTH / 2) / MONTH, "month")
    } else {
        let years = seconds / YEAR;
        let remainder = seconds % YEAR;
        if remainder < 3 * MONTH {
            format!("about {}", plural(years, "year"))
        } else if remainder < 9 * MONTH {
            format!("over {}", plural(years, "year"))
        } else {
            format!("almost {}", plural(years + 1, "year"))
        }
    }
}

fn plural(n: u64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Calendar date of a timestamp in local time, for the timeline view
pub fn timeline_date(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn ago(d: Duration) -> String {
        relative_time(now() - d, now())
    }

    #[test]
    fn test_under_a_minute() {
        assert_eq!(ago(Duration::seconds(5)), "less than a minute ago");
        assert_eq!(ago(Duration::zero()), "less than a minute ago");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(ago(Duration::seconds(45)), "1 minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(44)), "44 minutes ago");
    }

    #[test]
    fn test_hours() {
        assert_eq!(ago(Duration::minutes(50)), "about 1 hour ago");
        assert_eq!(ago(Duration::hours(3)), "about 3 hours ago");
        assert_eq!(ago(Duration::hours(23)), "about 23 hours ago");
    }

    #[test]
    fn test_days() {
        assert_eq!(ago(Duration::hours(30)), "1 day ago");
        assert_eq!(ago(Duration::days(2)), "2 days ago");
        assert_eq!(ago(Duration::days(10)), "10 days ago");
    }

    #[test]
    fn test_months_and_years() {
        assert_eq!(ago(Duration::days(40)), "about 1 month ago");
        assert_eq!(ago(Duration::days(90)), "3 months ago");
        assert_eq!(ago(Duration::days(370)), "about 1 year ago");
        assert_eq!(ago(Duration::days(365 + 180)), "over 1 year ago");
        assert_eq!(ago(Duration::days(365 + 300)), "almost 2 years ago");
    }

    #[test]
    fn test_future() {
        assert_eq!(
            relative_time(now() + Duration::days(2), now()),
            "in 2 days"
        );
    }

    #[test]
    fn test_timeline_date_format() {
        let date = timeline_date(now());
        assert_eq!(date.len(), 10);
        assert_eq!(&date[4..5], "-");
        assert_eq!(&date[7..8], "-");
    }
}
