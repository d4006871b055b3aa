use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Human-readable distance between `then` and `now`, e.g. "5 minutes ago"
/// or "in about 2 hours".
///
/// Buckets follow date-fns `formatDistanceToNow` with `addSuffix: true`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    let distance = distance_words(seconds.abs());

    if seconds < 0 {
        format!("in {}", distance)
    } else {
        format!("{} ago", distance)
    }
}

fn distance_words(seconds: i64) -> String {
    // Round to the nearest whole unit, half up
    let minutes = (seconds + 30) / MINUTE;

    if seconds < 30 {
        "less than a minute".to_string()
    } else if minutes < 2 {
        "1 minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "about 1 hour".to_string()
    } else if minutes < 24 * 60 {
        format!("about {} hours", (seconds + HOUR / 2) / HOUR)
    } else if minutes < 42 * 60 {
        "1 day".to_string()
    } else if minutes < 30 * 24 * 60 {
        format!("{} days", (seconds + DAY / 2) / DAY)
    } else if minutes < 45 * 24 * 60 {
        "about 1 month".to_string()
    } else if minutes < 60 * 24 * 60 {
        "about 2 months".to_string()
    } else if seconds < YEAR {
        format!("{} months", ((seconds + MONTH / 2) / MONTH).max(2))
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

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn ago(d: Duration) -> String {
        let now = Utc::now();
        relative_time(now - d, now)
    }

    #[test]
    fn test_buckets() {
        assert_eq!(ago(Duration::seconds(10)), "less than a minute ago");
        assert_eq!(ago(Duration::seconds(60)), "1 minute ago");
        assert_eq!(ago(Duration::minutes(5)), "5 minutes ago");
        assert_eq!(ago(Duration::minutes(50)), "about 1 hour ago");
        assert_eq!(ago(Duration::hours(3)), "about 3 hours ago");
        assert_eq!(ago(Duration::hours(30)), "1 day ago");
        assert_eq!(ago(Duration::days(4)), "4 days ago");
        assert_eq!(ago(Duration::days(35)), "about 1 month ago");
        assert_eq!(ago(Duration::days(50)), "about 2 months ago");
        assert_eq!(ago(Duration::days(120)), "4 months ago");
        assert_eq!(ago(Duration::days(370)), "about 1 year ago");
        assert_eq!(ago(Duration::days(365 * 2 + 200)), "over 2 years ago");
        assert_eq!(ago(Duration::days(365 * 2 + 330)), "almost 3 years ago");
    }

    #[test]
    fn test_future_timestamps() {
        let now = Utc::now();
        assert_eq!(relative_time(now + Duration::hours(2), now), "in about 2 hours");
    }
}
