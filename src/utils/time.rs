use chrono::Utc;

/// Current time as a millisecond epoch, the timestamp unit used by every
/// record in the `posts` and `users` collections.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Compact relative-time label for list rows: "Just now", "5m", "3h", "2d".
///
/// `now` is passed in rather than read from the clock so rendering is
/// deterministic; timestamps from the future clamp to "Just now".
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - timestamp_ms).max(0) / 1_000;
    if seconds < 60 {
        return "Just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }
    format!("{}d", hours / 24)
}
