use chrono::{DateTime, Utc};

/// Format an RFC 3339 timestamp as e.g. "May 6, 2025".
/// Unparseable input is returned unchanged.
pub fn format_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.format("%B %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Describe `date` relative to `now`: "just now", "5 minutes ago", "in 2 days".
pub fn format_relative_time(date: &str, now: DateTime<Utc>) -> String {
    let Ok(dt) = DateTime::parse_from_rfc3339(date) else {
        return date.to_string();
    };
    let seconds = (dt.with_timezone(&Utc) - now).num_seconds();

    if seconds.abs() < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes.abs() < 60 {
        return relative(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours.abs() < 24 {
        return relative(hours, "hour");
    }

    let days = hours / 24;
    match days {
        -1 => return "yesterday".to_string(),
        1 => return "tomorrow".to_string(),
        _ => {}
    }
    if days.abs() < 30 {
        return relative(days, "day");
    }

    let months = days / 30;
    if months.abs() < 12 {
        return relative(months, "month");
    }

    relative(months / 12, "year")
}

fn relative(amount: i64, unit: &str) -> String {
    let count = amount.abs();
    let plural = if count == 1 { "" } else { "s" };
    if amount < 0 {
        format!("{} {}{} ago", count, unit, plural)
    } else {
        format!("in {} {}{}", count, unit, plural)
    }
}

/// Format a number of seconds as "45s", "2m 30s" or "1h 5m 0s".
pub fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{}s", seconds);
    }

    let minutes = seconds / 60;
    let remaining_seconds = seconds % 60;
    if minutes < 60 {
        return format!("{}m {}s", minutes, remaining_seconds);
    }

    let hours = minutes / 60;
    let remaining_minutes = minutes % 60;
    format!("{}h {}m {}s", hours, remaining_minutes, remaining_seconds)
}

/// Whole-number percentage of correct answers; 0 when nothing was studied.
pub fn accuracy_percent(correct: u32, studied: u32) -> u32 {
    if studied == 0 {
        0
    } else {
        ((f64::from(correct) / f64::from(studied)) * 100.0).round() as u32
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
