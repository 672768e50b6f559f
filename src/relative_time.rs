// Human-friendly "time ago" labels for chat messages.

use crate::utc_time::UtcDateTime;


// Returns `None` for timestamps in the future or more than a month old: those are shown as
// absolute dates.
pub fn relative_time_label(timestamp: UtcDateTime, now: UtcDateTime) -> Option<String> {
    let seconds = now.duration_since(timestamp)?.as_secs();
    let days = seconds / 86400;
    let label = match days {
        0 => match seconds {
            0..60 => "just now".to_owned(),
            60..120 => "1 minute ago".to_owned(),
            120..3600 => format!("{} minutes ago", seconds / 60),
            3600..7200 => "1 hour ago".to_owned(),
            _ => format!("{} hours ago", seconds / 3600),
        },
        1 => "Yesterday".to_owned(),
        2..7 => format!("{} days ago", days),
        7..31 => format!("{} weeks ago", days.div_ceil(7)),
        _ => return None,
    };
    Some(label)
}

pub fn time_label(timestamp: UtcDateTime, now: UtcDateTime) -> String {
    relative_time_label(timestamp, now).unwrap_or_else(|| timestamp.to_rfc3339())
}
