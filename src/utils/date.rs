use chrono::{DateTime, Local, NaiveDate, Utc};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// `YYYY-MM-DD HH:MM` in local time, or `--:--` when absent.
pub fn local_stamp(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

/// `HH:MM` in local time, or `--:--` when absent.
pub fn local_time(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(t) => t.with_timezone(&Local).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}
