//! Date utilities: deadline-string normalization and timezone-aware resolution.

use anyhow::Result;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::extract::UNKNOWN;

/// One recognized deadline notation: a matcher plus a reader that pulls
/// (year, month, day) out of its captures. `today` supplies the year for
/// year-less notations.
struct DeadlineFormat {
    pattern: Regex,
    read: fn(&Captures, NaiveDate) -> Option<(i32, u32, u32)>,
}

static DEADLINE_FORMATS: LazyLock<Vec<DeadlineFormat>> = LazyLock::new(|| {
    fn num(caps: &Captures, i: usize) -> Option<u32> {
        caps.get(i)?.as_str().parse().ok()
    }

    vec![
        // 2024년 12월 25일 / 2024-12-25 / 2024/12/25, mixed separators allowed.
        // Must come before the year-less notation so the year is not dropped.
        DeadlineFormat {
            pattern: Regex::new(r"(\d{4})[-/년]\s*(\d{1,2})[-/월]\s*(\d{1,2})일?")
                .expect("deadline pattern"),
            read: |caps, _| Some((num(caps, 1)? as i32, num(caps, 2)?, num(caps, 3)?)),
        },
        // 12/25/2024
        DeadlineFormat {
            pattern: Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").expect("deadline pattern"),
            read: |caps, _| Some((num(caps, 3)? as i32, num(caps, 1)?, num(caps, 2)?)),
        },
        // 12월 25일, year defaults to the current calendar year
        DeadlineFormat {
            pattern: Regex::new(r"(\d{1,2})월\s*(\d{1,2})일").expect("deadline pattern"),
            read: |caps, today| Some((today.year(), num(caps, 1)?, num(caps, 2)?)),
        },
        // 2024-12-25
        DeadlineFormat {
            pattern: Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").expect("deadline pattern"),
            read: |caps, _| Some((num(caps, 1)? as i32, num(caps, 2)?, num(caps, 3)?)),
        },
    ]
});

/// Normalize a free-form deadline string to a calendar date.
///
/// Formats are tried in a fixed order and the first successful parse wins;
/// a notation may sit anywhere in the input ("2024년 12월 25일까지" works).
/// An impossible calendar date (month 13, Feb 31) fails that format and
/// falls through to the next one; there is no overflow normalization.
/// Returns `None` when every format is exhausted; never panics.
pub fn parse_deadline_date(raw: &str, today: NaiveDate) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() || raw == UNKNOWN {
        return None;
    }

    for format in DEADLINE_FORMATS.iter() {
        if let Some(caps) = format.pattern.captures(raw) {
            if let Some((y, m, d)) = (format.read)(&caps, today) {
                if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                    return Some(date);
                }
            }
        }
    }
    None
}

/// Ceiling of the signed day distance from `now` to the deadline's midnight.
/// 0 on the deadline day itself, negative once it has passed.
pub fn days_until(deadline: NaiveDate, now: DateTime<Utc>) -> i64 {
    let midnight = deadline.and_hms_opt(0, 0, 0).unwrap_or_default();
    let secs = (midnight - now.naive_utc()).num_seconds();
    (secs + 86_399).div_euclid(86_400)
}

/// Resolve a local wall-clock deadline like (2024-12-25, 23:59) in an IANA
/// tz like "Asia/Seoul" to UTC.
pub fn deadline_to_utc(date: NaiveDate, time: NaiveTime, tz: &str) -> Result<DateTime<Utc>> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;

    let local_dt = tz
        .from_local_datetime(&date.and_time(time))
        .single()
        .ok_or_else(|| {
            anyhow::anyhow!("ambiguous or invalid local time (DST?): {date} {time} {tz}")
        })?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Display form used in lists and alerts: "2024년 12월 25일".
pub fn format_date_korean(date: NaiveDate) -> String {
    format!("{}년 {}월 {}일", date.year(), date.month(), date.day())
}
