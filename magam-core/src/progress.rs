//! Progress tracking: checklist completion measured against an
//! expected-progress curve keyed to the working-day countdown.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::checklist::{ChecklistItem, completed_count};

/// Shortfall (expected minus current, in points) past which the warning
/// escalates.
pub const WARNING_SHORTFALL: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    High,
    Low,
}

/// Computed fresh on every request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub current_progress: f64,
    pub expected_progress: f64,
    pub is_delayed: bool,
    pub warning_level: WarningLevel,
}

/// Calendar days from `today` to `deadline`, stepping day-by-day and
/// decrementing once for each Saturday or Sunday stepped onto. Negative
/// once the deadline is past. Holidays are not skipped.
pub fn working_days_until(today: NaiveDate, deadline: NaiveDate) -> i64 {
    let days = (deadline - today).num_days();
    let mut working = days;
    let mut current = today;

    for _ in 0..days {
        current = current.succ_opt().unwrap_or(current);
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            working -= 1;
        }
    }
    working
}

/// Expected-progress curve, `100/(d+1)`: about 9.09% ten working days
/// out, 100% on deadline day. The day count clamps at 0 first, so overdue
/// deadlines also expect 100%; output stays within 0 to 100.
pub fn expected_progress(working_days: i64) -> f64 {
    let d = working_days.max(0) as f64;
    ((1.0 - d / (d + 1.0)) * 100.0).clamp(0.0, 100.0)
}

/// Completion percentage; an empty checklist reports 0% rather than a
/// division error.
pub fn current_progress(items: &[ChecklistItem]) -> f64 {
    let total = items.len().max(1) as f64;
    completed_count(items) as f64 / total * 100.0
}

pub fn track_progress(
    items: &[ChecklistItem],
    deadline: NaiveDate,
    today: NaiveDate,
) -> ProgressReport {
    let current = current_progress(items);
    let expected = expected_progress(working_days_until(today, deadline));

    ProgressReport {
        current_progress: current,
        expected_progress: expected,
        is_delayed: current < expected,
        warning_level: if expected - current > WARNING_SHORTFALL {
            WarningLevel::High
        } else {
            WarningLevel::Low
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checklist::seed;
    use crate::record::EventType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_working_days_skip_weekend() {
        // Friday to Monday: three calendar days, two weekend days stepped.
        assert_eq!(working_days_until(date(2024, 12, 6), date(2024, 12, 9)), 1);
        // Monday to Friday same week: no weekend in between.
        assert_eq!(working_days_until(date(2024, 12, 2), date(2024, 12, 6)), 4);
    }

    #[test]
    fn test_working_days_same_day_and_past() {
        let day = date(2024, 12, 4);
        assert_eq!(working_days_until(day, day), 0);
        assert!(working_days_until(date(2024, 12, 10), date(2024, 12, 4)) < 0);
    }

    #[test]
    fn test_expected_progress_curve() {
        assert!((expected_progress(0) - 100.0).abs() < 1e-9);
        assert!((expected_progress(10) - 100.0 / 11.0).abs() < 1e-9);
        assert!((expected_progress(1) - 50.0).abs() < 1e-9);
        // overdue clamps to deadline-day expectation
        assert!((expected_progress(-3) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_one_of_five_ten_working_days_out() {
        // Mon 2024-12-02 → Mon 2024-12-16 is 14 calendar days, 4 weekend
        // days stepped: 10 working days.
        let today = date(2024, 12, 2);
        let deadline = date(2024, 12, 16);
        assert_eq!(working_days_until(today, deadline), 10);

        let mut items = seed(EventType::Assignment);
        items[0].completed = true;

        let report = track_progress(&items, deadline, today);
        assert!((report.current_progress - 20.0).abs() < 1e-9);
        assert!((report.expected_progress - 9.09).abs() < 0.01);
        assert!(!report.is_delayed);
        assert_eq!(report.warning_level, WarningLevel::Low);
    }

    #[test]
    fn test_untouched_list_on_deadline_day() {
        let day = date(2024, 12, 16);
        let items = seed(EventType::Assignment);

        let report = track_progress(&items, day, day);
        assert!((report.expected_progress - 100.0).abs() < 1e-9);
        assert!((report.current_progress - 0.0).abs() < 1e-9);
        assert!(report.is_delayed);
        assert_eq!(report.warning_level, WarningLevel::High);
    }

    #[test]
    fn test_finished_list_is_never_delayed() {
        let mut items = seed(EventType::Exam);
        for item in &mut items {
            item.completed = true;
        }
        // even overdue
        let report = track_progress(&items, date(2024, 12, 1), date(2024, 12, 10));
        assert!((report.current_progress - 100.0).abs() < 1e-9);
        assert!(!report.is_delayed);
        assert_eq!(report.warning_level, WarningLevel::Low);
    }

    #[test]
    fn test_empty_checklist_reports_zero() {
        let report = track_progress(&[], date(2024, 12, 16), date(2024, 12, 2));
        assert!((report.current_progress - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_strictly_increases_per_completion() {
        let today = date(2024, 12, 2);
        let deadline = date(2024, 12, 16);
        let mut items = seed(EventType::Assignment);
        let mut prev = track_progress(&items, deadline, today).current_progress;

        for i in 0..items.len() {
            items[i].completed = true;
            let next = track_progress(&items, deadline, today).current_progress;
            assert!(next > prev);
            prev = next;
        }
        assert!((prev - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_report_is_deterministic() {
        let today = date(2024, 12, 2);
        let deadline = date(2024, 12, 16);
        let items = seed(EventType::Exam);

        let a = track_progress(&items, deadline, today);
        let b = track_progress(&items, deadline, today);
        assert_eq!(a, b);
    }
}
