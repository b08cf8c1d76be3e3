//! Deadline alerts: a pure projection of records due today or tomorrow.
//!
//! The host decides when to scan (startup, a daily tick); this module only
//! turns (records, today) into display-ready alerts.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::AssignmentRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    DueToday,
    DueTomorrow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineAlert {
    pub record_id: String,
    pub title: String,
    pub kind: AlertKind,
    pub message: String,
}

fn alert(record: &AssignmentRecord, kind: AlertKind) -> DeadlineAlert {
    let when = match kind {
        AlertKind::DueToday => "오늘",
        AlertKind::DueTomorrow => "내일",
    };
    DeadlineAlert {
        record_id: record.id.clone(),
        title: record.title.clone(),
        kind,
        message: format!(
            "[마감일 알림] {}이 \"{}\" {}의 마감일입니다!",
            when,
            record.title,
            record.event_type.label_ko()
        ),
    }
}

/// Scan records for deadlines landing today or tomorrow. Output is stable:
/// today's alerts first, each group sorted by title.
pub fn deadline_alerts(records: &[AssignmentRecord], today: NaiveDate) -> Vec<DeadlineAlert> {
    let tomorrow = today.succ_opt();

    let mut due_today: Vec<DeadlineAlert> = records
        .iter()
        .filter(|r| r.date == today)
        .map(|r| alert(r, AlertKind::DueToday))
        .collect();
    let mut due_tomorrow: Vec<DeadlineAlert> = records
        .iter()
        .filter(|r| Some(r.date) == tomorrow)
        .map(|r| alert(r, AlertKind::DueTomorrow))
        .collect();

    due_today.sort_by(|a, b| a.title.cmp(&b.title));
    due_tomorrow.sort_by(|a, b| a.title.cmp(&b.title));
    due_today.extend(due_tomorrow);
    due_today
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EventType;

    fn record(id: &str, title: &str, ty: EventType, date: NaiveDate) -> AssignmentRecord {
        AssignmentRecord::new(id, title, ty, date)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_alerts_for_today_and_tomorrow() {
        let today = date(2024, 12, 16);
        let records = vec![
            record("1", "운영체제 보고서", EventType::Assignment, today),
            record("2", "자료구조 중간고사", EventType::Exam, date(2024, 12, 17)),
            record("3", "동아리 모임", EventType::Meeting, date(2024, 12, 23)),
        ];

        let alerts = deadline_alerts(&records, today);
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].kind, AlertKind::DueToday);
        assert_eq!(
            alerts[0].message,
            "[마감일 알림] 오늘이 \"운영체제 보고서\" 과제의 마감일입니다!"
        );
        assert_eq!(alerts[1].kind, AlertKind::DueTomorrow);
        assert_eq!(
            alerts[1].message,
            "[마감일 알림] 내일이 \"자료구조 중간고사\" 시험의 마감일입니다!"
        );
    }

    #[test]
    fn test_no_alerts_for_far_or_past_deadlines() {
        let today = date(2024, 12, 16);
        let records = vec![
            record("1", "지난 과제", EventType::Assignment, date(2024, 12, 10)),
            record("2", "기말 발표", EventType::Assignment, date(2024, 12, 30)),
        ];
        assert!(deadline_alerts(&records, today).is_empty());
    }

    #[test]
    fn test_alerts_sorted_within_group() {
        let today = date(2024, 12, 16);
        let records = vec![
            record("1", "나중 과제", EventType::Assignment, today),
            record("2", "가나다 과제", EventType::Assignment, today),
        ];
        let alerts = deadline_alerts(&records, today);
        assert_eq!(alerts[0].title, "가나다 과제");
        assert_eq!(alerts[1].title, "나중 과제");
    }
}
