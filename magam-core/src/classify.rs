//! Difficulty and priority heuristics.
//!
//! Pure keyword and weight arithmetic; every weight is a named constant so
//! the scoring stays testable in isolation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::record::{AssignmentRecord, Difficulty, EventType, PriorityLevel};

/// Heavy-effort markers (5h estimate). Checked before the low-effort set;
/// first matching category wins.
const HIGH_EFFORT_KEYWORDS: &[&str] = &[
    "프로젝트",
    "보고서",
    "논문",
    "기말",
    "발표",
    "project",
    "report",
    "thesis",
    "final",
    "presentation",
];

/// Light-work markers (1h estimate).
const LOW_EFFORT_KEYWORDS: &[&str] = &[
    "퀴즈", "연습", "간단한", "quiz", "practice", "simple",
];

/// Per-day urgency weight; the urgency term is
/// `DEADLINE_WEIGHT * (URGENCY_WINDOW_DAYS - days_left)`.
pub const DEADLINE_WEIGHT: f64 = 0.4;
/// Days out past which urgency contributes nothing; overdue clamps to the
/// maximal contribution.
pub const URGENCY_WINDOW_DAYS: f64 = 10.0;
/// Weight of the description-length factor.
pub const DESCRIPTION_WEIGHT: f64 = 0.3;
/// Character count at which the description factor saturates.
pub const DESCRIPTION_LEN_CAP: f64 = 1000.0;
/// Open-interval label cuts: strictly above HIGH is high, strictly above
/// MEDIUM is medium, boundary values take the lower label.
pub const HIGH_THRESHOLD: f64 = 0.7;
pub const MEDIUM_THRESHOLD: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    pub difficulty: Difficulty,
    pub estimated_hours: i32,
}

/// Keyword scan over lower-cased text.
pub fn analyze_assignment(text: &str) -> Analysis {
    let text = text.to_lowercase();

    if HIGH_EFFORT_KEYWORDS.iter().any(|w| text.contains(w)) {
        return Analysis {
            difficulty: Difficulty::High,
            estimated_hours: 5,
        };
    }
    if LOW_EFFORT_KEYWORDS.iter().any(|w| text.contains(w)) {
        return Analysis {
            difficulty: Difficulty::Low,
            estimated_hours: 1,
        };
    }
    Analysis {
        difficulty: Difficulty::Medium,
        estimated_hours: 2,
    }
}

/// Raw priority score: deadline urgency + event-type weight + description
/// length factor. `description_len` is a character count.
pub fn priority_score(
    event_type: EventType,
    deadline: NaiveDate,
    description_len: usize,
    now: DateTime<Utc>,
) -> f64 {
    let days_left = dates::days_until(deadline, now).clamp(0, 10) as f64;
    let urgency = DEADLINE_WEIGHT * (URGENCY_WINDOW_DAYS - days_left);
    let length_factor =
        DESCRIPTION_WEIGHT * (description_len as f64 / DESCRIPTION_LEN_CAP).min(1.0);

    urgency + event_type.priority_weight() + length_factor
}

/// Map a score to its label; boundaries resolve downward.
pub fn priority_label(score: f64) -> PriorityLevel {
    if score > HIGH_THRESHOLD {
        PriorityLevel::High
    } else if score > MEDIUM_THRESHOLD {
        PriorityLevel::Medium
    } else {
        PriorityLevel::Low
    }
}

pub fn calculate_priority(record: &AssignmentRecord, now: DateTime<Utc>) -> PriorityLevel {
    let score = priority_score(
        record.event_type,
        record.date,
        record.description.chars().count(),
        now,
    );
    priority_label(score)
}

/// Run both heuristics over a record: difficulty and hours from the keyword
/// scan of title+description, priority from the score.
pub fn finalize(mut record: AssignmentRecord, now: DateTime<Utc>) -> AssignmentRecord {
    let analysis = analyze_assignment(&record.analysis_text());
    record.difficulty = analysis.difficulty;
    record.estimated_hours = analysis.estimated_hours;
    record.priority = calculate_priority(&record, now);
    record
}

/// `finalize` with an optional user-pinned priority label. Derivation runs
/// first and the pin overwrites the label after, so a pin given alongside an
/// edit survives that recompute; `None` lets the derived label stand.
pub fn finalize_with_pin(
    record: AssignmentRecord,
    now: DateTime<Utc>,
    pin: Option<PriorityLevel>,
) -> AssignmentRecord {
    let mut record = finalize(record, now);
    if let Some(p) = pin {
        record.priority = p;
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 15, 9, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_analyze_low_effort() {
        let analysis = analyze_assignment("간단한 퀴즈 준비");
        assert_eq!(analysis.difficulty, Difficulty::Low);
        assert_eq!(analysis.estimated_hours, 1);
    }

    #[test]
    fn test_analyze_high_effort() {
        let analysis = analyze_assignment("기말 프로젝트 제안서");
        assert_eq!(analysis.difficulty, Difficulty::High);
        assert_eq!(analysis.estimated_hours, 5);
    }

    #[test]
    fn test_analyze_high_wins_over_low() {
        // Both sets match; the high-effort check runs first.
        let analysis = analyze_assignment("기말 대비 퀴즈 연습");
        assert_eq!(analysis.difficulty, Difficulty::High);
    }

    #[test]
    fn test_analyze_default_medium() {
        let analysis = analyze_assignment("자료 정리");
        assert_eq!(analysis.difficulty, Difficulty::Medium);
        assert_eq!(analysis.estimated_hours, 2);
    }

    #[test]
    fn test_analyze_english_keywords_case_insensitive() {
        let analysis = analyze_assignment("Final Project proposal");
        assert_eq!(analysis.difficulty, Difficulty::High);
    }

    #[test]
    fn test_score_monotone_in_days_left() {
        let mut prev = f64::MAX;
        for day in 15..=25 {
            let score = priority_score(EventType::Personal, date(2024, 12, day), 0, now());
            assert!(score <= prev, "score must not increase as days_left grows");
            prev = score;
        }
    }

    #[test]
    fn test_score_saturates_past_window() {
        let at_10 = priority_score(EventType::Personal, date(2024, 12, 25), 0, now());
        let at_20 = priority_score(EventType::Personal, date(2025, 1, 4), 0, now());
        assert!((at_10 - at_20).abs() < 1e-9);
    }

    #[test]
    fn test_overdue_clamps_to_max_urgency() {
        let same_day = priority_score(EventType::Personal, date(2024, 12, 15), 0, now());
        let overdue = priority_score(EventType::Personal, date(2024, 12, 10), 0, now());
        assert!((same_day - overdue).abs() < 1e-9);
    }

    #[test]
    fn test_same_day_deadline_scores_high() {
        let record = AssignmentRecord::new("1", "퀴즈", EventType::Personal, date(2024, 12, 15));
        assert_eq!(calculate_priority(&record, now()), PriorityLevel::High);
    }

    #[test]
    fn test_distant_small_task_scores_low() {
        // 11+ days out, no description, personal type: 0.15.
        let record = AssignmentRecord::new("1", "산책", EventType::Personal, date(2024, 12, 27));
        assert_eq!(calculate_priority(&record, now()), PriorityLevel::Low);
    }

    #[test]
    fn test_description_length_factor() {
        let ten_out = date(2024, 12, 25);
        let short = priority_score(EventType::Personal, ten_out, 500, now());
        assert!((short - 0.30).abs() < 1e-9);

        let long = priority_score(EventType::Personal, ten_out, 2000, now());
        assert!((long - 0.45).abs() < 1e-9);
        assert_eq!(priority_label(long), PriorityLevel::Medium);
    }

    #[test]
    fn test_boundaries_resolve_to_lower_label() {
        assert_eq!(priority_label(HIGH_THRESHOLD), PriorityLevel::Medium);
        assert_eq!(priority_label(MEDIUM_THRESHOLD), PriorityLevel::Low);
        assert_eq!(priority_label(0.71), PriorityLevel::High);
        assert_eq!(priority_label(0.41), PriorityLevel::Medium);
        assert_eq!(priority_label(0.0), PriorityLevel::Low);
    }

    #[test]
    fn test_exam_outweighs_lecture() {
        let d = date(2024, 12, 20);
        let exam = priority_score(EventType::Exam, d, 0, now());
        let lecture = priority_score(EventType::Lecture, d, 0, now());
        assert!(exam > lecture);
    }

    #[test]
    fn test_finalize_derives_all_fields() {
        let record = AssignmentRecord::new(
            "1",
            "기말 보고서",
            EventType::Assignment,
            date(2024, 12, 17),
        );
        let record = finalize(record, now());
        assert_eq!(record.difficulty, Difficulty::High);
        assert_eq!(record.estimated_hours, 5);
        // two days out: urgency alone is 3.2
        assert_eq!(record.priority, PriorityLevel::High);
    }

    #[test]
    fn test_pinned_priority_survives_recompute() {
        let record = AssignmentRecord::new("1", "내일 퀴즈", EventType::Exam, date(2024, 12, 16));
        let record = finalize_with_pin(record, now(), Some(PriorityLevel::Low));
        // the derived label would be High (one day out); the pin wins
        assert_eq!(record.priority, PriorityLevel::Low);
        // the other derived fields still recompute around it
        assert_eq!(record.difficulty, Difficulty::Low);
        assert_eq!(record.estimated_hours, 1);
    }

    #[test]
    fn test_no_pin_re_derives_priority() {
        let record = AssignmentRecord::new("1", "내일 퀴즈", EventType::Exam, date(2024, 12, 16))
            .with_priority(PriorityLevel::Low);
        let record = finalize_with_pin(record, now(), None);
        assert_eq!(record.priority, PriorityLevel::High);
    }
}
