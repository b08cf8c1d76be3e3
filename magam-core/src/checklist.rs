//! Checklist templates: five fixed steps per event type.

use serde::{Deserialize, Serialize};

use crate::record::EventType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            completed: false,
        }
    }
}

const ASSIGNMENT_STEPS: [&str; 5] = [
    "자료 조사 및 수집",
    "개요 작성",
    "초안 작성",
    "검토 및 수정",
    "최종 제출",
];

const EXAM_STEPS: [&str; 5] = [
    "학습 계획 수립",
    "주요 내용 정리",
    "연습 문제 풀이",
    "오답 노트 작성",
    "최종 복습",
];

const DEFAULT_STEPS: [&str; 5] = ["계획 수립", "준비", "실행", "검토", "완료"];

/// Work template for an event type; assignment and exam have dedicated
/// step lists, everything else shares the generic one.
pub fn template(event_type: EventType) -> &'static [&'static str; 5] {
    match event_type {
        EventType::Assignment => &ASSIGNMENT_STEPS,
        EventType::Exam => &EXAM_STEPS,
        _ => &DEFAULT_STEPS,
    }
}

/// Fresh checklist for a record: template steps, nothing completed yet.
pub fn seed(event_type: EventType) -> Vec<ChecklistItem> {
    template(event_type)
        .iter()
        .map(|s| ChecklistItem::new(*s))
        .collect()
}

pub fn completed_count(items: &[ChecklistItem]) -> usize {
    items.iter().filter(|i| i.completed).count()
}
