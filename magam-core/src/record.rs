//! Assignment record model: the persisted unit of the deadline tracker.

use anyhow::{Result, bail};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::dates;
use crate::extract::Extraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Assignment,
    Exam,
    Lecture,
    Meeting,
    Academic,
    Personal,
}

impl EventType {
    /// Korean display label, as shown in lists and deadline alerts.
    pub fn label_ko(&self) -> &'static str {
        match self {
            EventType::Assignment => "과제",
            EventType::Exam => "시험",
            EventType::Lecture => "강의",
            EventType::Meeting => "미팅",
            EventType::Academic => "학사일정",
            EventType::Personal => "개인일정",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EventType::Assignment => "📝",
            EventType::Exam => "📚",
            EventType::Lecture => "🎓",
            EventType::Meeting => "👥",
            EventType::Academic => "🏫",
            EventType::Personal => "🌟",
        }
    }

    /// Additive weight this type contributes to the priority score.
    pub fn priority_weight(&self) -> f64 {
        match self {
            EventType::Exam => 0.3,
            EventType::Assignment => 0.25,
            _ => 0.15,
        }
    }
}

impl FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "assignment" | "과제" => Ok(EventType::Assignment),
            "exam" | "시험" => Ok(EventType::Exam),
            "lecture" | "강의" => Ok(EventType::Lecture),
            "meeting" | "미팅" => Ok(EventType::Meeting),
            "academic" | "학사일정" => Ok(EventType::Academic),
            "personal" | "개인일정" => Ok(EventType::Personal),
            other => Err(format!("unknown event type: {other}")),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventType::Assignment => "assignment",
            EventType::Exam => "exam",
            EventType::Lecture => "lecture",
            EventType::Meeting => "meeting",
            EventType::Academic => "academic",
            EventType::Personal => "personal",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    pub fn label_ko(&self) -> &'static str {
        match self {
            PriorityLevel::High => "높음",
            PriorityLevel::Medium => "중간",
            PriorityLevel::Low => "낮음",
        }
    }
}

impl FromStr for PriorityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "높음" => Ok(PriorityLevel::High),
            "medium" | "중간" => Ok(PriorityLevel::Medium),
            "low" | "낮음" => Ok(PriorityLevel::Low),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PriorityLevel::High => "high",
            PriorityLevel::Medium => "medium",
            PriorityLevel::Low => "low",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    High,
    Medium,
    Low,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::High => "high",
            Difficulty::Medium => "medium",
            Difficulty::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// One tracked deadline.
///
/// `difficulty`, `estimated_hours` and (unless pinned) `priority` are derived
/// by the classifier on finalize; everything else is user or extractor input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub id: String,
    pub title: String,
    pub event_type: EventType,

    /// Deadline calendar date.
    pub date: NaiveDate,
    /// Wall-clock window; equal start/end means a point deadline.
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,

    pub priority: PriorityLevel,
    pub difficulty: Difficulty,
    /// Hours, always positive.
    pub estimated_hours: i32,

    pub description: String,
}

impl AssignmentRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        event_type: EventType,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            event_type,
            date,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            end_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default(),
            priority: PriorityLevel::Medium,
            difficulty: Difficulty::Medium,
            estimated_hours: 2,
            description: String::new(),
        }
    }

    pub fn with_window(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = start;
        self.end_time = end;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: PriorityLevel) -> Self {
        self.priority = priority;
        self
    }

    /// Build a record from an accepted extraction. The deadline is the only
    /// acceptance gate: it must normalize to a calendar date, with `today`
    /// supplying the default year for year-less dates. Every other field
    /// propagates its sentinel verbatim, an unmatched title included.
    pub fn from_extraction(
        id: impl Into<String>,
        extraction: &Extraction,
        today: NaiveDate,
    ) -> Result<Self> {
        let title = extraction.title.as_str().to_string();
        let raw_deadline = match extraction.deadline.found() {
            Some(d) => d,
            None => bail!("no deadline found in extracted text"),
        };
        let date = match dates::parse_deadline_date(raw_deadline, today) {
            Some(d) => d,
            None => bail!("could not parse deadline: {raw_deadline}"),
        };

        let end_of_day = NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default();
        let description = format!(
            "배점: {}\n제출 장소: {}",
            extraction.points.as_str(),
            extraction.location.as_str()
        );

        Ok(Self::new(id, title, EventType::Assignment, date)
            .with_window(end_of_day, end_of_day)
            .with_priority(PriorityLevel::High)
            .with_description(description))
    }

    /// Boundary check before a record enters the classifier/tracker stages.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
        if self.estimated_hours <= 0 {
            return Err(format!(
                "estimated_hours must be positive, got {}",
                self.estimated_hours
            ));
        }
        Ok(())
    }

    /// Combined text the difficulty analyzer looks at.
    pub fn analysis_text(&self) -> String {
        format!("{} {}", self.title, self.description)
    }
}
